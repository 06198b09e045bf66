use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{ReviewQuery, RiskCandidate};

/// Drops candidates below a minimum composite risk score.
///
/// The query's `min_score` overrides the configured default, so a caller can
/// ask for a stricter or looser review without rebuilding the pipeline.
pub struct LowRiskFilter {
    pub min_score: f64,
}

impl LowRiskFilter {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }
}

impl Default for LowRiskFilter {
    fn default() -> Self {
        Self { min_score: 25.0 }
    }
}

#[async_trait]
impl Filter<ReviewQuery, RiskCandidate> for LowRiskFilter {
    async fn filter(
        &self,
        query: &ReviewQuery,
        candidates: Vec<RiskCandidate>,
    ) -> Result<FilterResult<RiskCandidate>, String> {
        let cutoff = query.min_score.unwrap_or(self.min_score);
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| c.risk.score >= cutoff);

        Ok(FilterResult { kept, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stockwatch_core::types::{
        RiskLevel, RiskScore, StockHealth, StockStatus,
    };

    fn candidate(sku: &str, score: f64) -> RiskCandidate {
        RiskCandidate {
            product_id: format!("id-{sku}"),
            sku: sku.to_string(),
            name: sku.to_string(),
            health: StockHealth {
                status: StockStatus::Watch,
                weeks_remaining: 5.0,
                percent_of_reorder_point: 120.0,
            },
            risk: RiskScore {
                score,
                risk_level: RiskLevel::from_score(score),
                factors: vec![],
            },
            seasonal_factor: None,
            priority_score: None,
        }
    }

    fn query() -> ReviewQuery {
        ReviewQuery::for_client(
            "req-1",
            "client-1",
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn partitions_on_default_cutoff() {
        let filter = LowRiskFilter::default();
        let result = filter
            .filter(&query(), vec![candidate("A", 60.0), candidate("B", 10.0)])
            .await
            .unwrap();
        assert_eq!(result.kept.len(), 1);
        assert_eq!(result.kept[0].sku, "A");
        assert_eq!(result.removed.len(), 1);
    }

    #[tokio::test]
    async fn query_min_score_overrides_default() {
        let filter = LowRiskFilter::default();
        let mut q = query();
        q.min_score = Some(70.0);
        let result = filter
            .filter(&q, vec![candidate("A", 60.0), candidate("B", 80.0)])
            .await
            .unwrap();
        assert_eq!(result.kept.len(), 1);
        assert_eq!(result.kept[0].sku, "B");
    }
}
