use async_trait::async_trait;

use stockwatch_core::types::StockStatus;

use crate::scorer::Scorer;
use crate::types::{ReviewQuery, RiskCandidate};

/// Base priority: composite risk score scaled by a stock-status multiplier.
///
/// The classifier already folds stock level into the score; the multiplier
/// exists so a stockout always outranks an equally-scored watch item.
pub struct RiskPriorityScorer;

impl RiskPriorityScorer {
    fn status_multiplier(status: StockStatus) -> f64 {
        match status {
            StockStatus::Stockout => 1.5,
            StockStatus::Critical => 1.3,
            StockStatus::Low => 1.15,
            StockStatus::Watch => 1.0,
            StockStatus::Healthy => 0.9,
        }
    }
}

#[async_trait]
impl Scorer<ReviewQuery, RiskCandidate> for RiskPriorityScorer {
    async fn score(
        &self,
        _query: &ReviewQuery,
        candidates: &[RiskCandidate],
    ) -> Result<Vec<RiskCandidate>, String> {
        let scored = candidates
            .iter()
            .map(|c| {
                let mut scored = c.clone();
                scored.priority_score =
                    Some(c.risk.score * Self::status_multiplier(c.health.status));
                scored
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut RiskCandidate, scored: RiskCandidate) {
        candidate.priority_score = scored.priority_score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stockwatch_core::types::{RiskLevel, RiskScore, StockHealth};

    fn candidate(sku: &str, score: f64, status: StockStatus) -> RiskCandidate {
        RiskCandidate {
            product_id: format!("id-{sku}"),
            sku: sku.to_string(),
            name: sku.to_string(),
            health: StockHealth {
                status,
                weeks_remaining: 1.0,
                percent_of_reorder_point: 50.0,
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

    #[tokio::test]
    async fn stockout_outranks_equal_score() {
        let scorer = RiskPriorityScorer;
        let query = ReviewQuery::for_client(
            "req-1",
            "client-1",
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        );
        let candidates = vec![
            candidate("A", 60.0, StockStatus::Watch),
            candidate("B", 60.0, StockStatus::Stockout),
        ];
        let scored = scorer.score(&query, &candidates).await.unwrap();
        assert!((scored[0].priority_score.unwrap() - 60.0).abs() < 0.01);
        assert!((scored[1].priority_score.unwrap() - 90.0).abs() < 0.01);
    }
}
