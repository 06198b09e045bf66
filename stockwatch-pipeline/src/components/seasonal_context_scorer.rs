use async_trait::async_trait;

use crate::scorer::Scorer;
use crate::types::{ReviewQuery, RiskCandidate};

/// Seasonal factor at or above which elevated demand is "expected".
const PEAK_FACTOR: f64 = 1.2;
/// Seasonal factor at or below which demand is in a trough.
const TROUGH_FACTOR: f64 = 0.8;
const PEAK_ATTENUATION: f64 = 0.9;
const TROUGH_BOOST: f64 = 1.1;

/// Adjusts priority using the product's seasonal context.
///
/// A velocity spike during an expected seasonal peak is less alarming than
/// the same spike in a trough, so peaks attenuate priority slightly and
/// troughs boost it. Runs after [`super::risk_priority_scorer`] and reads
/// the priority it assigned.
pub struct SeasonalContextScorer;

#[async_trait]
impl Scorer<ReviewQuery, RiskCandidate> for SeasonalContextScorer {
    async fn score(
        &self,
        _query: &ReviewQuery,
        candidates: &[RiskCandidate],
    ) -> Result<Vec<RiskCandidate>, String> {
        let scored = candidates
            .iter()
            .map(|c| {
                let mut scored = c.clone();
                if let (Some(priority), Some(factor)) = (c.priority_score, c.seasonal_factor) {
                    let adjusted = if factor >= PEAK_FACTOR {
                        priority * PEAK_ATTENUATION
                    } else if factor <= TROUGH_FACTOR {
                        priority * TROUGH_BOOST
                    } else {
                        priority
                    };
                    scored.priority_score = Some(adjusted);
                }
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
    use stockwatch_core::types::{RiskLevel, RiskScore, StockHealth, StockStatus};

    fn candidate(factor: Option<f64>, priority: Option<f64>) -> RiskCandidate {
        RiskCandidate {
            product_id: "p1".into(),
            sku: "WID-100".into(),
            name: "Widget".into(),
            health: StockHealth {
                status: StockStatus::Watch,
                weeks_remaining: 5.0,
                percent_of_reorder_point: 120.0,
            },
            risk: RiskScore {
                score: 60.0,
                risk_level: RiskLevel::High,
                factors: vec![],
            },
            seasonal_factor: factor,
            priority_score: priority,
        }
    }

    fn query() -> ReviewQuery {
        ReviewQuery::for_client(
            "req-1",
            "client-1",
            Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn peak_attenuates_and_trough_boosts() {
        let scorer = SeasonalContextScorer;
        let candidates = vec![
            candidate(Some(1.5), Some(100.0)),
            candidate(Some(0.5), Some(100.0)),
            candidate(Some(1.0), Some(100.0)),
            candidate(None, Some(100.0)),
        ];
        let scored = scorer.score(&query(), &candidates).await.unwrap();
        assert!((scored[0].priority_score.unwrap() - 90.0).abs() < 0.01);
        assert!((scored[1].priority_score.unwrap() - 110.0).abs() < 0.01);
        assert!((scored[2].priority_score.unwrap() - 100.0).abs() < 0.01);
        assert!((scored[3].priority_score.unwrap() - 100.0).abs() < 0.01);
    }
}
