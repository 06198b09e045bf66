use crate::selector::Selector;
use crate::types::{ReviewQuery, RiskCandidate};

/// Selects the top K candidates by priority score.
pub struct TopRiskSelector {
    pub k: usize,
}

impl Default for TopRiskSelector {
    fn default() -> Self {
        Self { k: 10 }
    }
}

impl Selector<ReviewQuery, RiskCandidate> for TopRiskSelector {
    fn score(&self, candidate: &RiskCandidate) -> f64 {
        candidate.priority_score.unwrap_or(f64::NEG_INFINITY)
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stockwatch_core::types::{RiskLevel, RiskScore, StockHealth, StockStatus};

    fn candidate(sku: &str, priority: Option<f64>) -> RiskCandidate {
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
                score: 60.0,
                risk_level: RiskLevel::High,
                factors: vec![],
            },
            seasonal_factor: None,
            priority_score: priority,
        }
    }

    fn query() -> ReviewQuery {
        ReviewQuery::for_client(
            "req-1",
            "client-1",
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let selector = TopRiskSelector { k: 2 };
        let selected = selector.select(
            &query(),
            vec![
                candidate("A", Some(40.0)),
                candidate("B", Some(90.0)),
                candidate("C", Some(70.0)),
            ],
        );
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].sku, "B");
        assert_eq!(selected[1].sku, "C");
    }

    #[test]
    fn unscored_candidates_sink_to_the_bottom() {
        let selector = TopRiskSelector { k: 3 };
        let selected = selector.select(
            &query(),
            vec![
                candidate("A", None),
                candidate("B", Some(10.0)),
                candidate("C", Some(f64::NAN)),
            ],
        );
        assert_eq!(selected[0].sku, "B");
        // NaN is ordered after every real score.
        assert_eq!(selected[2].sku, "C");
    }
}
