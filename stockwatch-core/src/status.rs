//! Stock-health classification.
//!
//! Two independent signals, percent of reorder point and weeks of supply,
//! feed a bucketed status. Either signal alone can force the more severe
//! bucket: the OR across the two measures is intentional and confirmed by
//! behavioral tests, so it must be preserved exactly.

use crate::config::ClassifierThresholds;
use crate::stats::round1;
use crate::thresholds::{UNBOUNDED_WEEKS, ZERO_REORDER_PERCENT};
use crate::types::{StockHealth, StockStatus};

#[derive(Clone, Debug, Default)]
pub struct StockStatusClassifier {
    thresholds: ClassifierThresholds,
}

impl StockStatusClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a stock level against its reorder point and daily usage.
    ///
    /// Never fails: zero usage yields the 999-week sentinel and a zero
    /// reorder point is treated as "exactly at the point" (100%).
    pub fn classify(&self, current_stock: f64, reorder_point: f64, daily_usage: f64) -> StockHealth {
        let weeks_remaining = if daily_usage > 0.0 {
            round1(current_stock / daily_usage / 7.0)
        } else {
            UNBOUNDED_WEEKS
        };

        let percent_of_reorder_point = if reorder_point > 0.0 {
            (current_stock / reorder_point * 100.0).round()
        } else {
            ZERO_REORDER_PERCENT
        };

        let t = &self.thresholds;
        // First match wins; each band is an OR across the two signals.
        let status = if current_stock <= 0.0 {
            StockStatus::Stockout
        } else if percent_of_reorder_point <= t.critical_percent
            || weeks_remaining < t.critical_weeks
        {
            StockStatus::Critical
        } else if percent_of_reorder_point <= t.low_percent || weeks_remaining < t.low_weeks {
            StockStatus::Low
        } else if percent_of_reorder_point <= t.watch_percent || weeks_remaining < t.watch_weeks {
            StockStatus::Watch
        } else {
            StockStatus::Healthy
        };

        StockHealth {
            status,
            weeks_remaining,
            percent_of_reorder_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(stock: f64, reorder: f64, daily: f64) -> StockHealth {
        StockStatusClassifier::default().classify(stock, reorder, daily)
    }

    #[test]
    fn zero_stock_is_stockout() {
        let health = classify(0.0, 100.0, 10.0);
        assert_eq!(health.status, StockStatus::Stockout);
        assert_eq!(health.weeks_remaining, 0.0);
        assert_eq!(health.percent_of_reorder_point, 0.0);
    }

    #[test]
    fn low_percent_is_critical() {
        // 40% of reorder point, even with comfortable weeks of supply.
        let health = classify(40.0, 100.0, 0.5);
        assert_eq!(health.status, StockStatus::Critical);
        assert_eq!(health.percent_of_reorder_point, 40.0);
    }

    #[test]
    fn exactly_at_reorder_point_is_low() {
        let health = classify(100.0, 100.0, 2.0);
        assert_eq!(health.status, StockStatus::Low);
        assert_eq!(health.percent_of_reorder_point, 100.0);
        // 100 / 2 / 7 = 7.14 weeks; the percent signal alone drives this.
        assert_eq!(health.weeks_remaining, 7.1);
    }

    #[test]
    fn just_over_reorder_point_is_watch() {
        let health = classify(101.0, 100.0, 1.0);
        assert_eq!(health.status, StockStatus::Watch);
        assert_eq!(health.percent_of_reorder_point, 101.0);
    }

    #[test]
    fn healthy_requires_both_signals_clear() {
        // Percent is above the watch band AND weeks well above 6.
        let health = classify(151.0, 100.0, 0.5);
        assert_eq!(health.percent_of_reorder_point, 151.0);
        assert!(health.weeks_remaining > 6.0);
        assert_eq!(health.status, StockStatus::Healthy);

        // Same percent but fast consumption: weeks alone forces watch.
        let fast = classify(151.0, 100.0, 5.0);
        assert_eq!(fast.percent_of_reorder_point, 151.0);
        assert!(fast.weeks_remaining < 6.0);
        assert_eq!(fast.status, StockStatus::Watch);
    }

    #[test]
    fn weeks_alone_can_force_critical() {
        // 120% of reorder point but under two weeks of supply.
        let health = classify(12.0, 10.0, 1.0);
        assert_eq!(health.percent_of_reorder_point, 120.0);
        assert!(health.weeks_remaining < 2.0);
        assert_eq!(health.status, StockStatus::Critical);
    }

    #[test]
    fn weeks_remaining_rounds_to_one_decimal() {
        let health = classify(25.0, 10.0, 3.0);
        // 25 / 3 / 7 = 1.1904... → 1.2
        assert_eq!(health.weeks_remaining, 1.2);
    }

    #[test]
    fn zero_usage_yields_unbounded_sentinel() {
        let health = classify(500.0, 100.0, 0.0);
        assert_eq!(health.weeks_remaining, 999.0);
        // Percent still drives the status on its own.
        assert_eq!(health.status, StockStatus::Healthy);
    }

    #[test]
    fn zero_reorder_point_reads_as_at_the_point() {
        let health = classify(50.0, 0.0, 1.0);
        assert_eq!(health.percent_of_reorder_point, 100.0);
        // Percent 100 lands in the low band.
        assert_eq!(health.status, StockStatus::Low);
    }

    #[test]
    fn classification_is_idempotent() {
        let a = classify(73.0, 60.0, 2.5);
        let b = classify(73.0, 60.0, 2.5);
        assert_eq!(a, b);
    }
}
