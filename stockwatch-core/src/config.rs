//! Per-tenant engine configuration.
//!
//! Thresholds used to live as loose setting blobs; here they are an explicit,
//! versioned struct validated at load time. Defaults match the constants in
//! [`crate::thresholds`], which behavioral tests pin down.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::thresholds;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version; bumped when a field changes meaning.
    pub version: u32,
    pub classifier: ClassifierThresholds,
    pub scoring: ScoringWeights,
    pub seasonal: SeasonalSettings,
}

/// Classifier bands. Each band triggers on percent-of-reorder-point OR
/// weeks-remaining; either signal alone forces the more severe bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    pub critical_percent: f64,
    pub critical_weeks: f64,
    pub low_percent: f64,
    pub low_weeks: f64,
    pub watch_percent: f64,
    pub watch_weeks: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub stock_level: f64,
    pub velocity_trend: f64,
    pub data_reliability: f64,
    pub time_to_stockout: f64,
    pub demand_variability: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.stock_level
            + self.velocity_trend
            + self.data_reliability
            + self.time_to_stockout
            + self.demand_variability
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeasonalSettings {
    /// Trailing window over which history is considered.
    pub history_months: u32,
    pub monthly_min_transactions: usize,
    pub monthly_min_periods: usize,
    pub monthly_confidence_floor: f64,
    pub quarterly_min_transactions: usize,
    pub quarterly_min_periods: usize,
    pub quarterly_confidence_floor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            classifier: ClassifierThresholds::default(),
            scoring: ScoringWeights::default(),
            seasonal: SeasonalSettings::default(),
        }
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            critical_percent: thresholds::DEFAULT_CRITICAL_PERCENT,
            critical_weeks: thresholds::DEFAULT_CRITICAL_WEEKS,
            low_percent: thresholds::DEFAULT_LOW_PERCENT,
            low_weeks: thresholds::DEFAULT_LOW_WEEKS,
            watch_percent: thresholds::DEFAULT_WATCH_PERCENT,
            watch_weeks: thresholds::DEFAULT_WATCH_WEEKS,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            stock_level: thresholds::WEIGHT_STOCK_LEVEL,
            velocity_trend: thresholds::WEIGHT_VELOCITY_TREND,
            data_reliability: thresholds::WEIGHT_DATA_RELIABILITY,
            time_to_stockout: thresholds::WEIGHT_TIME_TO_STOCKOUT,
            demand_variability: thresholds::WEIGHT_DEMAND_VARIABILITY,
        }
    }
}

impl Default for SeasonalSettings {
    fn default() -> Self {
        Self {
            history_months: thresholds::DEFAULT_SEASONAL_HISTORY_MONTHS,
            monthly_min_transactions: thresholds::DEFAULT_MONTHLY_MIN_TRANSACTIONS,
            monthly_min_periods: thresholds::DEFAULT_MONTHLY_MIN_PERIODS,
            monthly_confidence_floor: thresholds::DEFAULT_MONTHLY_CONFIDENCE_FLOOR,
            quarterly_min_transactions: thresholds::DEFAULT_QUARTERLY_MIN_TRANSACTIONS,
            quarterly_min_periods: thresholds::DEFAULT_QUARTERLY_MIN_PERIODS,
            quarterly_confidence_floor: thresholds::DEFAULT_QUARTERLY_CONFIDENCE_FLOOR,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.version < 1 {
            return Err(EngineError::InvalidConfig("version must be >= 1".into()));
        }

        let sum = self.scoring.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(EngineError::InvalidConfig(format!(
                "scoring weights must sum to 1.0, got {sum}"
            )));
        }

        let c = &self.classifier;
        if !(c.critical_percent < c.low_percent && c.low_percent < c.watch_percent) {
            return Err(EngineError::InvalidConfig(
                "classifier percent thresholds must increase critical < low < watch".into(),
            ));
        }
        if !(c.critical_weeks < c.low_weeks && c.low_weeks < c.watch_weeks) {
            return Err(EngineError::InvalidConfig(
                "classifier week thresholds must increase critical < low < watch".into(),
            ));
        }

        let s = &self.seasonal;
        if s.history_months == 0
            || s.monthly_min_transactions == 0
            || s.monthly_min_periods == 0
            || s.quarterly_min_transactions == 0
            || s.quarterly_min_periods == 0
        {
            return Err(EngineError::InvalidConfig(
                "seasonal minimums must be positive".into(),
            ));
        }
        for (name, floor) in [
            ("monthly_confidence_floor", s.monthly_confidence_floor),
            ("quarterly_confidence_floor", s.quarterly_confidence_floor),
        ] {
            if !(0.0..1.0).contains(&floor) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {floor}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bad_weight_sum_is_rejected() {
        let mut config = EngineConfig::default();
        config.scoring.stock_level = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn non_monotonic_bands_are_rejected() {
        let mut config = EngineConfig::default();
        config.classifier.low_percent = 40.0; // below critical_percent
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_version_is_rejected() {
        let mut config = EngineConfig::default();
        config.version = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn confidence_floor_out_of_range_is_rejected() {
        let mut config = EngineConfig::default();
        config.seasonal.monthly_confidence_floor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.version, config.version);
    }
}
