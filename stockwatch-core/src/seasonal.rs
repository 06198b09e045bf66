//! Seasonal pattern detection and demand forecasting.
//!
//! History is bucketed by calendar period over a trailing window; a period's
//! factor is its mean demand over the overall mean, so factors average to
//! roughly 1.0 and a flat history yields no pattern. Monthly and quarterly
//! cycles are detected independently with their own data minimums.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, Utc};
use serde::Serialize;

use crate::config::SeasonalSettings;
use crate::error::{EngineError, EngineResult};
use crate::stats::{mean, rms_deviation, std_dev};
use crate::types::{
    OrderStatus, PatternType, SeasonalFactor, SeasonalPattern, TransactionRecord,
};

#[derive(Clone, Debug, Default)]
pub struct SeasonalPatternDetector {
    settings: SeasonalSettings,
}

impl SeasonalPatternDetector {
    pub fn new(settings: SeasonalSettings) -> Self {
        Self { settings }
    }

    /// Detect seasonal cycles in a product's history.
    ///
    /// Returns zero, one, or two patterns (monthly and/or quarterly). Thin or
    /// flat history simply yields fewer patterns, never an error.
    pub fn detect(
        &self,
        txns: &[TransactionRecord],
        as_of: DateTime<Utc>,
    ) -> Vec<SeasonalPattern> {
        let cutoff = as_of
            .checked_sub_months(Months::new(self.settings.history_months))
            .unwrap_or(as_of);
        let in_window: Vec<&TransactionRecord> = txns
            .iter()
            .filter(|t| {
                t.status != OrderStatus::Cancelled
                    && t.submitted_at >= cutoff
                    && t.submitted_at <= as_of
            })
            .collect();

        let mut patterns = Vec::new();
        if let Some(p) = self.detect_periodic(
            &in_window,
            PatternType::Monthly,
            12,
            |t| t.submitted_at.month0(),
            self.settings.monthly_min_transactions,
            self.settings.monthly_min_periods,
            self.settings.monthly_confidence_floor,
        ) {
            patterns.push(p);
        }
        if let Some(p) = self.detect_periodic(
            &in_window,
            PatternType::Quarterly,
            4,
            |t| t.submitted_at.month0() / 3,
            self.settings.quarterly_min_transactions,
            self.settings.quarterly_min_periods,
            self.settings.quarterly_confidence_floor,
        ) {
            patterns.push(p);
        }
        patterns
    }

    /// Shared detection over one periodicity.
    ///
    /// Buckets demand by (year, period-of-year), requires enough transactions
    /// and enough distinct buckets, then compares each period's mean bucket
    /// total against the overall mean.
    #[allow(clippy::too_many_arguments)]
    fn detect_periodic(
        &self,
        txns: &[&TransactionRecord],
        pattern_type: PatternType,
        periods_per_year: u32,
        period_of: impl Fn(&TransactionRecord) -> u32,
        min_transactions: usize,
        min_periods: usize,
        confidence_floor: f64,
    ) -> Option<SeasonalPattern> {
        if txns.len() < min_transactions {
            return None;
        }

        // Total demand per (year, period-of-year) bucket.
        let mut buckets: HashMap<(i32, u32), f64> = HashMap::new();
        for txn in txns {
            let key = (txn.submitted_at.year(), period_of(txn));
            *buckets.entry(key).or_insert(0.0) += txn.quantity_units;
        }
        if buckets.len() < min_periods {
            return None;
        }

        let all_totals: Vec<f64> = buckets.values().copied().collect();
        let overall_mean = mean(&all_totals);
        if overall_mean <= 0.0 {
            return None;
        }

        // Group bucket totals by period-of-year across years.
        let mut by_period: HashMap<u32, Vec<f64>> = HashMap::new();
        for ((_, period), total) in &buckets {
            by_period.entry(*period).or_default().push(*total);
        }

        let mut factors = Vec::with_capacity(periods_per_year as usize);
        for period in 0..periods_per_year {
            let Some(totals) = by_period.get(&period) else {
                continue;
            };
            let period_mean = mean(totals);
            let spread = std_dev(totals);
            let confidence = if period_mean > 0.0 {
                (1.0 - spread / period_mean).max(0.0)
            } else {
                0.0
            };
            factors.push(SeasonalFactor {
                period,
                factor: period_mean / overall_mean,
                confidence,
            });
        }
        if factors.is_empty() {
            return None;
        }

        let peak = factors
            .iter()
            .max_by(|a, b| a.factor.total_cmp(&b.factor))?;
        let trough = factors
            .iter()
            .min_by(|a, b| a.factor.total_cmp(&b.factor))?;
        let average_amplitude = (peak.factor - trough.factor) / 2.0;
        let peak_period = peak.period;
        let trough_period = trough.period;

        // Pattern strength is how far the factors sit from flat (1.0).
        let factor_values: Vec<f64> = factors.iter().map(|f| f.factor).collect();
        let confidence = (rms_deviation(&factor_values, 1.0) * 2.0).min(1.0);
        if confidence < confidence_floor {
            return None;
        }

        Some(SeasonalPattern {
            pattern_type,
            confidence,
            factors,
            peak_period,
            trough_period,
            average_amplitude,
        })
    }
}

/// Scale a baseline forecast by the seasonal factor for a period.
///
/// A missing pattern or a period without a factor is a no-op, not an error.
pub fn apply_adjustment(baseline: f64, pattern: Option<&SeasonalPattern>, period: u32) -> f64 {
    match pattern.and_then(|p| p.factor_for(period)) {
        Some(f) => baseline * f.factor,
        None => baseline,
    }
}

/// One month of projected demand.
#[derive(Clone, Debug, Serialize)]
pub struct ForecastPoint {
    /// Calendar month in `YYYY-MM` form.
    pub period: String,
    pub forecast: f64,
    pub confidence: f64,
}

/// Project monthly demand forward by scaling a baseline with a pattern's
/// factors. Point confidence blends the pattern's overall confidence with
/// the per-month factor confidence; months without a factor fall back to
/// half the pattern confidence.
pub fn forecast(
    pattern: &SeasonalPattern,
    baseline_monthly_units: f64,
    start: DateTime<Utc>,
    months_ahead: u32,
) -> Vec<ForecastPoint> {
    (0..months_ahead)
        .filter_map(|offset| start.checked_add_months(Months::new(offset)))
        .map(|date| {
            let period = date.month0();
            let (forecast, confidence) = match pattern.factor_for(period) {
                Some(f) => (
                    baseline_monthly_units * f.factor,
                    (f.confidence + pattern.confidence) / 2.0,
                ),
                None => (baseline_monthly_units, pattern.confidence * 0.5),
            };
            ForecastPoint {
                period: format!("{:04}-{:02}", date.year(), date.month()),
                forecast,
                confidence,
            }
        })
        .collect()
}

/// End-to-end forecast from raw history: detect a monthly pattern, derive
/// the baseline as the mean monthly demand over the history window, and
/// project forward from `as_of`.
pub fn seasonal_forecast(
    detector: &SeasonalPatternDetector,
    txns: &[TransactionRecord],
    as_of: DateTime<Utc>,
    months_ahead: u32,
) -> EngineResult<Vec<ForecastPoint>> {
    let patterns = detector.detect(txns, as_of);
    let monthly = patterns
        .into_iter()
        .find(|p| p.pattern_type == PatternType::Monthly)
        .ok_or_else(|| EngineError::InsufficientData {
            context: "monthly seasonal forecast".into(),
            needed: 12,
            actual: distinct_months(txns, as_of),
        })?;

    let mut buckets: HashMap<(i32, u32), f64> = HashMap::new();
    for txn in txns.iter().filter(|t| t.status != OrderStatus::Cancelled) {
        let key = (txn.submitted_at.year(), txn.submitted_at.month0());
        *buckets.entry(key).or_insert(0.0) += txn.quantity_units;
    }
    let totals: Vec<f64> = buckets.values().copied().collect();
    let baseline = mean(&totals);

    Ok(forecast(&monthly, baseline, as_of, months_ahead))
}

fn distinct_months(txns: &[TransactionRecord], as_of: DateTime<Utc>) -> usize {
    txns.iter()
        .filter(|t| t.status != OrderStatus::Cancelled && t.submitted_at <= as_of)
        .map(|t| (t.submitted_at.year(), t.submitted_at.month0()))
        .collect::<std::collections::HashSet<_>>()
        .len()
}
