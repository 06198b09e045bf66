use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input types (owned by the persistence collaborator, read-only here)
// ---------------------------------------------------------------------------

/// How a product's average usage figures were derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationBasis {
    /// Usage entered or confirmed on a weekly schedule.
    Weekly,
    /// Usage derived from the transaction history itself.
    Transactional,
}

/// A point-in-time view of a stocked product.
///
/// Stock is tracked in packs with a pack-to-unit multiplier; all risk math
/// operates on units via [`ProductSnapshot::stock_units`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    /// External identifier used to match import rows.
    pub sku: String,
    pub name: String,
    pub stock_packs: f64,
    pub pack_size: f64,
    /// Reorder threshold, in units.
    pub reorder_point: f64,
    /// Fallback threshold, in units, when no usage data exists.
    pub notification_point: f64,
    pub avg_daily_units: f64,
    pub avg_monthly_units: f64,
    pub calculation_basis: CalculationBasis,
}

impl ProductSnapshot {
    pub fn stock_units(&self) -> f64 {
        self.stock_packs * self.pack_size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Submitted,
    Fulfilled,
    Cancelled,
}

/// One recorded demand event. Immutable once recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub product_id: String,
    pub submitted_at: DateTime<Utc>,
    pub quantity_units: f64,
    pub status: OrderStatus,
}

/// Derived usage rollup, normally produced by the usage-calculation
/// collaborator. Not authoritative: a convenience view over the history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageAggregate {
    pub avg_daily_units: f64,
    pub avg_weekly_units: f64,
    pub transaction_count: usize,
    pub period_days: u32,
    pub calculated_at: DateTime<Utc>,
}

impl UsageAggregate {
    /// Derive an aggregate from raw history over a trailing period.
    ///
    /// Stands in for the usage-calculation collaborator when the caller has
    /// only transactions in hand. Cancelled orders are excluded.
    pub fn from_transactions(
        txns: &[TransactionRecord],
        period_days: u32,
        as_of: DateTime<Utc>,
    ) -> Self {
        let cutoff = as_of - chrono::Duration::days(i64::from(period_days));
        let in_window: Vec<&TransactionRecord> = txns
            .iter()
            .filter(|t| {
                t.status != OrderStatus::Cancelled
                    && t.submitted_at >= cutoff
                    && t.submitted_at <= as_of
            })
            .collect();
        let total_units: f64 = in_window.iter().map(|t| t.quantity_units).sum();
        let days = f64::from(period_days.max(1));
        let avg_daily = total_units / days;
        Self {
            avg_daily_units: avg_daily,
            avg_weekly_units: avg_daily * 7.0,
            transaction_count: in_window.len(),
            period_days,
            calculated_at: as_of,
        }
    }
}

// ---------------------------------------------------------------------------
// Computed types (transient; recomputed on every call)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Stockout,
    Critical,
    Low,
    Watch,
    Healthy,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Stockout => write!(f, "stockout"),
            StockStatus::Critical => write!(f, "critical"),
            StockStatus::Low => write!(f, "low"),
            StockStatus::Watch => write!(f, "watch"),
            StockStatus::Healthy => write!(f, "healthy"),
        }
    }
}

/// Classification output: health bucket plus the two signals behind it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockHealth {
    pub status: StockStatus,
    /// Weeks of supply at current daily usage; 999 when usage is zero.
    pub weeks_remaining: f64,
    pub percent_of_reorder_point: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= crate::thresholds::RISK_CRITICAL_SCORE {
            RiskLevel::Critical
        } else if score >= crate::thresholds::RISK_HIGH_SCORE {
            RiskLevel::High
        } else if score >= crate::thresholds::RISK_MODERATE_SCORE {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "critical"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::Low => write!(f, "low"),
        }
    }
}

/// One weighted signal inside a composite risk score.
///
/// `contribution = value × weight`; the factor list is the audit trail for
/// the composite score.
#[derive(Clone, Debug, Serialize)]
pub struct RiskFactor {
    pub name: &'static str,
    pub weight: f64,
    /// Raw signal mapped onto 0–100.
    pub value: f64,
    pub contribution: f64,
    pub description: String,
}

/// Composite 0–100 risk score with its factor breakdown.
#[derive(Clone, Debug, Serialize)]
pub struct RiskScore {
    pub score: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Monthly,
    Quarterly,
}

/// Demand factor for one period of the year (month 0–11 or quarter 0–3).
#[derive(Clone, Debug, Serialize)]
pub struct SeasonalFactor {
    pub period: u32,
    /// Ratio of this period's mean demand to the overall mean; 1.0 = flat.
    pub factor: f64,
    pub confidence: f64,
}

/// A detected seasonal cycle. Factors average to ~1.0 by construction.
#[derive(Clone, Debug, Serialize)]
pub struct SeasonalPattern {
    pub pattern_type: PatternType,
    /// Overall pattern strength, 0–1.
    pub confidence: f64,
    pub factors: Vec<SeasonalFactor>,
    pub peak_period: u32,
    pub trough_period: u32,
    pub average_amplitude: f64,
}

impl SeasonalPattern {
    pub fn factor_for(&self, period: u32) -> Option<&SeasonalFactor> {
        self.factors.iter().find(|f| f.period == period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stock_units_multiplies_packs_by_pack_size() {
        let p = ProductSnapshot {
            id: "p1".into(),
            sku: "WID-100".into(),
            name: "Widget".into(),
            stock_packs: 12.0,
            pack_size: 6.0,
            reorder_point: 40.0,
            notification_point: 20.0,
            avg_daily_units: 2.0,
            avg_monthly_units: 60.0,
            calculation_basis: CalculationBasis::Transactional,
        };
        assert!((p.stock_units() - 72.0).abs() < 1e-9);
    }

    #[test]
    fn risk_level_cutoffs() {
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(74.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(24.9), RiskLevel::Low);
    }

    #[test]
    fn usage_aggregate_excludes_cancelled_and_old_transactions() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let txns = vec![
            TransactionRecord {
                product_id: "p1".into(),
                submitted_at: Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap(),
                quantity_units: 30.0,
                status: OrderStatus::Fulfilled,
            },
            TransactionRecord {
                product_id: "p1".into(),
                submitted_at: Utc.with_ymd_and_hms(2025, 5, 21, 0, 0, 0).unwrap(),
                quantity_units: 60.0,
                status: OrderStatus::Cancelled,
            },
            TransactionRecord {
                product_id: "p1".into(),
                submitted_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                quantity_units: 500.0,
                status: OrderStatus::Fulfilled,
            },
        ];
        let usage = UsageAggregate::from_transactions(&txns, 30, as_of);
        assert_eq!(usage.transaction_count, 1);
        assert!((usage.avg_daily_units - 1.0).abs() < 1e-9);
        assert!((usage.avg_weekly_units - 7.0).abs() < 1e-9);
    }
}
