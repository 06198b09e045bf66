//! Five-factor weighted risk scoring.
//!
//! Each factor maps a raw signal onto 0–100, carries its configured weight,
//! and records a human-readable description for audit. The composite score is
//! `round(clamp(Σ value × weight, 0, 100))`. Missing data never fails a
//! factor; it degrades to the neutral value documented on each mapping.

use crate::config::ScoringWeights;
use crate::stats::coefficient_of_variation;
use crate::thresholds::{
    CONTRIBUTING_FACTOR_VALUE, NEUTRAL_FACTOR_VALUE, RELIABILITY_COUNT_CAP,
    STOCK_LEVEL_TAIL_SLOPE, WEEKLY_BASIS_BONUS,
};
use crate::types::{
    CalculationBasis, ProductSnapshot, RiskFactor, RiskLevel, RiskScore, TransactionRecord,
    UsageAggregate,
};

pub const FACTOR_STOCK_LEVEL: &str = "stock_level";
pub const FACTOR_VELOCITY_TREND: &str = "velocity_trend";
pub const FACTOR_DATA_RELIABILITY: &str = "data_reliability";
pub const FACTOR_TIME_TO_STOCKOUT: &str = "time_to_stockout";
pub const FACTOR_DEMAND_VARIABILITY: &str = "demand_variability";

#[derive(Clone, Debug, Default)]
pub struct RiskScorer {
    weights: ScoringWeights,
}

impl RiskScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score a product from its snapshot, usage rollup, and two trailing
    /// transaction windows (0–3 months and 3–6 months back).
    pub fn score(
        &self,
        product: &ProductSnapshot,
        usage: &UsageAggregate,
        recent_txns: &[TransactionRecord],
        older_txns: &[TransactionRecord],
    ) -> RiskScore {
        let factors = vec![
            self.stock_level_factor(product),
            self.velocity_trend_factor(recent_txns, older_txns),
            self.data_reliability_factor(product, usage),
            self.time_to_stockout_factor(product, usage),
            self.demand_variability_factor(recent_txns),
        ];

        let raw: f64 = factors.iter().map(|f| f.contribution).sum();
        let score = raw.clamp(0.0, 100.0).round();

        RiskScore {
            score,
            risk_level: RiskLevel::from_score(score),
            factors,
        }
    }

    /// Stock level relative to the reorder point.
    ///
    /// Value bands are linear within each ratio band; past 1.5 the value
    /// decays toward zero. A zero reorder point gives no usable ratio and
    /// degrades to the neutral value.
    fn stock_level_factor(&self, product: &ProductSnapshot) -> RiskFactor {
        let units = product.stock_units();
        let reorder = product.reorder_point;

        let (value, description) = if reorder <= 0.0 {
            (
                NEUTRAL_FACTOR_VALUE,
                "no reorder point configured; stock level signal is neutral".to_string(),
            )
        } else {
            let ratio = units / reorder;
            let value = if ratio <= 0.0 {
                100.0
            } else if ratio <= 0.5 {
                // 100 at empty down to 80 at half the reorder point.
                100.0 - ratio / 0.5 * 20.0
            } else if ratio <= 1.0 {
                80.0 - (ratio - 0.5) / 0.5 * 30.0
            } else if ratio <= 1.5 {
                50.0 - (ratio - 1.0) / 0.5 * 25.0
            } else {
                (25.0 - (ratio - 1.5) * STOCK_LEVEL_TAIL_SLOPE).max(0.0)
            };
            (
                value,
                format!(
                    "stock at {:.0}% of reorder point ({:.0} of {:.0} units)",
                    ratio * 100.0,
                    units,
                    reorder
                ),
            )
        };

        self.build_factor(FACTOR_STOCK_LEVEL, self.weights.stock_level, value, description)
    }

    /// Demand velocity: recent 3-month volume against the prior 3 months.
    fn velocity_trend_factor(
        &self,
        recent: &[TransactionRecord],
        older: &[TransactionRecord],
    ) -> RiskFactor {
        let recent_total: f64 = recent.iter().map(|t| t.quantity_units).sum();
        let older_total: f64 = older.iter().map(|t| t.quantity_units).sum();

        let (value, description) = if older_total <= 0.0 {
            (
                NEUTRAL_FACTOR_VALUE,
                "no prior-period volume to compare against".to_string(),
            )
        } else {
            let ratio = recent_total / older_total;
            let value = if ratio >= 2.0 {
                90.0
            } else if ratio >= 1.5 {
                70.0
            } else if ratio >= 1.2 {
                50.0
            } else if ratio >= 0.8 {
                25.0
            } else {
                10.0
            };
            (
                value,
                format!(
                    "recent demand at {:.0}% of the prior period ({:.0} vs {:.0} units)",
                    ratio * 100.0,
                    recent_total,
                    older_total
                ),
            )
        };

        self.build_factor(
            FACTOR_VELOCITY_TREND,
            self.weights.velocity_trend,
            value,
            description,
        )
    }

    /// How much history backs the usage numbers. Sparse history is the risk
    /// here: few transactions mean the other signals rest on thin evidence.
    fn data_reliability_factor(
        &self,
        product: &ProductSnapshot,
        usage: &UsageAggregate,
    ) -> RiskFactor {
        let bonus = if product.calculation_basis == CalculationBasis::Weekly {
            WEEKLY_BASIS_BONUS
        } else {
            0
        };
        let effective = (usage.transaction_count + bonus).min(RELIABILITY_COUNT_CAP);

        let value = if effective >= 24 {
            10.0
        } else if effective >= 12 {
            25.0
        } else if effective >= 6 {
            50.0
        } else if effective >= 3 {
            70.0
        } else {
            90.0
        };

        let description = format!(
            "{} transactions in the usage window{}",
            usage.transaction_count,
            if bonus > 0 { " (weekly basis)" } else { "" }
        );

        self.build_factor(
            FACTOR_DATA_RELIABILITY,
            self.weights.data_reliability,
            value,
            description,
        )
    }

    /// Days until the shelf runs dry at average daily usage.
    fn time_to_stockout_factor(
        &self,
        product: &ProductSnapshot,
        usage: &UsageAggregate,
    ) -> RiskFactor {
        let units = product.stock_units();
        let daily = usage.avg_daily_units;

        let (value, description) = if daily <= 0.0 {
            (
                20.0,
                "no recorded usage; stockout horizon is unbounded".to_string(),
            )
        } else {
            let days = units / daily;
            let value = if days <= 0.0 {
                100.0
            } else if days <= 7.0 {
                95.0
            } else if days <= 14.0 {
                80.0
            } else if days <= 30.0 {
                60.0
            } else if days <= 60.0 {
                40.0
            } else if days <= 90.0 {
                20.0
            } else {
                5.0
            };
            (value, format!("about {days:.0} days of supply remaining"))
        };

        self.build_factor(
            FACTOR_TIME_TO_STOCKOUT,
            self.weights.time_to_stockout,
            value,
            description,
        )
    }

    /// Coefficient of variation over recent order quantities.
    fn demand_variability_factor(&self, recent: &[TransactionRecord]) -> RiskFactor {
        let quantities: Vec<f64> = recent.iter().map(|t| t.quantity_units).collect();

        let (value, description) = if quantities.len() < 3 {
            (
                NEUTRAL_FACTOR_VALUE,
                format!(
                    "only {} recent transactions; variability is indeterminate",
                    quantities.len()
                ),
            )
        } else {
            let cv = coefficient_of_variation(&quantities);
            let value = if cv >= 1.0 {
                80.0
            } else if cv >= 0.5 {
                60.0
            } else if cv >= 0.25 {
                40.0
            } else {
                20.0
            };
            (
                value,
                format!("demand coefficient of variation {cv:.2} over recent orders"),
            )
        };

        self.build_factor(
            FACTOR_DEMAND_VARIABILITY,
            self.weights.demand_variability,
            value,
            description,
        )
    }

    fn build_factor(
        &self,
        name: &'static str,
        weight: f64,
        value: f64,
        description: String,
    ) -> RiskFactor {
        RiskFactor {
            name,
            weight,
            value,
            contribution: value * weight,
            description,
        }
    }
}

// ---------------------------------------------------------------------------
// Client-level aggregation
// ---------------------------------------------------------------------------

/// One factor's appearance count in the at-risk tally.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FactorTally {
    pub name: &'static str,
    pub count: usize,
}

/// Rollup across a client's scored catalog.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ClientRiskSummary {
    pub product_count: usize,
    pub average_score: f64,
    /// Products at high or critical risk.
    pub at_risk_count: usize,
    /// Factors that most frequently exceeded the contributing-value cutoff
    /// among at-risk products, highest count first.
    pub top_factors: Vec<FactorTally>,
}

/// Average per-product scores and tally which factors most often ran hot
/// (value above 60) across at-risk products.
pub fn summarize_client(scores: &[RiskScore]) -> ClientRiskSummary {
    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.score).sum::<f64>() / scores.len() as f64
    };

    let mut counts: std::collections::HashMap<&'static str, usize> =
        std::collections::HashMap::new();
    let mut at_risk_count = 0;
    for score in scores {
        if !matches!(score.risk_level, RiskLevel::High | RiskLevel::Critical) {
            continue;
        }
        at_risk_count += 1;
        for factor in &score.factors {
            if factor.value > CONTRIBUTING_FACTOR_VALUE {
                *counts.entry(factor.name).or_insert(0) += 1;
            }
        }
    }

    let mut top_factors: Vec<FactorTally> = counts
        .into_iter()
        .map(|(name, count)| FactorTally { name, count })
        .collect();
    top_factors.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(b.name)));
    top_factors.truncate(3);

    ClientRiskSummary {
        product_count: scores.len(),
        average_score,
        at_risk_count,
        top_factors,
    }
}
