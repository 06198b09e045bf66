//! Centralized thresholds and mapping tables for the risk engine.
//!
//! Per-tenant tunables (classifier bands, factor weights, seasonal minimums)
//! live in [`crate::config`] with these values as defaults. The mapping tables
//! for individual risk factors are not tenant-tunable: changing one silently
//! reclassifies live inventory risk, so they are named constants here where a
//! single test can pin them down.

/// Sentinel weeks-of-supply when daily usage is zero ("unbounded").
pub const UNBOUNDED_WEEKS: f64 = 999.0;

/// Percent-of-reorder-point reported when the reorder point itself is zero.
pub const ZERO_REORDER_PERCENT: f64 = 100.0;

// --- Default classifier bands (percent of reorder point OR weeks remaining) ---

pub const DEFAULT_CRITICAL_PERCENT: f64 = 50.0;
pub const DEFAULT_CRITICAL_WEEKS: f64 = 2.0;
pub const DEFAULT_LOW_PERCENT: f64 = 100.0;
pub const DEFAULT_LOW_WEEKS: f64 = 4.0;
pub const DEFAULT_WATCH_PERCENT: f64 = 150.0;
pub const DEFAULT_WATCH_WEEKS: f64 = 6.0;

// --- Default factor weights (must sum to 1.0) ---

pub const WEIGHT_STOCK_LEVEL: f64 = 0.25;
pub const WEIGHT_VELOCITY_TREND: f64 = 0.20;
pub const WEIGHT_DATA_RELIABILITY: f64 = 0.15;
pub const WEIGHT_TIME_TO_STOCKOUT: f64 = 0.25;
pub const WEIGHT_DEMAND_VARIABILITY: f64 = 0.15;

// --- Risk level cutoffs on the composite 0–100 score ---

pub const RISK_CRITICAL_SCORE: f64 = 75.0;
pub const RISK_HIGH_SCORE: f64 = 50.0;
pub const RISK_MODERATE_SCORE: f64 = 25.0;

/// Neutral factor value when a signal has no usable data.
pub const NEUTRAL_FACTOR_VALUE: f64 = 50.0;

/// Decay slope for the stock-level factor once the ratio exceeds 1.5:
/// `max(0, 25 − (ratio − 1.5) × STOCK_LEVEL_TAIL_SLOPE)`.
pub const STOCK_LEVEL_TAIL_SLOPE: f64 = 16.67;

/// Factor value above which a factor counts toward the client-level
/// "top contributing factors" tally.
pub const CONTRIBUTING_FACTOR_VALUE: f64 = 60.0;

/// Transaction-count bonus applied to the reliability factor when usage is
/// calculated on a weekly basis, capped at [`RELIABILITY_COUNT_CAP`].
pub const WEEKLY_BASIS_BONUS: usize = 20;
pub const RELIABILITY_COUNT_CAP: usize = 100;

// --- Default seasonal detection minimums ---

pub const DEFAULT_SEASONAL_HISTORY_MONTHS: u32 = 24;
pub const DEFAULT_MONTHLY_MIN_TRANSACTIONS: usize = 50;
pub const DEFAULT_MONTHLY_MIN_PERIODS: usize = 12;
pub const DEFAULT_MONTHLY_CONFIDENCE_FLOOR: f64 = 0.2;
pub const DEFAULT_QUARTERLY_MIN_TRANSACTIONS: usize = 30;
pub const DEFAULT_QUARTERLY_MIN_PERIODS: usize = 4;
pub const DEFAULT_QUARTERLY_CONFIDENCE_FLOOR: f64 = 0.15;
