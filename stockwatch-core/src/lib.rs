//! Core inventory risk and forecasting engine.
//!
//! Everything in this crate is a pure, synchronous function of its inputs:
//! - [`status`]: stock-health classification (weeks of supply, percent of reorder point)
//! - [`risk`]: five-factor weighted risk scoring with per-factor explanations
//! - [`seasonal`]: monthly/quarterly seasonal pattern detection and forecast adjustment
//! - [`config`]: validated per-tenant thresholds and weights
//! - [`stats`]: shared statistical helpers
//!
//! Nothing here touches a database or mutates shared state; callers own
//! caching and persistence of the computed results.

pub mod config;
pub mod error;
pub mod risk;
pub mod seasonal;
pub mod stats;
pub mod status;
pub mod thresholds;
pub mod types;

pub use config::{ClassifierThresholds, EngineConfig, ScoringWeights, SeasonalSettings};
pub use error::EngineError;
pub use risk::{summarize_client, ClientRiskSummary, RiskScorer};
pub use seasonal::{seasonal_forecast, ForecastPoint, SeasonalPatternDetector};
pub use status::StockStatusClassifier;
pub use types::{
    CalculationBasis, OrderStatus, PatternType, ProductSnapshot, RiskFactor, RiskLevel,
    RiskScore, SeasonalFactor, SeasonalPattern, StockHealth, StockStatus, TransactionRecord,
    UsageAggregate,
};
