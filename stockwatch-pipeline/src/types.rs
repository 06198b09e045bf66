use chrono::{DateTime, Utc};
use serde::Serialize;

use stockwatch_core::types::{RiskScore, StockHealth};

/// A request to review a client's catalog for at-risk products.
#[derive(Clone, Debug)]
pub struct ReviewQuery {
    pub request_id: String,
    pub client_id: String,
    /// Restrict the review to these product ids; empty means the whole catalog.
    pub product_ids: Vec<String>,
    /// Reference time for usage windows and seasonal context.
    pub as_of: DateTime<Utc>,
    /// Overrides the filter's minimum risk score when set.
    pub min_score: Option<f64>,
}

impl ReviewQuery {
    pub fn for_client(request_id: &str, client_id: &str, as_of: DateTime<Utc>) -> Self {
        Self {
            request_id: request_id.to_string(),
            client_id: client_id.to_string(),
            product_ids: Vec::new(),
            as_of,
            min_score: None,
        }
    }
}

/// One product's assessed risk flowing through the pipeline stages.
#[derive(Clone, Debug, Serialize)]
pub struct RiskCandidate {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub health: StockHealth,
    pub risk: RiskScore,
    /// Seasonal factor for the month of the query's `as_of`, when the
    /// product's history shows a monthly pattern.
    pub seasonal_factor: Option<f64>,
    /// Assigned by scorers; `None` until the scoring stage has run.
    pub priority_score: Option<f64>,
}
