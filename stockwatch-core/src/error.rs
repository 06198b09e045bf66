//! Engine error types.
//!
//! Classification and scoring never fail: unknown is a valid business state
//! and degrades to neutral defaults. Errors here cover the genuinely
//! exceptional paths: missing identifiers, bad configuration, and seasonal
//! history below the detection minimums.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient data for {context}: need {needed}, have {actual}")]
    InsufficientData {
        context: String,
        needed: usize,
        actual: usize,
    },

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
