use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("retry budget exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Network failures and throttling/timeout/server statuses are
    /// transient; anything else (business 4xx, malformed payloads) will
    /// fail the same way again and propagates immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network(_) => true,
            RemoteError::Status { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            RemoteError::RetriesExhausted { .. } | RemoteError::InvalidResponse(_) => false,
        }
    }
}
