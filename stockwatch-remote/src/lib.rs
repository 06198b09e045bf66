//! Client for the remote statistical forecasting service.
//!
//! The service is an opaque collaborator: this crate owns reaching it
//! reliably, not modeling it. Calls go through a generic retry policy with
//! exponential backoff, a delay cap, and ±25% jitter; only transient
//! failures (network errors, 5xx, 429, 408) are retried. Business errors
//! propagate immediately, and an exhausted budget surfaces as an error
//! rather than a fabricated forecast.

pub mod client;
pub mod error;
pub mod retry;

pub use client::{ForecastClient, ForecastPoint, ForecastResponse, HealthStatus};
pub use error::RemoteError;
pub use retry::{ExponentialBackoff, RetryConfig, RetryPolicy};
