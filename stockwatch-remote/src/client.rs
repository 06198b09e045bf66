//! Retrying HTTP client for the forecasting service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RemoteError;
use crate::retry::{RetryConfig, RetryPolicy};

/// Health probes are near-non-blocking: one retry, then report unhealthy.
const HEALTH_CHECK_RETRIES: u32 = 1;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// One forecast point as returned by the service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ForecastPoint {
    /// Calendar month in `YYYY-MM` form.
    pub period: String,
    pub forecast: f64,
    pub confidence: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ForecastResponse {
    pub product_id: String,
    pub points: Vec<ForecastPoint>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Client for the statistical forecasting microservice.
///
/// All calls run through the retry policy; a forecast is either the
/// service's answer or an error, never a locally fabricated number.
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl ForecastClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Self::with_retry_config(base_url, RetryConfig::default())
    }

    pub fn with_retry_config(base_url: &str, retry_config: RetryConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config,
        })
    }

    /// Fetch a demand forecast for one product.
    pub async fn demand_forecast(
        &self,
        product_id: &str,
        months_ahead: u32,
    ) -> Result<ForecastResponse, RemoteError> {
        let url = format!(
            "{}/forecast/{}?months={}",
            self.base_url, product_id, months_ahead
        );
        let policy = RetryPolicy::new(self.retry_config.clone());
        self.run_with_policy(&policy, &url).await
    }

    /// Probe the service. Uses a reduced retry budget so callers polling
    /// health are not blocked behind a full backoff schedule.
    pub async fn health_check(&self) -> Result<bool, RemoteError> {
        let url = format!("{}/health", self.base_url);
        let policy = RetryPolicy::new(
            self.retry_config
                .clone()
                .max_retries(HEALTH_CHECK_RETRIES),
        );
        match self.run_with_policy::<HealthStatus>(&policy, &url).await {
            Ok(health) => Ok(health.status == "ok"),
            Err(e) => {
                warn!(error = %e, "forecasting service health check failed");
                Err(e)
            }
        }
    }

    async fn run_with_policy<T: serde::de::DeserializeOwned>(
        &self,
        policy: &RetryPolicy,
        url: &str,
    ) -> Result<T, RemoteError> {
        let result = policy
            .execute_if(|| self.get_json::<T>(url), RemoteError::is_retryable)
            .await;
        // A retryable error surviving the policy means the budget ran out.
        result.map_err(|e| {
            if e.is_retryable() {
                RemoteError::RetriesExhausted {
                    attempts: policy.config().max_retries + 1,
                }
            } else {
                e
            }
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ForecastClient::new("http://forecast.local/").unwrap();
        assert_eq!(client.base_url, "http://forecast.local");
    }

    #[test]
    fn forecast_response_deserializes() {
        let json = r#"{
            "product_id": "p-1",
            "points": [
                {"period": "2025-07", "forecast": 120.5, "confidence": 0.8},
                {"period": "2025-08", "forecast": 98.0, "confidence": 0.75}
            ]
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.product_id, "p-1");
        assert_eq!(parsed.points.len(), 2);
        assert_eq!(parsed.points[0].period, "2025-07");
        assert!((parsed.points[1].confidence - 0.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unreachable_host_exhausts_budget() {
        // Connection refused is retryable, so the reduced budget applies and
        // the failure surfaces as exhaustion rather than a raw network error.
        let config = RetryConfig::default()
            .max_retries(1)
            .initial_delay(Duration::from_millis(1))
            .jitter(false);
        let client = ForecastClient::with_retry_config("http://127.0.0.1:1", config).unwrap();
        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, RemoteError::RetriesExhausted { attempts: 2 }));
    }
}
