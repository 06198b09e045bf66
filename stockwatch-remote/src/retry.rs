//! Retry policy for transient remote failures.
//!
//! Exponential backoff with a delay cap and ±25% jitter so synchronized
//! callers do not retry in lockstep. The policy is generic over the
//! operation and the retryable predicate, so any outbound call can reuse it.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    pub max_retries: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Add ±25% jitter to delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = mult.max(1.0);
        self
    }

    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }
}

/// Exponential backoff calculator.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: RetryConfig,
    attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Get the next delay, or None if max retries exceeded.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.config.max_retries {
            return None;
        }
        let delay = self.calculate_delay();
        self.attempt += 1;
        Some(delay)
    }

    fn calculate_delay(&self) -> Duration {
        let base = self.config.initial_delay.as_millis() as f64;
        let multiplied = base * self.config.multiplier.powi(self.attempt as i32);
        let capped = multiplied.min(self.config.max_delay.as_millis() as f64);

        let delay_ms = if self.config.jitter {
            let spread = capped * 0.25;
            let offset = rand::thread_rng().gen_range(-spread..=spread);
            (capped + offset).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay_ms as u64)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Retry policy for executing operations with retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an async operation, retrying only when `should_retry` says
    /// the error is worth another attempt. The last error is returned when
    /// the budget runs out or the error is not retryable.
    pub async fn execute_if<F, Fut, T, E, C>(&self, mut operation: F, should_retry: C) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Debug,
        C: Fn(&E) -> bool,
    {
        let mut backoff = ExponentialBackoff::new(self.config.clone());

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !should_retry(&e) {
                        return Err(e);
                    }
                    match backoff.next_delay() {
                        Some(delay) => {
                            debug!(
                                attempt = backoff.attempt(),
                                delay_ms = delay.as_millis(),
                                error = ?e,
                                "retrying after transient failure"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn no_jitter(retries: u32) -> RetryConfig {
        RetryConfig::default()
            .max_retries(retries)
            .initial_delay(Duration::from_millis(100))
            .multiplier(2.0)
            .jitter(false)
    }

    #[test]
    fn backoff_doubles_without_jitter() {
        let mut backoff = ExponentialBackoff::new(no_jitter(3));
        assert_eq!(backoff.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay().unwrap(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay().unwrap(), Duration::from_millis(400));
        assert!(backoff.next_delay().is_none());
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let config = no_jitter(10)
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5));
        let mut backoff = ExponentialBackoff::new(config);
        let mut last = Duration::ZERO;
        while let Some(delay) = backoff.next_delay() {
            last = delay;
            assert!(delay <= Duration::from_secs(5));
        }
        assert_eq!(last, Duration::from_secs(5));
    }

    #[test]
    fn jitter_stays_within_quarter_of_base() {
        let config = RetryConfig::default()
            .max_retries(1)
            .initial_delay(Duration::from_millis(1000))
            .jitter(true);
        for _ in 0..100 {
            let mut backoff = ExponentialBackoff::new(config.clone());
            let delay = backoff.next_delay().unwrap().as_millis() as i64;
            assert!((750..=1250).contains(&delay), "delay {delay}ms out of range");
        }
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let policy = RetryPolicy::new(no_jitter(3).initial_delay(Duration::from_millis(1)));
        let attempts = AtomicU32::new(0);

        let result: Result<i32, &str> = policy
            .execute_if(
                || {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Err("transient")
                        } else {
                            Ok(42)
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_makes_exactly_one_attempt() {
        let policy = RetryPolicy::new(no_jitter(5).initial_delay(Duration::from_millis(1)));
        let attempts = AtomicU32::new(0);

        let result: Result<i32, &str> = policy
            .execute_if(
                || {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    async { Err("business error") }
                },
                |_| false,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_last_error() {
        let policy = RetryPolicy::new(no_jitter(2).initial_delay(Duration::from_millis(1)));
        let attempts = AtomicU32::new(0);

        let result: Result<i32, String> = policy
            .execute_if(
                || {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    async move { Err(format!("fail {n}")) }
                },
                |_| true,
            )
            .await;

        // 1 initial try + 2 retries.
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(result.unwrap_err(), "fail 2");
    }
}
