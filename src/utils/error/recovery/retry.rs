//! Retry mechanism with exponential backoff

use super::types::RetryConfig;
use std::time::Duration;
use tracing::{debug, error};

/// Retry mechanism with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get the underlying configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a function, retrying every error
    pub async fn call<F, Fut, R, E>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display + std::fmt::Debug,
    {
        self.call_if(f, |_| true).await
    }

    /// Execute a function, retrying only errors accepted by `should_retry`.
    ///
    /// Errors rejected by the predicate are returned immediately.
    pub async fn call_if<F, Fut, R, E, P>(&self, f: F, should_retry: P) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display + std::fmt::Debug,
        P: Fn(&E) -> bool,
    {
        self.call_with_hint(f, should_retry, |_| None).await
    }

    /// Like [`call_if`](Self::call_if), but never waits less than the delay
    /// `hint` reads off the error, such as a server's retry-after.
    pub async fn call_with_hint<F, Fut, R, E, P, H>(
        &self,
        mut f: F,
        should_retry: P,
        hint: H,
    ) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display + std::fmt::Debug,
        P: Fn(&E) -> bool,
        H: Fn(&E) -> Option<Duration>,
    {
        let mut attempt = 0;
        let mut delay = self.config.base_delay;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !should_retry(&error) {
                        return Err(error);
                    }

                    if attempt >= self.config.max_attempts {
                        error!("Retry failed after {} attempts: {}", attempt, error);
                        return Err(error);
                    }

                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, delay
                    );

                    let backoff = if self.config.jitter {
                        let jitter_factor = 0.1;
                        let jitter = delay.as_millis() as f64
                            * jitter_factor
                            * (rand::random::<f64>() - 0.5);
                        Duration::from_millis((delay.as_millis() as f64 + jitter) as u64)
                    } else {
                        delay
                    };
                    let actual_delay = match hint(&error) {
                        Some(floor) if floor > backoff => {
                            debug!("Honouring retry hint of {:?}", floor);
                            floor
                        }
                        _ => backoff,
                    };

                    tokio::time::sleep(actual_delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.config.backoff_multiplier) as u64,
                        ),
                        self.config.max_delay,
                    );
                }
            }
        }
    }
}
