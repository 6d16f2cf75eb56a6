//! Retry policy for transport calls
//!
//! Every failure is retried the same way; there is no transient/permanent
//! classification. With `retry_count = N` an operation is attempted at most
//! `N + 1` times. Under [`BackoffStrategy::Linear`] the wait before the
//! k-th retry is `k * delay`.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};
use zonesync_core::config::{BackoffStrategy, TransferConfig};

/// How many times and how patiently to retry a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub retry_count: u32,
    /// Base delay between attempts
    pub delay: Duration,
    /// How `delay` grows with each retry
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            retry_count: 0,
            delay: Duration::ZERO,
            backoff: BackoffStrategy::Immediate,
        }
    }

    /// Builds the policy described by the transfer settings.
    pub fn from_config(config: &TransferConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            delay: config.retry_delay(),
            backoff: config.backoff,
        }
    }

    /// Wait before the `retry`-th retry (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        match self.backoff {
            BackoffStrategy::Linear => self.delay.saturating_mul(retry),
            BackoffStrategy::Immediate => Duration::ZERO,
        }
    }

    /// Runs `attempt` until it succeeds or the retries are exhausted.
    ///
    /// `attempt` is called afresh for every try so each one can rebuild its
    /// request body. The error of the final attempt is returned.
    pub async fn run<F, Fut, T, E>(&self, operation: &str, mut attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Ok(value) => {
                    if retry > 0 {
                        info!(operation, attempts = retry + 1, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if retry < self.retry_count => {
                    retry += 1;
                    let delay = self.delay_before(retry);
                    warn!(
                        operation,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TransferConfig::default())
    }
}
