//! Retry policy for outbound calls.
//!
//! Implements exponential backoff with configurable parameters. The same policy
//! wraps the lyrics lookup, the summarization and the country extraction.

use crate::config::RetrySettings;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy implementing exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_backoff: Duration,
    /// Cap for the exponential growth.
    pub max_backoff: Duration,
    /// Multiplier applied to the backoff after each retry.
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            initial_backoff: Duration::from_secs(settings.initial_backoff_secs),
            max_backoff: Duration::from_secs(settings.max_backoff_secs),
            backoff_multiplier: settings.backoff_multiplier,
        }
    }

    /// A policy that retries without waiting, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Wait before the retry number `retry_count` (0-based).
    ///
    /// `initial_backoff * multiplier^retry_count`, capped at `max_backoff`.
    pub fn backoff(&self, retry_count: u32) -> Duration {
        let secs = self.initial_backoff.as_secs_f64()
            * self.backoff_multiplier.powi(retry_count as i32);
        Duration::from_secs_f64(secs.min(self.max_backoff.as_secs_f64()))
    }

    /// Runs `attempt` until it succeeds or `max_attempts` is exhausted,
    /// sleeping between attempts. Returns the last error on exhaustion.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempts_made = 0;
        loop {
            attempts_made += 1;
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if attempts_made >= self.max_attempts => {
                    warn!(
                        operation = %operation,
                        attempts = attempts_made,
                        error = %err,
                        "Giving up after exhausting retries"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let wait = self.backoff(attempts_made - 1);
                    debug!(
                        operation = %operation,
                        attempt = attempts_made,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetrySettings::default())
    }
}
