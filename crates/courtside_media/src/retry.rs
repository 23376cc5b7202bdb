//! Bounded retry shared by the uploader and the access-URL resolver.
//!
//! All internal retries in the pipeline go through this one helper so the
//! retry surface stays bounded and visible: an operation, a maximum attempt
//! count, and an exponential backoff with jitter. Callers classify their own
//! failures as transient or permanent.

use courtside_error::CourtsideError;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};

/// Bounded retry parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    /// Initial backoff before the second attempt
    pub initial_backoff_ms: u64,
    /// Ceiling on any single backoff delay
    pub max_delay_secs: u64,
}

impl RetryPolicy {
    /// One retry after the initial attempt.
    ///
    /// This is the only retry depth the pipeline uses: the uploader's
    /// forced-refresh credential retry and the resolver's refresh retry are
    /// both a single bounded extra attempt.
    pub fn once_more() -> Self {
        Self {
            max_attempts: 2,
            initial_backoff_ms: 250,
            max_delay_secs: 2,
        }
    }
}

/// Run `operation` under `policy`.
///
/// The operation returns `RetryError::Transient` to request another attempt
/// or `RetryError::Permanent` to fail immediately; the final transient error
/// is returned once attempts are exhausted.
///
/// # Errors
///
/// Returns the operation's error after the last attempt fails.
pub async fn run_with_retry<T, F, Fut>(policy: RetryPolicy, operation: F) -> Result<T, CourtsideError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<CourtsideError>>>,
{
    let strategy = ExponentialBackoff::from_millis(policy.initial_backoff_ms)
        .factor(2)
        .max_delay(Duration::from_secs(policy.max_delay_secs))
        .map(jitter)
        .take(policy.max_attempts.saturating_sub(1));

    Retry::spawn(strategy, operation).await
}
