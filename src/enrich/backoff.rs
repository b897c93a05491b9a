//! enrich::backoff
//!
//! Exponential retry policy shared by every platform adapter.
//!
//! One policy drives all retries: `{max_attempts, base_delay, multiplier}`
//! with the delay doubling per attempt by default. Whatever error survives
//! the final attempt is returned to the client, which degrades to a
//! fallback record.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::traits::EnrichError;

/// Retry policy for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Multiplier applied to the delay per subsequent retry.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based).
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use packnote::enrich::backoff::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    /// assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    /// assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    /// ```
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(retry as i32);
        self.base_delay.mul_f64(factor.max(0.0))
    }

    /// A policy that never waits, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }
}

/// Run `op` under the policy, sleeping between attempts.
///
/// Returns the first success, or the error from the final attempt once
/// the budget is exhausted.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, EnrichError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EnrichError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        if attempt > 0 {
            tokio::time::sleep(policy.delay_for(attempt - 1)).await;
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                debug!(attempt = attempt + 1, attempts, %err, "fetch attempt failed");
                last_err = Some(err);
            }
        }
    }
    // attempts >= 1, so at least one error was recorded.
    Err(last_err.unwrap_or(EnrichError::Network("no attempts were made".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry(&RetryPolicy::immediate(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, EnrichError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry(&RetryPolicy::immediate(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(EnrichError::Network("flaky".into()))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_budget_and_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry(&RetryPolicy::immediate(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(EnrichError::RateLimited) }
        })
        .await;
        assert!(matches!(result, Err(EnrichError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn delays_double_by_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }
}
