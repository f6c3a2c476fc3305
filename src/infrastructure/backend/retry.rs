//! Retry policy with exponential backoff for backend requests.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::BackendError;
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff.
///
/// Backoff doubles with each retry, capped at `max_backoff_ms`. Only
/// transient errors are retried; permanent errors surface immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation with exponential backoff retry logic.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, BackendError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.should_retry(&err, attempt) {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            "Attempt {} failed with transient error: {}. Retrying in {:?}...",
                            attempt + 1,
                            err,
                            backoff
                        );

                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if attempt >= self.max_retries {
                            warn!("Operation failed after {} attempts: {}", attempt + 1, err);
                        } else {
                            debug!("Permanent error, not retrying: {}", err);
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    /// min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    fn should_retry(&self, error: &BackendError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        error.is_transient()
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::new(5, 1000, 60000);

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(4000));
        assert_eq!(policy.calculate_backoff(3), Duration::from_millis(8000));
        assert_eq!(policy.calculate_backoff(6), Duration::from_millis(60000)); // capped
    }

    #[test]
    fn test_should_retry_transient_errors() {
        let policy = RetryPolicy::new(3, 100, 1000);

        assert!(policy.should_retry(&BackendError::RateLimitExceeded, 0));
        assert!(policy.should_retry(&BackendError::Timeout, 1));
        assert!(policy.should_retry(
            &BackendError::ServerError {
                status: 500,
                body: "test".to_string()
            },
            2
        ));
    }

    #[test]
    fn test_should_not_retry_permanent_errors() {
        let policy = RetryPolicy::new(3, 100, 1000);

        assert!(!policy.should_retry(&BackendError::InvalidRequest("bad".to_string()), 0));
        assert!(!policy.should_retry(&BackendError::UnexpectedResponse("odd".to_string()), 0));
    }

    #[test]
    fn test_should_not_retry_after_max_attempts() {
        let policy = RetryPolicy::new(3, 100, 1000);

        assert!(!policy.should_retry(&BackendError::RateLimitExceeded, 3));
        assert!(!policy.should_retry(&BackendError::Timeout, 4));
    }

    #[tokio::test]
    async fn test_execute_succeeds_immediately() {
        let policy = RetryPolicy::new(3, 10, 100);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<i32, BackendError>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_on_transient_error() {
        let policy = RetryPolicy::new(3, 10, 100);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(BackendError::RateLimitExceeded)
                    } else {
                        Ok::<i32, BackendError>(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_fails_on_permanent_error() {
        let policy = RetryPolicy::new(3, 10, 100);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, BackendError>(BackendError::InvalidRequest("bad".to_string()))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_fails_after_max_retries() {
        let policy = RetryPolicy::new(2, 10, 100);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, BackendError>(BackendError::RateLimitExceeded)
                }
            })
            .await;

        assert!(result.is_err());
        // Initial attempt + 2 retries
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_max_retries_disables_retrying() {
        let policy = RetryPolicy::new(0, 10, 100);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, BackendError>(BackendError::Timeout)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
