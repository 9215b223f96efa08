//! Bounded retry with exponential backoff and full jitter.
//!
//! Only transient storage contention is retried. Domain errors
//! propagate on the first attempt; an exhausted retry budget surfaces
//! as `ConcurrencyConflict`.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use super::error::WalletError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Backoff ceiling for a 1-based attempt number:
    /// `min(base * 2^(attempt-1), max)`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1u32 << shift)
            .min(self.max_backoff)
    }
}

/// SQLSTATE codes PostgreSQL raises for transient contention:
/// serialization failure, deadlock, lock-wait timeout.
const RETRYABLE_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

/// Whether an error is safe to retry.
pub fn is_retryable(err: &WalletError) -> bool {
    match err {
        WalletError::Database(sqlx::Error::PoolTimedOut) => true,
        WalletError::Database(sqlx::Error::Database(db)) => db
            .code()
            .as_deref()
            .map(|code| RETRYABLE_SQLSTATES.contains(&code))
            .unwrap_or(false),
        _ => false,
    }
}

/// Run `op` until it succeeds, a non-retryable error surfaces, or the
/// retry budget is exhausted.
pub async fn execute_with_retry<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, WalletError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, WalletError>>,
{
    let max_retries = policy.max_retries.max(1);
    for attempt in 1..=max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) => {
                if attempt == max_retries {
                    tracing::warn!(error = %err, attempt, "Retry budget exhausted");
                    return Err(WalletError::ConcurrencyConflict);
                }
                let ceiling = policy.backoff_for(attempt).as_millis() as u64;
                let sleep_ms = rand::thread_rng().gen_range(0..=ceiling);
                tracing::warn!(
                    error = %err,
                    attempt,
                    max_retries,
                    backoff_ms = sleep_ms,
                    "Transient contention, retrying"
                );
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            }
            Err(err) => return Err(err),
        }
    }
    Err(WalletError::ConcurrencyConflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    fn transient() -> WalletError {
        WalletError::Database(sqlx::Error::PoolTimedOut)
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_for(5), Duration::from_millis(1600));
        assert_eq!(policy.backoff_for(6), Duration::from_millis(2000));
        assert_eq!(policy.backoff_for(60), Duration::from_millis(2000));
    }

    #[test]
    fn test_classification() {
        assert!(is_retryable(&transient()));
        assert!(!is_retryable(&WalletError::InvalidIdempotencyKey));
        assert!(!is_retryable(&WalletError::IdempotencyKeyAlreadyUsed));
        assert!(!is_retryable(&WalletError::AssetNotFound("GOLD".into())));
        assert!(!is_retryable(&WalletError::ConcurrencyConflict));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry(&fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, WalletError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_domain_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = execute_with_retry(&fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(WalletError::InvalidIdempotencyKey)
        })
        .await;
        assert!(matches!(result, Err(WalletError::InvalidIdempotencyKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_becomes_concurrency_conflict() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = execute_with_retry(&fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        })
        .await;
        assert!(matches!(result, Err(WalletError::ConcurrencyConflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry(&fast_policy(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(transient())
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
