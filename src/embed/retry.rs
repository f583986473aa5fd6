//! Retry policy for embedding provider calls (spec §4.7).
//!
//! An explicit loop rather than a retry-middleware crate, matching the
//! design note in spec.md §9 ("retry as an explicit loop"): 100ms initial
//! backoff, x2.0 multiplier, 2s cap, 3 attempts total, non-retryable errors
//! surfaced immediately, cancellation aborts a pending backoff sleep instead
//! of completing it.

use crate::error::CoreError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const BACKOFF_MULTIPLIER: f64 = 2.0;
const MAX_BACKOFF: Duration = Duration::from_secs(2);
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug)]
pub enum RetryOutcome<T> {
    Completed(T),
    Cancelled,
}

/// Run `op` up to [`MAX_ATTEMPTS`] times, backing off between retryable
/// failures. Returns `Cancelled` if `token` fires while waiting out a
/// backoff sleep; otherwise returns the operation's final `Result`.
pub async fn with_retry<T, F, Fut>(
    token: &CancellationToken,
    mut op: F,
) -> RetryOutcome<Result<T, CoreError>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return RetryOutcome::Completed(Ok(value)),
            Err(err) => {
                if !err.is_retryable() || attempt >= MAX_ATTEMPTS {
                    return RetryOutcome::Completed(Err(err));
                }
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = token.cancelled() => return RetryOutcome::Cancelled,
                }
                backoff = std::cmp::min(
                    Duration::from_secs_f64(backoff.as_secs_f64() * BACKOFF_MULTIPLIER),
                    MAX_BACKOFF,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let token = CancellationToken::new();
        let result = with_retry(&token, move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(CoreError::invalid_input("bad"))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, RetryOutcome::Completed(Err(_))));
    }

    #[tokio::test]
    async fn retryable_error_retries_up_to_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let token = CancellationToken::new();
        let result = with_retry(&token, move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(CoreError::ProviderUnavailable("timeout".into()))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
        assert!(matches!(result, RetryOutcome::Completed(Err(_))));
    }

    #[tokio::test]
    async fn succeeds_after_one_retryable_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let token = CancellationToken::new();
        let result = with_retry(&token, move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(CoreError::ProviderUnavailable("timeout".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert!(matches!(result, RetryOutcome::Completed(Ok(42))));
    }

    #[tokio::test]
    async fn cancellation_aborts_pending_backoff() {
        let token = CancellationToken::new();
        let token_clone = token.clone();
        token.cancel();
        let result = with_retry(&token_clone, || async {
            Err::<i32, _>(CoreError::ProviderUnavailable("timeout".into()))
        })
        .await;
        assert!(matches!(result, RetryOutcome::Cancelled));
    }
}
