//! Retry with linearly increasing backoff for static page fetches.
//!
//! Every failure is treated as transient: a listing page that 500s or comes
//! back empty often recovers a moment later, and the caller only cares
//! whether any attempt produced a body.

use std::future::Future;
use std::time::Duration;

use crate::error::ExtractError;

/// Executes `operation` up to `max_attempts` times in total.
///
/// After failed attempt `n` (1-based) the function sleeps `backoff_base * n`
/// before trying again. The last error is returned once attempts run out.
///
/// | Attempt | Sleep before next attempt (base = 1 s) |
/// |---------|----------------------------------------|
/// | 1 | 1 s |
/// | 2 | 2 s |
/// | 3 | none, error returned |
pub(crate) async fn retry_linear<T, F, Fut>(
    max_attempts: u32,
    backoff_base: Duration,
    mut operation: F,
) -> Result<T, ExtractError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ExtractError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err);
                }
                let delay = backoff_base.saturating_mul(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "page fetch failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ExtractError {
        ExtractError::UnexpectedStatus {
            status: 500,
            url: "https://example.com/listing".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_linear(3, Duration::ZERO, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ExtractError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let result = retry_linear(3, Duration::ZERO, |attempt| async move {
            if attempt < 3 {
                Err(server_error())
            } else {
                Ok::<u32, ExtractError>(attempt)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_linear(3, Duration::ZERO, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ExtractError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ExtractError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_grows_linearly() {
        let start = tokio::time::Instant::now();
        let _ = retry_linear(3, Duration::from_millis(100), |_| async {
            Err::<(), ExtractError>(server_error())
        })
        .await;
        // 100 ms after attempt 1, 200 ms after attempt 2, nothing after 3.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let _ = retry_linear(0, Duration::ZERO, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<(), ExtractError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
