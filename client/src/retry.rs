use crate::cancel::CancelToken;
use crate::error::ClientError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * 2^attempt`, the default curve.
    Exponential { base: Duration },
    /// Constant delay, for operations needing a gentler curve.
    Fixed { delay: Duration },
}

impl Backoff {
    /// Delay before the retry following failed attempt `attempt`
    /// (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Exponential { base } => {
                base.saturating_mul(2u32.saturating_pow(attempt))
            }
            Self::Fixed { delay } => *delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(250))
    }
}

impl RetryPolicy {
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { base },
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed { delay },
        }
    }
}

/// Run `op` under bounded retries. Only transient failures (no response,
/// timeout, 5xx) are retried; anything else surfaces immediately. Once
/// `max_attempts` are spent the final failure comes back wrapped in
/// `RetryExhausted` rather than retrying silently forever.
///
/// Both in-flight attempts and backoff sleeps race the cancellation
/// token; a cancelled attempt does not count against `max_attempts` and
/// triggers no further retry.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = op() => result,
        };
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => err,
            Err(err) => return Err(err),
        };
        attempt += 1;
        if attempt >= policy.max_attempts {
            return Err(ClientError::RetryExhausted {
                attempts: policy.max_attempts.max(1),
                source: Box::new(err),
            });
        }
        let delay = policy.backoff.delay(attempt - 1);
        tracing::debug!(attempt, ?delay, "transient failure, retrying: {err}");
        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelSource;
    use reqwest::StatusCode;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn http_error(status: StatusCode) -> ClientError {
        ClientError::Api {
            status,
            message: "simulated".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn service_unavailable_is_attempted_exactly_max_attempts_times() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(
            &RetryPolicy::fixed(3, Duration::from_millis(10)),
            &CancelToken::never(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(http_error(StatusCode::SERVICE_UNAVAILABLE)) }
            },
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            ClientError::RetryExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, ClientError::Api { status, .. }
                    if status == StatusCode::SERVICE_UNAVAILABLE));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bad_request_is_attempted_exactly_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(
            &RetryPolicy::default(),
            &CancelToken::never(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(http_error(StatusCode::BAD_REQUEST)) }
            },
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result.unwrap_err(), ClientError::Api { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_when_a_later_attempt_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = with_retry(
            &RetryPolicy::exponential(5, Duration::from_millis(100)),
            &CancelToken::never(),
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ClientError::Timeout)
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_attempt_without_counting_it() {
        let source = CancelSource::new();
        let token = source.token();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let handle = tokio::spawn(async move {
            with_retry(
                &RetryPolicy::fixed(5, Duration::from_millis(10)),
                &token,
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok::<_, ClientError>(())
                    }
                },
            )
            .await
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        source.cancel();
        let result = handle.await.unwrap();
        assert!(matches!(result.unwrap_err(), ClientError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exponential_backoff_doubles_per_attempt() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(250),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(250));
        assert_eq!(backoff.delay(1), Duration::from_millis(500));
        assert_eq!(backoff.delay(2), Duration::from_millis(1000));
    }
}
