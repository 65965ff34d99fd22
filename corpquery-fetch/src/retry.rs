//! Retry strategy and the retrying fetcher.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::transport::{FetchRequest, FetchResponse, Transport};

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 2;

/// Default fixed delay between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before each retry.
    pub delay: Duration,
}

impl RetryStrategy {
    /// Creates a new retry strategy with the default delay.
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            delay: DEFAULT_DELAY,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Runs `op` until it succeeds or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES)
    }
}

/// Sends `request` through `transport`, retrying failures.
///
/// Transport errors and statuses outside 2xx/3xx both count as failures.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    request: &FetchRequest,
    strategy: &RetryStrategy,
) -> Result<FetchResponse, FetchError> {
    strategy
        .run(|attempt| async move {
            debug!(url = %request.url, attempt, "Sending request");
            let response = transport.send(request).await?;

            if response.is_ok() {
                Ok(response)
            } else {
                Err(FetchError::Status {
                    status: response.status,
                    url: request.url.to_string(),
                })
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockReply, MockTransport};
    use reqwest::StatusCode;
    use std::time::Instant;

    const URL: &str = "https://registry.example/search";

    fn fast(retries: u32) -> RetryStrategy {
        RetryStrategy::new(retries).with_delay(Duration::ZERO)
    }

    #[test]
    fn test_defaults() {
        let strategy = RetryStrategy::default();
        assert_eq!(strategy.retries, 2);
        assert_eq!(strategy.delay, Duration::from_secs(1));
        assert_eq!(strategy.max_attempts(), 3);
        assert_eq!(RetryStrategy::no_retry().max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_fails_twice_then_succeeds() {
        let transport = MockTransport::new()
            .fail("registry.example", "connection reset")
            .fail("registry.example", "connection reset")
            .respond("registry.example", 200, "ok");
        let request = FetchRequest::parse(URL).unwrap();

        let response = fetch_with_retry(&transport, &request, &fast(2)).await.unwrap();

        assert_eq!(response.body, "ok");
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_always_failing_gives_up_after_retries_plus_one() {
        let transport = MockTransport::new().fail("registry.example", "refused");
        let request = FetchRequest::parse(URL).unwrap();

        let err = fetch_with_retry(&transport, &request, &fast(2)).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_retried() {
        let transport = MockTransport::new()
            .respond("registry.example", 503, "busy")
            .respond("registry.example", 200, "ok");
        let request = FetchRequest::parse(URL).unwrap();

        let response = fetch_with_retry(&transport, &request, &fast(2)).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_last_status_error_is_surfaced() {
        let transport = MockTransport::new().respond("registry.example", 403, "denied");
        let request = FetchRequest::parse(URL).unwrap();

        let err = fetch_with_retry(&transport, &request, &fast(1)).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_makes_single_call() {
        let transport = MockTransport::new().on("registry.example", MockReply::error("down"));
        let request = FetchRequest::parse(URL).unwrap();

        assert!(fetch_with_retry(&transport, &request, &RetryStrategy::no_retry())
            .await
            .is_err());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_fixed_delay_between_attempts() {
        let transport = MockTransport::new().fail("registry.example", "refused");
        let request = FetchRequest::parse(URL).unwrap();
        let strategy = RetryStrategy::new(2).with_delay(Duration::from_millis(20));

        let start = Instant::now();
        let _ = fetch_with_retry(&transport, &request, &strategy).await;

        // Two sleeps: after attempt 1 and attempt 2, none after the last.
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(transport.calls(), 3);
    }
}
