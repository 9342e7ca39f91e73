//! Exponential-backoff retry policy
//!
//! Single decision point for retry-vs-surface across all network-bound
//! playback setup paths. Callers never classify errors themselves; they hand
//! the whole operation to [`RetryPolicy::run`].

use crate::connectivity::ConnectivityMonitor;
use crate::error::{ClientError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Backoff schedule for a retryable operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Default schedule: 3 attempts, 1s initial delay doubling up to 10s.
    pub const fn standard() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
        }
    }

    /// Persistent schedule for flaky links: 5 attempts, 500ms doubling up to 30s.
    pub const fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(30_000),
            backoff_multiplier: 2.0,
        }
    }

    /// One retry after a fixed 2s pause.
    pub const fn single() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(2000),
            backoff_multiplier: 1.0,
        }
    }

    /// Delay before the retry following the given 1-based attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Predicate widening the set of retryable errors for one call site.
pub type ShouldRetry = dyn Fn(&ClientError) -> bool + Send + Sync;

/// Executes operations under a [`RetryConfig`], short-circuiting when the
/// connectivity monitor reports the device offline.
///
/// Holds no per-invocation state; one policy value can serve any number of
/// concurrent call sites.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    monitor: Option<Arc<dyn ConnectivityMonitor>>,
    should_retry: Option<Arc<ShouldRetry>>,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .field("has_monitor", &self.monitor.is_some())
            .field("has_should_retry", &self.should_retry.is_some())
            .finish()
    }
}

impl RetryPolicy {
    /// Create a policy with the given schedule and no connectivity monitor.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            monitor: None,
            should_retry: None,
        }
    }

    /// Attach a connectivity monitor consulted before every attempt.
    pub fn with_monitor(mut self, monitor: Arc<dyn ConnectivityMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Attach a custom predicate that can mark additional errors retryable.
    pub fn with_should_retry(mut self, predicate: Arc<ShouldRetry>) -> Self {
        self.should_retry = Some(predicate);
        self
    }

    /// The active schedule.
    pub fn config(&self) -> RetryConfig {
        self.config
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget runs out.
    ///
    /// Before each attempt (including the first) the connectivity monitor is
    /// consulted; when offline the call fails with
    /// [`ClientError::NoConnection`] without invoking the operation at all.
    /// Non-retryable errors surface immediately and untouched.
    pub async fn run<T, F, Fut>(&self, label: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            if let Some(monitor) = &self.monitor {
                if !monitor.is_connected() {
                    warn!("{label}: offline, not attempting");
                    return Err(ClientError::NoConnection);
                }
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let retryable = error.is_retryable()
                        || self
                            .should_retry
                            .as_ref()
                            .is_some_and(|predicate| predicate(&error));

                    if !retryable || attempt >= self.config.max_attempts {
                        return Err(error);
                    }

                    let delay = self.config.delay_for_attempt(attempt);
                    warn!(
                        "{label} failed (attempt {attempt}/{}): {error}; retrying in {delay:?}",
                        self.config.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::SharedFlagMonitor;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_op(
        calls: Arc<AtomicU32>,
        result: impl Fn(u32) -> Result<u32> + Clone + Send + Sync + 'static,
    ) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>> {
        move || {
            let calls = calls.clone();
            let result = result.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                result(n)
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_exhausts_standard_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::standard());
        let result = policy
            .run("op", counting_op(calls.clone(), |_| Err(ClientError::Timeout)))
            .await;

        assert!(matches!(result, Err(ClientError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_credentials_fail_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::standard());
        let result = policy
            .run(
                "op",
                counting_op(calls.clone(), |_| Err(ClientError::InvalidCredentials)),
            )
            .await;

        assert!(matches!(result, Err(ClientError::InvalidCredentials)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_status_fails_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::standard());
        let result = policy
            .run(
                "op",
                counting_op(calls.clone(), |_| {
                    Err(ClientError::ServerError {
                        status: 404,
                        message: String::new(),
                    })
                }),
            )
            .await;

        assert!(matches!(
            result,
            Err(ClientError::ServerError { status: 404, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn single_config_makes_exactly_two_attempts_on_500() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::single());
        let result = policy
            .run(
                "op",
                counting_op(calls.clone(), |_| {
                    Err(ClientError::ServerError {
                        status: 500,
                        message: String::new(),
                    })
                }),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_later_attempt_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::aggressive());
        let result = policy
            .run(
                "op",
                counting_op(calls.clone(), |n| {
                    if n < 3 {
                        Err(ClientError::Timeout)
                    } else {
                        Ok(n)
                    }
                }),
            )
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn offline_short_circuits_without_invoking_operation() {
        let calls = Arc::new(AtomicU32::new(0));
        let monitor = Arc::new(SharedFlagMonitor::new(false));
        let policy = RetryPolicy::new(RetryConfig::standard()).with_monitor(monitor);
        let result = policy
            .run("op", counting_op(calls.clone(), |n| Ok(n)))
            .await;

        assert!(matches!(result, Err(ClientError::NoConnection)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_predicate_widens_retry_set() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::standard()).with_should_retry(Arc::new(
            |error: &ClientError| matches!(error, ClientError::Api(_)),
        ));
        let result = policy
            .run(
                "op",
                counting_op(calls.clone(), |_| Err(ClientError::Api("flaky".into()))),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let config = RetryConfig::standard();
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(10));
    }
}
