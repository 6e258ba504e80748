//! Retry configuration for transient failures.

use std::time::Duration;

use crate::Error;

/// How [`RestClient`](crate::RestClient) retries a failed GET.
///
/// Network errors, timeouts and 5xx responses are retried with exponential
/// backoff; a `Retry-After` header replaces the computed delay. Everything
/// else, 429 included, is returned to the controller on the first attempt.
///
/// ## Default Values
///
/// - `max_retries`: 3
/// - `initial_delay`: 1s
/// - `max_delay`: 10s
/// - `multiplier`: 2.0
/// - `jitter`: 0.0
///
/// ## Example
///
/// ```rust
/// use ancine_query::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_initial_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first request; `0` disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Maximum delay between retries.
    pub max_delay: Duration,

    /// Multiplier for exponential backoff.
    pub multiplier: f64,

    /// Fraction of the delay (0.0 to 1.0) randomly added or removed.
    pub jitter: f64,

    /// Whether to retry on timeout errors.
    pub retry_on_timeout: bool,

    /// Whether to retry on connection errors.
    pub retry_on_connection_error: bool,

    /// Whether to retry on 5xx responses.
    pub retry_on_server_error: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.0,
            retry_on_timeout: true,
            retry_on_connection_error: true,
            retry_on_server_error: true,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that disables retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retry attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the exponential backoff multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter factor.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Sets whether to retry on timeout errors.
    #[must_use]
    pub fn with_retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Sets whether to retry on connection errors.
    #[must_use]
    pub fn with_retry_on_connection_error(mut self, retry: bool) -> Self {
        self.retry_on_connection_error = retry;
        self
    }

    /// Sets whether to retry on 5xx responses.
    #[must_use]
    pub fn with_retry_on_server_error(mut self, retry: bool) -> Self {
        self.retry_on_server_error = retry;
        self
    }

    /// Calculates the delay for a given retry attempt.
    ///
    /// Uses exponential backoff: `initial_delay * multiplier^(attempt - 1)`
    /// capped at `max_delay`, with optional jitter. Attempt `0` is the
    /// original request and has no delay.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay =
            self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32 - 1);
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64());

        let jittered = if self.jitter > 0.0 {
            let jitter_range = capped_delay * self.jitter;
            let jitter_offset = (fastrand::f64() - 0.5) * 2.0 * jitter_range;
            (capped_delay + jitter_offset).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_secs_f64(jittered)
    }

    /// Returns `true` if `error` should be retried under this configuration.
    pub fn should_retry(&self, error: &Error) -> bool {
        let kind = error.kind();
        (kind.is_network() && self.retry_on_connection_error)
            || (kind.is_timeout() && self.retry_on_timeout)
            || (kind.is_server_error() && self.retry_on_server_error)
    }

    /// Returns `true` if retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }
}
