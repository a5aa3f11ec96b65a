//! Retry with exponential backoff for provider calls.

use crate::inference::types::InferenceError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default maximum number of retries for transient errors
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for exponential backoff (in milliseconds)
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Maximum delay cap (in milliseconds)
pub const MAX_DELAY_MS: u64 = 30000;

/// Retry configuration shared by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts for failed requests
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Creates a new retry config with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub const fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    /// Delay before retry number `attempt` (zero-based), with up to 25% jitter.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX));
        let capped_delay = delay_ms.min(MAX_DELAY_MS);

        let jitter = capped_delay
            .saturating_mul(jitter_factor())
            .saturating_div(4000);
        Duration::from_millis(capped_delay.saturating_add(jitter))
    }

    /// Runs `op` until it succeeds, fails permanently or retries run out.
    ///
    /// A `RateLimited` error carrying a retry-after hint waits at least that
    /// long.
    ///
    /// # Errors
    ///
    /// Returns the last error once no further attempt is made.
    pub async fn run<T, F, Fut>(&self, provider: &str, mut op: F) -> Result<T, InferenceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, InferenceError>>,
    {
        let mut attempt = 0;
        loop {
            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= self.max_retries {
                debug!(provider, attempts = attempt + 1, error = %error, "Giving up on provider request");
                return Err(error);
            }

            let mut delay = self.backoff_delay(attempt);
            if let InferenceError::RateLimited {
                retry_after: Some(hint),
            } = &error
            {
                delay = delay.max(*hint);
            }

            warn!(
                provider,
                attempt = attempt + 1,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Provider request failed, retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Pseudo-random value in `[0, 1000)` derived from the clock.
fn jitter_factor() -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos % 1000)
}
