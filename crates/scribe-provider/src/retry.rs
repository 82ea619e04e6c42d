//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use rand::RngExt;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::ProviderError;

/// Symmetric jitter applied to every backoff delay (±25%).
const JITTER: f64 = 0.25;

impl RetryPolicy {
    /// Whether a failure should be retried (attempt budget aside).
    ///
    /// Connection and timeout failures always qualify. Other classes qualify
    /// only when their message contains one of the retryable substrings.
    #[must_use]
    pub fn is_retryable(&self, error: &ProviderError) -> bool {
        if error.kind.is_transient() {
            return true;
        }
        let message = error.message().to_ascii_lowercase();
        self.retryable_patterns
            .iter()
            .any(|pattern| message.contains(pattern.as_str()))
    }

    /// Pre-jitter delay before retry number `attempt` (0-based):
    /// `min(base * 2^attempt, max)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Backoff delay with jitter applied.
    #[must_use]
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let factor = rand::rng().random_range((1.0 - JITTER)..=(1.0 + JITTER));
        self.backoff_delay(attempt).mul_f64(factor)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt budget is spent. Returns the last error unchanged.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && policy.is_retryable(&err) => {
                let delay = policy.jittered_delay(attempt);
                warn!(
                    provider = %err.provider,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err.kind,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
