//! Provider error taxonomy.

use std::time::Duration;

/// Error from a provider call, tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider}: {kind}")]
pub struct ProviderError {
    /// Provider name (`openai`, `deepseek`, ...).
    pub provider: String,
    /// What went wrong.
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, kind: ProviderErrorKind) -> Self {
        Self {
            provider: provider.into(),
            kind,
        }
    }

    /// Underlying error message, without the provider prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        self.kind.message()
    }
}

/// Fixed error classes shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderErrorKind {
    /// Missing or rejected API key. Never retried.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Too many requests.
    #[error("rate limited: {message}")]
    RateLimit {
        message: String,
        /// Server-supplied wait hint, informational only.
        retry_after: Option<Duration>,
    },

    /// Account quota or balance exhausted. Never retried.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network failure reaching the provider.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Request exceeded the transport timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Anything else, including total failover failure.
    #[error("generation failed: {0}")]
    Generation(String),
}

impl ProviderErrorKind {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication(message)
            | Self::RateLimit { message, .. }
            | Self::QuotaExceeded(message)
            | Self::Connection(message)
            | Self::Timeout(message)
            | Self::Generation(message) => message,
        }
    }

    /// Connection and timeout failures are always worth another attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}
