//! Supported chat-completion backends.
//!
//! Both backends speak the same OpenAI-compatible chat completions protocol;
//! they differ in endpoint, model catalogue and how errors are worded.

use std::fmt;
use std::str::FromStr;

use crate::client::TransportError;
use crate::error::ProviderErrorKind;

/// Chat-completion backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    OpenAi,
    DeepSeek,
}

/// Substrings marking transient network failures in any provider's errors.
const RETRYABLE_PATTERNS: &[&str] = &[
    "econnreset",
    "connection reset",
    "etimedout",
    "timed out",
    "enotfound",
    "host not found",
    "dns",
    "econnrefused",
    "socket hang up",
    "broken pipe",
];

impl ProviderKind {
    /// All supported backends.
    pub const ALL: [Self; 2] = [Self::OpenAi, Self::DeepSeek];

    /// Name used in configuration, logs and error tags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::DeepSeek => "deepseek-chat",
        }
    }

    /// Models offered by this backend.
    #[must_use]
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"],
            Self::DeepSeek => &["deepseek-chat", "deepseek-reasoner"],
        }
    }

    /// Retryable error substrings for this backend.
    #[must_use]
    pub fn retryable_patterns(self) -> Vec<String> {
        let mut patterns: Vec<String> = RETRYABLE_PATTERNS.iter().map(|&p| p.to_owned()).collect();
        if self == Self::DeepSeek {
            // DeepSeek reports overload as a 503 with this wording.
            patterns.push("server is busy".to_owned());
        }
        patterns
    }

    /// The other backend, used as the default fallback.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::OpenAi => Self::DeepSeek,
            Self::DeepSeek => Self::OpenAi,
        }
    }

    /// Map a transport failure onto the shared error taxonomy.
    ///
    /// This is the only place raw provider errors are inspected.
    #[must_use]
    pub fn classify(self, error: &TransportError) -> ProviderErrorKind {
        match error {
            TransportError::Network(message) => ProviderErrorKind::Connection(message.clone()),
            TransportError::Timeout(message) => ProviderErrorKind::Timeout(message.clone()),
            TransportError::Other(message) => ProviderErrorKind::Generation(message.clone()),
            TransportError::Status {
                status,
                body,
                retry_after,
            } => self.classify_status(*status, body, *retry_after),
        }
    }

    fn classify_status(
        self,
        status: u16,
        body: &str,
        retry_after: Option<std::time::Duration>,
    ) -> ProviderErrorKind {
        let message = format!("HTTP {status}: {}", body.trim());
        let lower = body.to_ascii_lowercase();
        match (self, status) {
            (_, 401 | 403) => ProviderErrorKind::Authentication(message),
            (Self::DeepSeek, 402) => ProviderErrorKind::QuotaExceeded(message),
            (Self::OpenAi, 429) if lower.contains("insufficient_quota") => {
                ProviderErrorKind::QuotaExceeded(message)
            }
            (_, 429) => ProviderErrorKind::RateLimit {
                message,
                retry_after,
            },
            (_, 408 | 504) => ProviderErrorKind::Timeout(message),
            (_, 500..=599) => ProviderErrorKind::Connection(message),
            _ if lower.contains("invalid api key") || lower.contains("incorrect api key") => {
                ProviderErrorKind::Authentication(message)
            }
            _ => ProviderErrorKind::Generation(message),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected 'openai' or 'deepseek')")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "deepseek" => Ok(Self::DeepSeek),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}
