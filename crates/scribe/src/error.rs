//! CLI error types.

use scribe_config::ConfigError;
use scribe_provider::{ProviderError, UnknownProvider};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    UnknownProvider(#[from] UnknownProvider),

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
