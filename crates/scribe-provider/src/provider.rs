//! Provider trait.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse, HealthCheck};

/// A chat-completion backend.
///
/// Implementations apply their own retry policy inside
/// [`generate_completion`](Provider::generate_completion); callers see a single
/// call that either succeeds or fails with a classified [`ProviderError`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name used in logs, error tags and health reports.
    fn name(&self) -> &str;

    /// Generate a completion, retrying transient failures.
    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Probe the backend with a minimal request. Never retried, never fails:
    /// errors are reported as an unhealthy check.
    async fn check_health(&self) -> HealthCheck;

    /// Whether the configuration is usable (key present, endpoint well-formed).
    fn validate_config(&self) -> bool;

    /// Model identifiers this backend accepts.
    fn available_models(&self) -> Vec<String>;
}
