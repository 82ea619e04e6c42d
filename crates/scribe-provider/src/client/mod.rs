//! OpenAI-compatible chat completions client.
//!
//! One client serves both backends; [`ProviderKind`] supplies the endpoint,
//! model catalogue and error classification.

mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info};

pub use transport::{ChatTransport, TransportError, UreqTransport};

use crate::config::{ProviderConfig, RetryPolicy};
use crate::error::{ProviderError, ProviderErrorKind};
use crate::kind::ProviderKind;
use crate::normalize::strip_code_fences;
use crate::provider::Provider;
use crate::retry::with_retry;
use crate::types::{CompletionRequest, CompletionResponse, HealthCheck, Message, Usage};

/// Chat completions response body (fields we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions provider for one backend.
pub struct ChatProvider {
    kind: ProviderKind,
    config: ProviderConfig,
    retry: RetryPolicy,
    api_key: String,
    transport: Arc<dyn ChatTransport>,
}

impl ChatProvider {
    /// Create a provider talking to the real endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::Authentication`] if the config has no API key.
    pub fn new(kind: ProviderKind, config: ProviderConfig) -> Result<Self, ProviderError> {
        let transport = Arc::new(UreqTransport::new(config.timeout));
        Self::with_transport(kind, config, transport)
    }

    /// Create a provider over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::Authentication`] if the config has no API key.
    pub fn with_transport(
        kind: ProviderKind,
        config: ProviderConfig,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<Self, ProviderError> {
        let api_key = config.api_key().map(str::to_owned).ok_or_else(|| {
            ProviderError::new(
                kind.name(),
                ProviderErrorKind::Authentication("API key is not configured".to_owned()),
            )
        })?;
        let retry = RetryPolicy::for_kind(kind, config.max_retries);
        Ok(Self {
            kind,
            config,
            retry,
            api_key,
            transport,
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn error(&self, kind: ProviderErrorKind) -> ProviderError {
        ProviderError::new(self.kind.name(), kind)
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model.as_deref().unwrap_or(&self.config.model),
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(self.config.temperature),
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
        })
    }

    /// One request, no retries.
    async fn request_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let transport = Arc::clone(&self.transport);
        let url = self.config.completions_url();
        let api_key = self.api_key.clone();
        let body = self.request_body(request);

        debug!(provider = self.kind.name(), url = %url, "Sending chat completion request");

        let raw = tokio::task::spawn_blocking(move || transport.post_json(&url, &api_key, &body))
            .await
            .map_err(|err| self.error(ProviderErrorKind::Generation(err.to_string())))?
            .map_err(|err| self.error(self.kind.classify(&err)))?;

        self.parse_response(&raw, request)
    }

    fn parse_response(
        &self,
        raw: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let response: ChatResponse = serde_json::from_str(raw).map_err(|err| {
            self.error(ProviderErrorKind::Generation(format!(
                "invalid response body: {err}"
            )))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                self.error(ProviderErrorKind::Generation(
                    "response contained no content".to_owned(),
                ))
            })?;

        let model = response
            .model
            .or_else(|| request.model.clone())
            .unwrap_or_else(|| self.config.model.clone());

        Ok(CompletionResponse {
            content: strip_code_fences(&content),
            usage: response.usage,
            model,
            provider_name: self.kind.name().to_owned(),
        })
    }
}

#[async_trait]
impl Provider for ChatProvider {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let response = with_retry(&self.retry, || self.request_once(&request)).await?;
        info!(
            provider = self.kind.name(),
            model = %response.model,
            tokens = response.usage.map(|usage| usage.total_tokens),
            "Completion generated"
        );
        Ok(response)
    }

    async fn check_health(&self) -> HealthCheck {
        let probe = CompletionRequest::new(vec![Message::user("ping")]).with_max_tokens(1);
        let started = Instant::now();
        let result = self.request_once(&probe).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheck::from_latency(latency_ms),
            Err(err) => HealthCheck::failed(Some(latency_ms), err.message()),
        }
    }

    fn validate_config(&self) -> bool {
        let url = self.config.base_url.trim();
        !self.api_key.is_empty()
            && (url.starts_with("https://") || url.starts_with("http://"))
            && !self.config.model.trim().is_empty()
    }

    fn available_models(&self) -> Vec<String> {
        self.kind.models().iter().map(|&model| model.to_owned()).collect()
    }
}
