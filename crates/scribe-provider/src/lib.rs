//! AI chat-completion providers for content generation.
//!
//! - [`Provider`]: async trait every backend implements.
//! - [`ChatProvider`]: OpenAI-compatible client used for both OpenAI and
//!   DeepSeek, selected by [`ProviderKind`].
//! - [`with_retry`]: exponential backoff with jitter around transient failures.
//! - [`ProviderFactory`]: primary/fallback selection with a health cache.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use scribe_provider::{
//!     ContentRequest, ContentType, FactorySettings, ProviderConfig, ProviderFactory, ProviderKind,
//! };
//!
//! # async fn example() -> Result<(), scribe_provider::ProviderError> {
//! let configs = HashMap::from([(
//!     ProviderKind::OpenAi,
//!     ProviderConfig::for_kind(ProviderKind::OpenAi).with_api_key("sk-..."),
//! )]);
//! let factory = ProviderFactory::from_configs(&FactorySettings::default(), &configs)?;
//!
//! let request = ContentRequest::new("Ownership", ContentType::Snippet, "You write docs.");
//! let response = factory.generate_content(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod factory;
mod kind;
mod normalize;
mod prompt;
mod provider;
mod retry;
mod types;

pub use client::{ChatProvider, ChatTransport, TransportError, UreqTransport};
pub use config::{
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, ProviderConfig,
    RetryPolicy,
};
pub use error::{ProviderError, ProviderErrorKind};
pub use factory::{
    DEFAULT_HEALTH_TTL, FactoryHealth, FactorySettings, HealthCache, HealthSnapshot,
    ProviderFactory, ProviderHealth,
};
pub use kind::{ProviderKind, UnknownProvider};
pub use normalize::strip_code_fences;
pub use prompt::{ContentRequest, ContentType, Profile};
pub use provider::Provider;
pub use retry::with_retry;
pub use types::{
    CompletionRequest, CompletionResponse, HealthCheck, HealthStatus, Message, Role, Usage,
};
