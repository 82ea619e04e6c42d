//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod generate;
pub(crate) mod health;
pub(crate) mod render;

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use scribe_config::{CliSettings, Config, ProviderSection};
use scribe_provider::{FactorySettings, ProviderConfig, ProviderFactory, ProviderKind};

use crate::error::CliError;

pub(crate) use convert::ConvertArgs;
pub(crate) use generate::GenerateArgs;
pub(crate) use health::HealthArgs;
pub(crate) use render::RenderArgs;

/// Provider selection arguments shared by the AI commands.
#[derive(Args)]
pub(crate) struct ProviderArgs {
    /// Path to configuration file (default: auto-discover scribe.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary provider (overrides config).
    #[arg(long)]
    provider: Option<String>,

    /// Fallback provider (overrides config).
    #[arg(long)]
    fallback_provider: Option<String>,

    /// Disable failover to the fallback provider.
    #[arg(long)]
    no_fallback: bool,
}

impl ProviderArgs {
    /// Load configuration with these arguments applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            provider: self.provider.clone(),
            fallback_provider: self.fallback_provider.clone(),
            enable_fallback: self.no_fallback.then_some(false),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the provider factory described by `config`.
pub(crate) fn build_factory(config: &Config) -> Result<ProviderFactory, CliError> {
    let settings = factory_settings(config)?;
    let configs: HashMap<ProviderKind, ProviderConfig> = ProviderKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let section = config.providers.get(kind.name())?;
            Some((kind, provider_config(kind, section)))
        })
        .collect();
    Ok(ProviderFactory::from_configs(&settings, &configs)?)
}

fn factory_settings(config: &Config) -> Result<FactorySettings, CliError> {
    Ok(FactorySettings {
        primary: config.ai.provider.parse()?,
        fallback: config.ai.fallback().parse()?,
        enable_fallback: config.ai.enable_fallback,
        health_ttl: Duration::from_secs(config.ai.health_ttl_secs),
    })
}

/// Provider defaults overlaid with the configured section.
fn provider_config(kind: ProviderKind, section: &ProviderSection) -> ProviderConfig {
    let mut provider = ProviderConfig::for_kind(kind);
    provider.api_key = section.api_key().map(str::to_owned);
    if let Some(base_url) = &section.base_url {
        provider.base_url.clone_from(base_url);
    }
    if let Some(model) = &section.model {
        provider.model.clone_from(model);
    }
    provider.timeout = Duration::from_millis(section.timeout_ms);
    provider.max_retries = section.max_retries;
    provider.temperature = section.temperature;
    provider.max_tokens = section.max_tokens;
    provider
}

/// Read a file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_provider_config_uses_kind_defaults() {
        let section = ProviderSection::default();
        let config = provider_config(ProviderKind::DeepSeek, &section);

        assert_eq!(config.base_url, ProviderKind::DeepSeek.default_base_url());
        assert_eq!(config.model, ProviderKind::DeepSeek.default_model());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_provider_config_overrides() {
        let section = ProviderSection {
            api_key: Some("sk-test".to_owned()),
            base_url: Some("http://localhost:8080/v1".to_owned()),
            model: Some("gpt-4o".to_owned()),
            timeout_ms: 1500,
            max_retries: 0,
            temperature: 0.1,
            max_tokens: 64,
        };
        let config = provider_config(ProviderKind::OpenAi, &section);

        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_tokens, 64);
    }

    #[test]
    fn test_factory_settings_from_config() {
        let mut config = Config::default();
        config.ai.provider = "deepseek".to_owned();
        config.ai.enable_fallback = false;
        config.ai.health_ttl_secs = 60;

        let settings = factory_settings(&config).unwrap();

        assert_eq!(settings.primary, ProviderKind::DeepSeek);
        assert_eq!(settings.fallback, ProviderKind::OpenAi);
        assert!(!settings.enable_fallback);
        assert_eq!(settings.health_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_build_factory_without_primary_key_fails() {
        let config = Config::default();
        let err = build_factory(&config).err().unwrap();
        assert!(matches!(err, CliError::Provider(_)));
    }

    #[test]
    fn test_build_factory_with_keys() {
        let mut config = Config::default();
        config.providers.openai.api_key = Some("sk-a".to_owned());
        config.providers.deepseek.api_key = Some("sk-b".to_owned());

        let factory = build_factory(&config).unwrap();

        assert_eq!(factory.primary().name(), "openai");
        assert_eq!(factory.fallback().map(|p| p.name()), Some("deepseek"));
    }
}
