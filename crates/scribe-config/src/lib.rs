//! Configuration management for Scribe.
//!
//! Parses `scribe.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Without a config
//! file, settings are read once from the environment (see
//! [`Config::from_env`]).
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `providers.<name>.api_key`
//! - `providers.<name>.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override primary provider.
    pub provider: Option<String>,
    /// Override fallback provider.
    pub fallback_provider: Option<String>,
    /// Override fallback enabled flag.
    pub enable_fallback: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "scribe.toml";

/// Provider names the configuration accepts.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "deepseek"];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider selection.
    pub ai: AiConfig,
    /// Per-provider connection settings.
    pub providers: ProvidersConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Provider selection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Primary provider name.
    pub provider: String,
    /// Fallback provider name. Defaults to the other known provider.
    pub fallback_provider: Option<String>,
    /// Whether failover to the fallback provider is enabled.
    pub enable_fallback: bool,
    /// Lifetime of cached health checks, in seconds.
    pub health_ttl_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_owned(),
            fallback_provider: None,
            enable_fallback: true,
            health_ttl_secs: 300,
        }
    }
}

impl AiConfig {
    /// Fallback provider name, defaulting to the known provider that is not
    /// the primary.
    #[must_use]
    pub fn fallback(&self) -> &str {
        match &self.fallback_provider {
            Some(name) => name.as_str(),
            None => KNOWN_PROVIDERS
                .into_iter()
                .find(|name| *name != self.provider)
                .unwrap_or(KNOWN_PROVIDERS[1]),
        }
    }
}

/// Connection settings for every known provider.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: ProviderSection,
    pub deepseek: ProviderSection,
}

impl ProvidersConfig {
    /// Section for a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProviderSection> {
        match name {
            "openai" => Some(&self.openai),
            "deepseek" => Some(&self.deepseek),
            _ => None,
        }
    }

    fn sections_mut(&mut self) -> [(&'static str, &mut ProviderSection); 2] {
        [("openai", &mut self.openai), ("deepseek", &mut self.deepseek)]
    }

    fn sections(&self) -> [(&'static str, &ProviderSection); 2] {
        [("openai", &self.openai), ("deepseek", &self.deepseek)]
    }
}

/// Connection settings for one provider.
///
/// `base_url` and `model` fall back to the provider's built-in defaults when
/// unset.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// API key. A provider without a key cannot be used.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Default output token limit.
    pub max_tokens: u32,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_ms: 30_000,
            max_retries: 3,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`providers.openai.api_key`").
        field: String,
        /// Error message (e.g., "${`OPENAI_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a provider name to be one of [`KNOWN_PROVIDERS`].
fn require_known_provider(name: &str, field: &str) -> Result<(), ConfigError> {
    if !KNOWN_PROVIDERS.contains(&name) {
        return Err(ConfigError::Validation(format!(
            "{field} must be one of {}, got '{name}'",
            KNOWN_PROVIDERS.join(", ")
        )));
    }
    Ok(())
}

/// Parse a boolean flag from the environment. Anything other than an explicit
/// negative keeps the flag on.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `scribe.toml` in current directory and parents,
    /// and falls back to [`Config::from_env`] when none is found.
    ///
    /// CLI settings are applied after loading and validated with the rest of
    /// the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::from_env()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from environment variables.
    ///
    /// Reads `AI_PROVIDER`, `AI_FALLBACK_PROVIDER`, `AI_ENABLE_FALLBACK`,
    /// `OPENAI_API_KEY` and `DEEPSEEK_API_KEY`. Blank values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(provider) = expand::env_var("AI_PROVIDER") {
            config.ai.provider = provider.to_ascii_lowercase();
        }
        config.ai.fallback_provider =
            expand::env_var("AI_FALLBACK_PROVIDER").map(|name| name.to_ascii_lowercase());
        if let Some(flag) = expand::env_var("AI_ENABLE_FALLBACK") {
            config.ai.enable_fallback = parse_flag(&flag);
        }
        config.providers.openai.api_key = expand::env_var("OPENAI_API_KEY");
        config.providers.deepseek.api_key = expand::env_var("DEEPSEEK_API_KEY");

        config
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(provider) = &settings.provider {
            self.ai.provider = provider.to_ascii_lowercase();
        }
        if let Some(fallback) = &settings.fallback_provider {
            self.ai.fallback_provider = Some(fallback.to_ascii_lowercase());
        }
        if let Some(enable_fallback) = settings.enable_fallback {
            self.ai.enable_fallback = enable_fallback;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(current)
    }

    fn discover_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_ai()?;
        for (name, section) in self.providers.sections() {
            section.validate(name)?;
        }
        Ok(())
    }

    /// Validate provider selection.
    fn validate_ai(&self) -> Result<(), ConfigError> {
        require_known_provider(&self.ai.provider, "ai.provider")?;
        require_known_provider(self.ai.fallback(), "ai.fallback_provider")?;

        if self.ai.health_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "ai.health_ttl_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (name, section) in self.providers.sections_mut() {
            if let Some(ref key) = section.api_key {
                section.api_key =
                    Some(expand::expand_env(key, &format!("providers.{name}.api_key"))?);
            }
            if let Some(ref url) = section.base_url {
                section.base_url =
                    Some(expand::expand_env(url, &format!("providers.{name}.base_url"))?);
            }
        }
        Ok(())
    }
}

impl ProviderSection {
    /// API key, if set and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Validate connection settings of the provider `name`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is out of range.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        const MAX_TEMPERATURE: f32 = 2.0;

        if let Some(ref url) = self.base_url {
            let field = format!("providers.{name}.base_url");
            require_non_empty(url, &field)?;
            require_http_url(url, &field)?;
        }
        if let Some(ref model) = self.model {
            require_non_empty(model, &format!("providers.{name}.model"))?;
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(format!(
                "providers.{name}.timeout_ms must be greater than 0"
            )));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "providers.{name}.temperature must be between 0 and {MAX_TEMPERATURE}"
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(format!(
                "providers.{name}.max_tokens must be greater than 0"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.ai.fallback(), "deepseek");
        assert!(config.ai.enable_fallback);
        assert_eq!(config.ai.health_ttl_secs, 300);
        assert_eq!(config.providers.openai.timeout_ms, 30_000);
        assert_eq!(config.providers.deepseek.max_retries, 3);
        assert!(config.providers.openai.api_key().is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.providers.openai.max_tokens, 2000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[ai]
provider = "deepseek"
fallback_provider = "openai"
enable_fallback = false
health_ttl_secs = 60

[providers.deepseek]
api_key = "sk-deep"
model = "deepseek-chat"
timeout_ms = 5000
max_retries = 1
temperature = 0.2
max_tokens = 800
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ai.provider, "deepseek");
        assert_eq!(config.ai.fallback(), "openai");
        assert!(!config.ai.enable_fallback);
        assert_eq!(config.ai.health_ttl_secs, 60);

        let deepseek = config.providers.get("deepseek").unwrap();
        assert_eq!(deepseek.api_key(), Some("sk-deep"));
        assert_eq!(deepseek.model.as_deref(), Some("deepseek-chat"));
        assert_eq!(deepseek.timeout_ms, 5000);
        assert_eq!(deepseek.max_retries, 1);
        assert_eq!(deepseek.max_tokens, 800);
        // Untouched section keeps defaults
        assert_eq!(config.providers.openai.max_retries, 3);
    }

    #[test]
    fn test_fallback_defaults_to_other_provider() {
        let ai = AiConfig {
            provider: "deepseek".to_owned(),
            ..AiConfig::default()
        };
        assert_eq!(ai.fallback(), "openai");
    }

    #[test]
    fn test_unknown_section_name_has_no_settings() {
        let config = Config::default();
        assert!(config.providers.get("anthropic").is_none());
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let section = ProviderSection {
            api_key: Some("   ".to_owned()),
            ..ProviderSection::default()
        };
        assert!(section.api_key().is_none());
    }

    #[test]
    fn test_apply_cli_settings_provider() {
        let mut config = Config::default();
        let overrides = CliSettings {
            provider: Some("DeepSeek".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.ai.provider, "deepseek");
        assert!(config.ai.enable_fallback); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_fallback() {
        let mut config = Config::default();
        let overrides = CliSettings {
            fallback_provider: Some("openai".to_owned()),
            enable_fallback: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.ai.fallback_provider.as_deref(), Some("openai"));
        assert!(!config.ai.enable_fallback);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.ai.provider, "openai");
        assert!(config.ai.fallback_provider.is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" FALSE "));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_from_env() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("AI_PROVIDER", "DEEPSEEK");
            std::env::set_var("AI_ENABLE_FALLBACK", "false");
            std::env::set_var("DEEPSEEK_API_KEY", "sk-env");
            std::env::set_var("OPENAI_API_KEY", "");
            std::env::remove_var("AI_FALLBACK_PROVIDER");
        }

        let config = Config::from_env();

        assert_eq!(config.ai.provider, "deepseek");
        assert_eq!(config.ai.fallback(), "openai");
        assert!(!config.ai.enable_fallback);
        assert_eq!(config.providers.deepseek.api_key(), Some("sk-env"));
        assert!(config.providers.openai.api_key().is_none());

        unsafe {
            std::env::remove_var("AI_PROVIDER");
            std::env::remove_var("AI_ENABLE_FALLBACK");
            std::env::remove_var("DEEPSEEK_API_KEY");
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_api_keys() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_SCRIBE_OPENAI_KEY", "sk-open");
        }

        let toml = r#"
[providers.openai]
api_key = "${TEST_SCRIBE_OPENAI_KEY}"

[providers.deepseek]
base_url = "${TEST_SCRIBE_DEEPSEEK_URL:-https://api.deepseek.com}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.providers.openai.api_key(), Some("sk-open"));
        assert_eq!(
            config.providers.deepseek.base_url.as_deref(),
            Some("https://api.deepseek.com")
        );

        unsafe {
            std::env::remove_var("TEST_SCRIBE_OPENAI_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_SCRIBE_CONFIG_TEST");
        }

        let toml = r#"
[providers.deepseek]
api_key = "${MISSING_VAR_SCRIBE_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_SCRIBE_CONFIG_TEST"));
        assert!(err.to_string().contains("providers.deepseek.api_key"));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = Config::default();
        config.ai.provider = "anthropic".to_owned();
        assert_validation_error(&config, &["ai.provider", "anthropic"]);
    }

    #[test]
    fn test_validate_unknown_fallback() {
        let mut config = Config::default();
        config.ai.fallback_provider = Some("mistral".to_owned());
        assert_validation_error(&config, &["ai.fallback_provider", "mistral"]);
    }

    #[test]
    fn test_validate_health_ttl_zero() {
        let mut config = Config::default();
        config.ai.health_ttl_secs = 0;
        assert_validation_error(&config, &["ai.health_ttl_secs"]);
    }

    #[test]
    fn test_validate_base_url_invalid_scheme() {
        let mut config = Config::default();
        config.providers.openai.base_url = Some("ftp://api.openai.com".to_owned());
        assert_validation_error(&config, &["providers.openai.base_url", "http://"]);
    }

    #[test]
    fn test_validate_base_url_valid_https() {
        let mut config = Config::default();
        config.providers.deepseek.base_url = Some("https://api.deepseek.com".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.providers.deepseek.model = Some(String::new());
        assert_validation_error(&config, &["providers.deepseek.model", "cannot be empty"]);
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default();
        config.providers.openai.timeout_ms = 0;
        assert_validation_error(&config, &["providers.openai.timeout_ms"]);
    }

    #[test]
    fn test_validate_temperature_out_of_range() {
        let mut config = Config::default();
        config.providers.openai.temperature = 3.5;
        assert_validation_error(&config, &["providers.openai.temperature"]);
    }

    #[test]
    fn test_validate_max_tokens_zero() {
        let mut config = Config::default();
        config.providers.deepseek.max_tokens = 0;
        assert_validation_error(&config, &["providers.deepseek.max_tokens"]);
    }
}
