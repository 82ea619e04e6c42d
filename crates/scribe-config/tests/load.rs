use std::path::Path;

use pretty_assertions::assert_eq;
use scribe_config::{CliSettings, Config, ConfigError};

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("scribe.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[ai]
provider = "deepseek"

[providers.deepseek]
api_key = "sk-file"
"#,
    );

    let config = Config::load(Some(&path), None).unwrap();

    assert_eq!(config.ai.provider, "deepseek");
    assert_eq!(config.ai.fallback(), "openai");
    assert_eq!(config.providers.deepseek.api_key(), Some("sk-file"));
    assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_load_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::load(Some(&path), None).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(_)));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_load_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[ai\nprovider = ");

    let err = Config::load(Some(&path), None).unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_rejects_unknown_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[ai]\nprovider = \"gemini\"\n");

    let err = Config::load(Some(&path), None).unwrap_err();

    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("gemini"));
}

#[test]
fn test_cli_settings_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[ai]\nprovider = \"openai\"\nenable_fallback = true\n");
    let settings = CliSettings {
        provider: Some("deepseek".to_owned()),
        enable_fallback: Some(false),
        ..Default::default()
    };

    let config = Config::load(Some(&path), Some(&settings)).unwrap();

    assert_eq!(config.ai.provider, "deepseek");
    assert!(!config.ai.enable_fallback);
}

#[test]
fn test_cli_settings_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");
    let settings = CliSettings {
        fallback_provider: Some("llama".to_owned()),
        ..Default::default()
    };

    let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

    assert!(err.to_string().contains("ai.fallback_provider"));
}
