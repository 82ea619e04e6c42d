//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Bare `$VAR` is left alone; only the braced form is expanded. An unset
/// variable without a default is an error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);

/// Read an optional environment variable, treating blank values as unset.
pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braced_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SCRIBE_EXPAND_SIMPLE", "sk-123");
        }

        let result = expand_env("${SCRIBE_EXPAND_SIMPLE}", "providers.openai.api_key").unwrap();
        assert_eq!(result, "sk-123");

        unsafe {
            std::env::remove_var("SCRIBE_EXPAND_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SCRIBE_EXPAND_UNSET");
        }

        let result = expand_env(
            "${SCRIBE_EXPAND_UNSET:-https://api.deepseek.com}",
            "providers.deepseek.base_url",
        )
        .unwrap();
        assert_eq!(result, "https://api.deepseek.com");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SCRIBE_EXPAND_HOST", "proxy.internal");
        }

        let result = expand_env("https://${SCRIBE_EXPAND_HOST}/v1", "base_url").unwrap();
        assert_eq!(result, "https://proxy.internal/v1");

        unsafe {
            std::env::remove_var("SCRIBE_EXPAND_HOST");
        }
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SCRIBE_EXPAND_MISSING");
        }

        let err = expand_env("${SCRIBE_EXPAND_MISSING}", "providers.openai.api_key").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SCRIBE_EXPAND_MISSING"));
        assert!(msg.contains("providers.openai.api_key"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("sk-literal", "f").unwrap(), "sk-literal");
        assert_eq!(expand_env("$NOT_BRACED", "f").unwrap(), "$NOT_BRACED");
    }
}
