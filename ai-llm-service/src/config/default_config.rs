//! Default OpenRouter config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `OPENROUTER_API_KEY` = bearer token (mandatory)
//! - `OPENROUTER_MODEL`   = model id (optional, defaults to [`DEFAULT_MODEL`])
//!
//! Everything else (base URL, temperature, timeout, token budget) is fixed.

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{Result, must_var, opt_var},
};

/// OpenRouter API base.
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Model used when `OPENROUTER_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Attribution headers OpenRouter shows on its dashboard.
pub const APP_TITLE: &str = "ISO 9001 Assistant";
pub const APP_REFERER: &str = "http://localhost:5000";

/// Constructs the OpenRouter config from the process environment.
///
/// # Errors
/// - [`crate::ConfigError::MissingVar`] if `OPENROUTER_API_KEY` is unset or empty
pub fn config_openrouter() -> Result<LlmModelConfig> {
    config_openrouter_from(|name| std::env::var(name).ok())
}

/// Same as [`config_openrouter`], reading variables through `lookup`.
///
/// Lets callers (and tests) supply values without touching the process env.
pub fn config_openrouter_from<F>(lookup: F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(&lookup, "OPENROUTER_API_KEY")?;
    let model = opt_var(&lookup, "OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Ok(LlmModelConfig {
        model,
        endpoint: OPENROUTER_API_BASE.to_string(),
        api_key,
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: DEFAULT_TEMPERATURE,
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        referer: Some(APP_REFERER.to_string()),
        title: Some(APP_TITLE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::{AiLlmError, ConfigError};

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = config_openrouter_from(vars(&[("OPENROUTER_MODEL", "x/y")])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENROUTER_API_KEY"))
        ));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = config_openrouter_from(vars(&[("OPENROUTER_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, AiLlmError::Config(ConfigError::MissingVar(_))));
    }

    #[test]
    fn defaults_applied() {
        let cfg = config_openrouter_from(vars(&[("OPENROUTER_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.api_key, "k");
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.endpoint, OPENROUTER_API_BASE);
        assert_eq!(cfg.max_tokens, 300);
        assert_eq!(cfg.timeout_secs, 30);
        assert!((cfg.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn model_override() {
        let cfg = config_openrouter_from(vars(&[
            ("OPENROUTER_API_KEY", "k"),
            ("OPENROUTER_MODEL", "anthropic/claude-3.5-sonnet"),
        ]))
        .unwrap();
        assert_eq!(cfg.model, "anthropic/claude-3.5-sonnet");
    }
}
