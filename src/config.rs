//! Research-service configuration.
//!
//! Loaded from a small YAML file, e.g.:
//!
//! ```yaml
//! api_base: https://api.example.com/v1
//! model: sonar-medium-online
//! max_tokens: 1024
//! ```
//!
//! The API key may be set here as `api_key`, but the usual route is the
//! `RESEARCH_API_KEY` environment variable (see the CLI); the environment
//! wins when both are present.

use serde::Deserialize;
use std::error::Error;

/// Connection settings for the external research service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the OpenAI-compatible API, without the trailing route.
    pub api_base: String,
    /// Model identifier to request.
    pub model: String,
    /// API key; optional here because it usually comes from the environment.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Completion token limit passed through to the service, if set.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Load configuration from a YAML file.
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&text)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "api_base: https://api.example.com/v1\nmodel: sonar-medium-online\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_base, "https://api.example.com/v1");
        assert_eq!(config.model, "sonar-medium-online");
        assert_eq!(config.api_key, None);
        assert_eq!(config.max_tokens, None);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = "api_base: https://api.example.com/v1\nmodel: sonar\napi_key: sk-test\nmax_tokens: 1024\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.max_tokens, Some(1024));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let yaml = "model: sonar\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}
