//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Anthropic settings for statement generation
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens in the generated statement
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_anthropic() {
            return Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    120
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "claude-3-sonnet-20240229");
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_validation_missing_key() {
        let config = AiConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_rejects_bad_sampling() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            temperature: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));

        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            max_tokens: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTokens));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
