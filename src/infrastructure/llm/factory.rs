use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::OpenAiProvider;
use crate::domain::{DomainError, LlmProvider};
use crate::infrastructure::http_client::HttpClient;

const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat model settings shared by the LLM grader and the answer synthesizer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmProviderConfig {
    /// OpenAI-compatible server root. Unset means api.openai.com.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Falls back to the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmProviderConfig {
    /// API key from config, then environment. Blank values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a provider from configuration.
    ///
    /// The hosted OpenAI API needs a key; a custom `base_url` (a local
    /// OpenAI-compatible server) may run without one.
    pub fn create(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        let api_key = config.resolve_api_key();

        match (&config.base_url, api_key) {
            (Some(base_url), key) => Ok(Arc::new(OpenAiProvider::with_base_url(
                http_client,
                key.unwrap_or_default(),
                base_url,
            ))),
            (None, Some(key)) => Ok(Arc::new(OpenAiProvider::new(http_client, key))),
            (None, None) => Err(DomainError::configuration(format!(
                "No LLM API key configured: set llm.api_key or {}",
                OPENAI_API_KEY_ENV
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmProviderConfig::default();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_custom_base_url_needs_no_key() {
        let config = LlmProviderConfig {
            base_url: Some("http://localhost:11434".to_string()),
            api_key: Some("   ".to_string()),
            ..Default::default()
        };

        let provider = LlmProviderFactory::create(&config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_configured_key_is_used() {
        let config = LlmProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };

        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
        assert!(LlmProviderFactory::create(&config).is_ok());
    }
}
