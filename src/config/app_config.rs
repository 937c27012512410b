use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::crag::CragConfig;
use crate::domain::DomainError;
use crate::infrastructure::llm::LlmProviderConfig;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::retrieval::OnlineSearchConfig;
use crate::infrastructure::workflow::RagWorkflowConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub llm: LlmProviderConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub online_search: OnlineSearchConfig,
    pub grading: CragConfig,
    pub workflow: RagWorkflowConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Local corpus settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// JSON corpus loaded at startup. Unset starts with an empty corpus.
    pub corpus_path: Option<PathBuf>,
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            top_k: 5,
            similarity_threshold: 0.1,
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local`, then `APP__SECTION__KEY`
    /// environment variables. Every layer is optional.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// `load`, falling back to defaults. The load error is handed back so the
    /// caller can report it once logging is up.
    pub fn load_or_default() -> (Self, Option<config::ConfigError>) {
        Self::or_default(Self::load())
    }

    fn or_default(loaded: Result<Self, config::ConfigError>) -> (Self, Option<config::ConfigError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Cross-section checks that deserialization cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        self.observability.validate()?;
        self.grading.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::GradingStrategy;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.knowledge_base.top_k, 5);
        assert_eq!(config.grading, CragConfig::default());
        assert_eq!(config.workflow.timeout_ms, 120_000);
        assert_eq!(config.online_search.base_url, "https://api.tavily.com");
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [logging]
            format = "json"

            [knowledge_base]
            corpus_path = "data/corpus.json"
            top_k = 8

            [grading]
            strategy = "hybrid"
            min_relevant_documents = 2
            corpus_scope = "Rust async programming"

            [workflow]
            timeout_ms = 30000
            "#,
        );

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.knowledge_base.corpus_path,
            Some(PathBuf::from("data/corpus.json"))
        );
        assert_eq!(config.knowledge_base.top_k, 8);
        assert_eq!(config.knowledge_base.similarity_threshold, 0.1);
        assert_eq!(config.grading.strategy, GradingStrategy::Hybrid);
        assert_eq!(config.grading.min_relevant_documents, 2);
        assert_eq!(config.grading.correct_threshold, 0.7);
        assert_eq!(config.workflow.timeout_ms, 30_000);
    }

    #[test]
    fn test_malformed_file_falls_back_with_error() {
        let loaded = config::Config::builder()
            .add_source(config::File::from_str(
                "[grading\ncorrect_threshold = 0.9",
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize::<AppConfig>());

        let (config, error) = AppConfig::or_default(loaded);

        assert!(error.is_some());
        assert_eq!(config.grading, CragConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_sections() {
        assert!(from_toml("").validate().is_ok());

        let config = from_toml(
            r#"
            [observability.tracing]
            sampling_ratio = 2.0
            "#,
        );
        assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));

        let config = from_toml(
            r#"
            [grading]
            correct_threshold = 0.3
            ambiguous_threshold = 0.6
            "#,
        );
        assert!(config.validate().is_err());
    }
}
