//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, KnowledgeBaseConfig, LogFormat, LoggingConfig, ServerConfig,
};
