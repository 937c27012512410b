//! LLM provider implementations

mod factory;
mod openai;

pub use factory::{LlmProviderConfig, LlmProviderFactory};
pub use openai::OpenAiProvider;
