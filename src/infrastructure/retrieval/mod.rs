//! Document sources for local retrieval and online search

mod knowledge_base_source;
mod tavily;
mod unconfigured;

pub use knowledge_base_source::KnowledgeBaseSource;
pub use tavily::{OnlineSearchConfig, TavilySearchSource};
pub use unconfigured::UnconfiguredOnlineSearch;
