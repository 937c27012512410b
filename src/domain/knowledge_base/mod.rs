//! Knowledge Base domain - the locally ingested corpus

mod entity;
mod provider;

pub use entity::{AddDocumentsResult, Document, SearchParams, SearchResult};
pub use provider::KnowledgeBaseProvider;

#[cfg(test)]
pub use provider::mock::MockKnowledgeBaseProvider;
