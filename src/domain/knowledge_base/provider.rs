use async_trait::async_trait;
use std::fmt::Debug;

use super::{AddDocumentsResult, Document, SearchParams, SearchResult};
use crate::domain::DomainError;

/// Provider trait for the local corpus
///
/// Implementations own the storage backend and its similarity measure. A
/// search with no matches returns an empty list, never an error.
#[async_trait]
pub trait KnowledgeBaseProvider: Send + Sync + Debug {
    /// Identifier of the corpus this provider serves
    fn knowledge_base_id(&self) -> &str;

    /// Get the provider type name
    fn provider_type(&self) -> &'static str;

    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError>;

    async fn add_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<AddDocumentsResult, DomainError>;

    async fn document_count(&self) -> Result<usize, DomainError>;

    /// Check if the knowledge base is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}
