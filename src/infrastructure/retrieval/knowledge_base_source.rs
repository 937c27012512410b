//! Local corpus retriever backed by a knowledge base provider

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::knowledge_base::{KnowledgeBaseProvider, SearchParams};
use crate::domain::{DocumentSource, DomainError};

#[derive(Debug, Clone)]
pub struct KnowledgeBaseSource {
    provider: Arc<dyn KnowledgeBaseProvider>,
    top_k: usize,
    similarity_threshold: f32,
}

impl KnowledgeBaseSource {
    pub fn new(provider: Arc<dyn KnowledgeBaseProvider>) -> Self {
        let defaults = SearchParams::new("");
        Self {
            provider,
            top_k: defaults.top_k,
            similarity_threshold: defaults.similarity_threshold,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

#[async_trait]
impl DocumentSource for KnowledgeBaseSource {
    async fn retrieve(&self, question: &str) -> Result<Vec<String>, DomainError> {
        let params = SearchParams::new(question)
            .with_top_k(self.top_k)
            .with_similarity_threshold(self.similarity_threshold);

        let results = self.provider.search(params).await?;

        debug!(
            knowledge_base = self.provider.knowledge_base_id(),
            results = results.len(),
            "Knowledge base search complete"
        );

        Ok(results.into_iter().map(|r| r.content).collect())
    }

    fn source_name(&self) -> &'static str {
        "knowledge_base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::{MockKnowledgeBaseProvider, SearchResult};

    #[tokio::test]
    async fn test_retrieve_returns_contents_in_rank_order() {
        let kb = Arc::new(MockKnowledgeBaseProvider::new().with_search_results(vec![
            SearchResult::new("a", "Tokio is a runtime.", 0.9),
            SearchResult::new("b", "Futures are lazy.", 0.5),
        ]));
        let source = KnowledgeBaseSource::new(kb.clone())
            .with_top_k(3)
            .with_similarity_threshold(0.2);

        let documents = source.retrieve("what is tokio").await.unwrap();

        assert_eq!(documents, vec!["Tokio is a runtime.", "Futures are lazy."]);
        let params = kb.last_params().unwrap();
        assert_eq!(params.query, "what is tokio");
        assert_eq!(params.top_k, 3);
        assert_eq!(params.similarity_threshold, 0.2);
    }

    #[tokio::test]
    async fn test_zero_matches_is_empty() {
        let source = KnowledgeBaseSource::new(Arc::new(MockKnowledgeBaseProvider::new()));
        assert!(source.retrieve("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let kb = Arc::new(MockKnowledgeBaseProvider::new());
        kb.set_should_fail(true);

        let result = KnowledgeBaseSource::new(kb).retrieve("q").await;
        assert!(matches!(result, Err(DomainError::KnowledgeBase(_))));
    }
}
