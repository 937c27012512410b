//! In-memory knowledge base provider with lexical similarity

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::knowledge_base::{
    AddDocumentsResult, Document, KnowledgeBaseProvider, SearchParams, SearchResult,
};
use crate::domain::DomainError;
use crate::infrastructure::text::{content_terms, term_overlap};

/// Corpus held in process memory, scored by query-term overlap
#[derive(Debug)]
pub struct InMemoryKnowledgeBaseProvider {
    id: String,
    documents: Arc<RwLock<Vec<StoredDoc>>>,
}

#[derive(Debug, Clone)]
struct StoredDoc {
    document: Document,
    terms: HashSet<String>,
}

impl InMemoryKnowledgeBaseProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl KnowledgeBaseProvider for InMemoryKnowledgeBaseProvider {
    fn knowledge_base_id(&self) -> &str {
        &self.id
    }

    fn provider_type(&self) -> &'static str {
        "in_memory"
    }

    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError> {
        let query_terms = content_terms(&params.query);
        if query_terms.is_empty() || params.top_k == 0 {
            return Ok(Vec::new());
        }

        let docs = self.documents.read().await;
        let mut scored: Vec<(f32, &StoredDoc)> = docs
            .iter()
            .map(|doc| (term_overlap(&query_terms, &doc.terms), doc))
            .filter(|(score, _)| *score > 0.0 && *score >= params.similarity_threshold)
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(params.top_k)
            .map(|(score, doc)| {
                let result = SearchResult::new(&doc.document.id, &doc.document.content, score);
                match &doc.document.source {
                    Some(source) => result.with_source(source),
                    None => result,
                }
            })
            .collect())
    }

    async fn add_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<AddDocumentsResult, DomainError> {
        let mut docs = self.documents.write().await;
        let mut added = 0;
        let mut rejected = Vec::new();

        for document in documents {
            if document.content.trim().is_empty() {
                rejected.push((document.id, "empty content".to_string()));
                continue;
            }
            if docs.iter().any(|d| d.document.id == document.id) {
                rejected.push((document.id, "duplicate id".to_string()));
                continue;
            }

            let terms = content_terms(&document.content);
            docs.push(StoredDoc { document, terms });
            added += 1;
        }

        if rejected.is_empty() {
            Ok(AddDocumentsResult::success(added))
        } else {
            Ok(AddDocumentsResult::partial(added, rejected))
        }
    }

    async fn document_count(&self) -> Result<usize, DomainError> {
        Ok(self.documents.read().await.len())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
