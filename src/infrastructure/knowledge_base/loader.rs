//! Corpus file loading
//!
//! A corpus file is a JSON array of `{"id"?, "content", "source"?}` entries
//! whose text is already split into retrieval-sized passages.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::knowledge_base::{Document, KnowledgeBaseProvider};
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
struct CorpusEntry {
    #[serde(default)]
    id: Option<String>,
    content: String,
    #[serde(default)]
    source: Option<String>,
}

/// Parse corpus JSON. Entries without an id get `doc-<position>`.
pub fn parse_corpus(json: &str) -> Result<Vec<Document>, DomainError> {
    let entries: Vec<CorpusEntry> = serde_json::from_str(json)
        .map_err(|e| DomainError::knowledge_base(format!("Invalid corpus file: {}", e)))?;

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let id = entry.id.unwrap_or_else(|| format!("doc-{}", position));
            let document = Document::new(id, entry.content);
            match entry.source {
                Some(source) => document.with_source(source),
                None => document,
            }
        })
        .collect())
}

pub async fn load_corpus(path: &Path) -> Result<Vec<Document>, DomainError> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::knowledge_base(format!("Failed to read corpus {}: {}", path.display(), e))
    })?;

    parse_corpus(&json)
}

/// Load a corpus file into `provider`, returning the number of documents added
pub async fn seed_knowledge_base(
    provider: &dyn KnowledgeBaseProvider,
    path: &Path,
) -> Result<usize, DomainError> {
    let documents = load_corpus(path).await?;
    let result = provider.add_documents(documents).await?;

    for (id, reason) in &result.rejected {
        warn!(document_id = %id, reason = %reason, "Corpus document rejected");
    }

    info!(
        knowledge_base = provider.knowledge_base_id(),
        added = result.added,
        rejected = result.rejected.len(),
        path = %path.display(),
        "Corpus loaded"
    );

    Ok(result.added)
}
