use serde::{Deserialize, Serialize};

/// A corpus entry as ingested into a knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    /// Where the text came from (file name, URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A document returned by a knowledge base search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub content: String,
    /// Similarity to the query (0.0 - 1.0, higher is more similar)
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Search parameters for knowledge base queries
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    /// Maximum number of results to return
    pub top_k: usize,
    /// Minimum similarity score a result must reach (0.0 - 1.0)
    pub similarity_threshold: f32,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 5,
            similarity_threshold: 0.1,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// Result of adding documents to a knowledge base
#[derive(Debug, Clone, PartialEq)]
pub struct AddDocumentsResult {
    pub added: usize,
    /// Documents that were rejected, with the reason
    pub rejected: Vec<(String, String)>,
}

impl AddDocumentsResult {
    pub fn success(added: usize) -> Self {
        Self {
            added,
            rejected: Vec::new(),
        }
    }

    pub fn partial(added: usize, rejected: Vec<(String, String)>) -> Self {
        Self { added, rejected }
    }
}
