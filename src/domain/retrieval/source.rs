//! Evidence source seam shared by local retrieval and online search

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Which source produced the documents currently held as evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// The locally ingested corpus
    Documents,
    /// The external search provider
    Online,
}

impl SearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns candidate documents for a question, best first.
///
/// Zero matches is an empty list, not an error. Errors are reserved for the
/// source itself being unreachable or misbehaving.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn retrieve(&self, question: &str) -> Result<Vec<String>, DomainError>;

    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_method_serialization() {
        assert_eq!(
            serde_json::to_string(&SearchMethod::Documents).unwrap(),
            "\"documents\""
        );
        assert_eq!(SearchMethod::Online.to_string(), "online");
    }
}
