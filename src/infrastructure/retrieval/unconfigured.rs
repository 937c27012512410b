//! Stand-in online source used when no search API key is configured

use async_trait::async_trait;

use crate::domain::{DocumentSource, DomainError};

/// Fails every search with a configuration error, so a fallback surfaces as
/// an online-search adapter failure instead of silently finding nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredOnlineSearch;

#[async_trait]
impl DocumentSource for UnconfiguredOnlineSearch {
    async fn retrieve(&self, _question: &str) -> Result<Vec<String>, DomainError> {
        Err(DomainError::configuration(
            "Online search is not configured: set online_search.api_key or TAVILY_API_KEY",
        ))
    }

    fn source_name(&self) -> &'static str {
        "unconfigured"
    }
}
