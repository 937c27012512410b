//! Tavily web search adapter

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DocumentSource, DomainError};
use crate::infrastructure::http_client::HttpClientTrait;

const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";
const PROVIDER: &str = "tavily";

/// Online search settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnlineSearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Falls back to the TAVILY_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// `basic` or `advanced`
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_search_depth() -> String {
    "basic".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for OnlineSearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            max_results: default_max_results(),
            search_depth: default_search_depth(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OnlineSearchConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(TAVILY_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl SearchHit {
    /// One document per hit; hits without content carry no evidence
    fn into_document(self) -> Option<String> {
        let content = self.content.trim();
        if content.is_empty() {
            return None;
        }

        let mut text = String::new();
        if !self.title.trim().is_empty() {
            text.push_str(self.title.trim());
            text.push('\n');
        }
        text.push_str(content);
        if !self.url.is_empty() {
            text.push_str("\nSource: ");
            text.push_str(&self.url);
        }
        Some(text)
    }
}

pub struct TavilySearchSource<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    config: OnlineSearchConfig,
}

impl<C: HttpClientTrait> fmt::Debug for TavilySearchSource<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TavilySearchSource")
            .field("base_url", &self.config.base_url)
            .field("max_results", &self.config.max_results)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClientTrait> TavilySearchSource<C> {
    pub fn new(client: C, api_key: impl Into<String>, config: OnlineSearchConfig) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            config,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl<C: HttpClientTrait + 'static> DocumentSource for TavilySearchSource<C> {
    async fn retrieve(&self, question: &str) -> Result<Vec<String>, DomainError> {
        let body = serde_json::to_value(SearchRequest {
            query: question,
            max_results: self.config.max_results,
            search_depth: &self.config.search_depth,
        })
        .map_err(|e| DomainError::internal(format!("Failed to encode search request: {}", e)))?;

        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&self.search_url(), headers, &body)
            .await
            .map_err(|e| match e {
                DomainError::Provider { message, .. } => DomainError::provider(PROVIDER, message),
                other => other,
            })?;

        let response: SearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Invalid search response: {}", e))
        })?;

        let documents: Vec<String> = response
            .results
            .into_iter()
            .filter_map(SearchHit::into_document)
            .take(self.config.max_results)
            .collect();

        debug!(results = documents.len(), "Online search complete");

        Ok(documents)
    }

    fn source_name(&self) -> &'static str {
        PROVIDER
    }
}
