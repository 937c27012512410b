//! PMP Adaptive RAG
//!
//! Answers questions from a local corpus, grades the retrieved evidence for
//! relevance and falls back to online search when the corpus cannot answer.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use domain::{DocumentSource, KnowledgeBaseProvider};
use infrastructure::crag::create_relevance_grader;
use infrastructure::http_client::HttpClient;
use infrastructure::knowledge_base::{seed_knowledge_base, InMemoryKnowledgeBaseProvider};
use infrastructure::llm::LlmProviderFactory;
use infrastructure::retrieval::{
    KnowledgeBaseSource, TavilySearchSource, UnconfiguredOnlineSearch,
};
use infrastructure::synthesis::LlmAnswerSynthesizer;
use infrastructure::workflow::RagWorkflow;

/// Wired question pipeline and the corpus it reads from
#[derive(Debug, Clone)]
pub struct RagComponents {
    pub workflow: Arc<RagWorkflow>,
    pub knowledge_base: Arc<dyn KnowledgeBaseProvider>,
}

/// Build the question pipeline described by `config`
pub async fn build_components(config: &AppConfig) -> anyhow::Result<RagComponents> {
    let knowledge_base = Arc::new(InMemoryKnowledgeBaseProvider::new("local"));
    load_corpus(config, knowledge_base.as_ref()).await?;

    let llm = LlmProviderFactory::create(&config.llm)?;
    info!(provider = llm.provider_name(), model = %config.llm.model, "LLM provider ready");

    let grader = create_relevance_grader(&config.grading, Some(llm.clone()), &config.llm.model)?;

    let retriever = KnowledgeBaseSource::new(knowledge_base.clone())
        .with_top_k(config.knowledge_base.top_k)
        .with_similarity_threshold(config.knowledge_base.similarity_threshold);

    let synthesizer = LlmAnswerSynthesizer::new(llm, &config.llm.model)
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

    let workflow = RagWorkflow::new(
        Arc::new(retriever),
        create_online_search(config)?,
        grader,
        Arc::new(synthesizer),
    )
    .with_grading(config.grading.clone())
    .with_config(config.workflow.clone());

    Ok(RagComponents {
        workflow: Arc::new(workflow),
        knowledge_base,
    })
}

pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let components = build_components(config).await?;
    Ok(AppState::new(components.workflow, components.knowledge_base))
}

async fn load_corpus(
    config: &AppConfig,
    knowledge_base: &InMemoryKnowledgeBaseProvider,
) -> anyhow::Result<()> {
    match &config.knowledge_base.corpus_path {
        Some(path) if path.exists() => {
            seed_knowledge_base(knowledge_base, path).await?;
        }
        Some(path) => {
            warn!(path = %path.display(), "Corpus file not found, starting with an empty corpus");
        }
        None => info!("No corpus configured, every question will fall back to online search"),
    }

    Ok(())
}

fn create_online_search(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentSource>> {
    let search = &config.online_search;

    match search.resolve_api_key() {
        Some(api_key) => {
            let client = HttpClient::with_timeout(Duration::from_secs(search.timeout_secs))?;
            info!(base_url = %search.base_url, "Online search enabled");
            Ok(Arc::new(TavilySearchSource::new(client, api_key, search.clone())))
        }
        None => {
            warn!("No online search API key configured, fallbacks will fail");
            Ok(Arc::new(UnconfiguredOnlineSearch))
        }
    }
}
