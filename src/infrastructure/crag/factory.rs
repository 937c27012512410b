use std::sync::Arc;

use tracing::info;

use super::{HybridRelevanceGrader, LexicalRelevanceGrader, LlmRelevanceGrader};
use crate::domain::crag::{CragConfig, GradingStrategy, RelevanceGrader};
use crate::domain::{DomainError, LlmProvider};

/// Build the grader selected by `config.strategy`.
///
/// The lexical grader runs offline; the LLM-based and hybrid strategies need
/// a provider.
pub fn create_relevance_grader(
    config: &CragConfig,
    llm: Option<Arc<dyn LlmProvider>>,
    default_model: &str,
) -> Result<Arc<dyn RelevanceGrader>, DomainError> {
    config.validate()?;

    let llm_grader = |provider: Option<Arc<dyn LlmProvider>>| {
        provider
            .map(|p| LlmRelevanceGrader::new(p, default_model, config.clone()))
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "grading strategy {:?} requires an LLM provider",
                    config.strategy
                ))
            })
    };

    let grader: Arc<dyn RelevanceGrader> = match config.strategy {
        GradingStrategy::Lexical => Arc::new(LexicalRelevanceGrader::new(config.clone())),
        GradingStrategy::LlmBased => Arc::new(llm_grader(llm)?),
        GradingStrategy::Hybrid => Arc::new(HybridRelevanceGrader::new(
            LexicalRelevanceGrader::new(config.clone()),
            llm_grader(llm)?,
        )),
    };

    info!(
        grader = grader.grader_name(),
        correct_threshold = config.correct_threshold,
        ambiguous_threshold = config.ambiguous_threshold,
        "Relevance grader created"
    );

    Ok(grader)
}
