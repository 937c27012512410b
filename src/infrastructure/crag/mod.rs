//! Relevance grader implementations

mod factory;
mod hybrid_grader;
mod lexical_grader;
mod llm_grader;

pub use factory::create_relevance_grader;
pub use hybrid_grader::HybridRelevanceGrader;
pub use lexical_grader::LexicalRelevanceGrader;
pub use llm_grader::LlmRelevanceGrader;

use crate::domain::crag::{Judgment, RelevanceClassification};
use crate::domain::DomainError;

/// Without a configured corpus scope every question goes to the local corpus
pub(crate) fn unscoped_question_judgment() -> Result<Judgment, DomainError> {
    Judgment::new(
        true,
        RelevanceClassification::Correct,
        "no corpus scope configured; question routed to the local corpus",
    )
}
