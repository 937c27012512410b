//! CRAG (Corrective RAG) domain
//!
//! Relevance grading of retrieved evidence and the sufficiency policy that
//! decides whether an answer can be synthesized, the question should be
//! re-routed, or no answer is possible.

mod assessment;
mod config;
mod grader;
mod judgment;

pub use assessment::{DocumentRelevanceScore, EvidenceVerdict, RelevancePolicy};
pub use config::{CragConfig, GradingStrategy, RelevanceClassification};
pub use grader::RelevanceGrader;
pub use judgment::{DocumentEvaluation, EvaluationOutcome, Judgment};

#[cfg(test)]
pub use grader::mock::MockRelevanceGrader;
