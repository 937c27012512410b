//! Entry point trait for answering questions

use async_trait::async_trait;

use super::error::WorkflowError;
use super::outcome::WorkflowResult;

/// Answers one question per call with a fresh pipeline state.
///
/// Collaborator failures come back as an `Ok` result with an adapter-failure
/// outcome. `Err` is reserved for invalid input and broken state invariants.
#[async_trait]
pub trait QuestionAnswering: Send + Sync {
    async fn process_question(&self, question: &str) -> Result<WorkflowResult, WorkflowError>;
}
