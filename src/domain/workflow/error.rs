//! Workflow error types

use thiserror::Error;

use super::stage::WorkflowStage;

/// Errors raised by the question workflow itself.
///
/// Collaborator failures are not errors at this level: they end the run with
/// an `AdapterFailure` outcome instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition {
        from: WorkflowStage,
        to: WorkflowStage,
    },

    #[error("State invariant violated: {0}")]
    StateInvariant(String),
}

impl WorkflowError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_transition(from: WorkflowStage, to: WorkflowStage) -> Self {
        Self::InvalidTransition { from, to }
    }

    pub fn state_invariant(message: impl Into<String>) -> Self {
        Self::StateInvariant(message.into())
    }
}
