//! Application state shared by the HTTP handlers

use std::sync::Arc;

use crate::domain::{KnowledgeBaseProvider, QuestionAnswering};

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<dyn QuestionAnswering>,
    /// Local corpus, exposed for readiness checks
    pub knowledge_base: Arc<dyn KnowledgeBaseProvider>,
}

impl AppState {
    pub fn new(
        workflow: Arc<dyn QuestionAnswering>,
        knowledge_base: Arc<dyn KnowledgeBaseProvider>,
    ) -> Self {
        Self {
            workflow,
            knowledge_base,
        }
    }
}
