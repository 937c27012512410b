//! Domain layer - Core question-answering logic and entities

pub mod crag;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod retrieval;
pub mod synthesis;
pub mod workflow;

pub use crag::{
    CragConfig, DocumentEvaluation, DocumentRelevanceScore, EvaluationOutcome, EvidenceVerdict,
    GradingStrategy, Judgment, RelevanceClassification, RelevanceGrader, RelevancePolicy,
};
pub use error::DomainError;
pub use knowledge_base::{
    AddDocumentsResult, Document, KnowledgeBaseProvider, SearchParams, SearchResult,
};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use retrieval::{DocumentSource, SearchMethod};
pub use synthesis::AnswerSynthesizer;
pub use workflow::{
    AdapterKind, GraphState, QuestionAnswering, QuestionOutcome, StageTrace, WorkflowError,
    WorkflowResult, WorkflowStage,
};

#[cfg(test)]
pub use retrieval::MockDocumentSource;
#[cfg(test)]
pub use synthesis::MockAnswerSynthesizer;
