//! Terminal outcomes and the result returned to callers

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::stage::WorkflowStage;
use super::state::GraphState;
use crate::domain::crag::{DocumentEvaluation, DocumentRelevanceScore, Judgment};
use crate::domain::retrieval::SearchMethod;

/// Collaborator whose failure ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    Retriever,
    OnlineSearch,
    Grader,
    Synthesizer,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retriever => "retriever",
            Self::OnlineSearch => "online_search",
            Self::Grader => "grader",
            Self::Synthesizer => "synthesizer",
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionOutcome {
    /// An answer was synthesized from relevant evidence
    Answered,
    /// Neither source produced enough relevant evidence
    InsufficientEvidence { reason: String },
    /// A collaborator failed or timed out; the question may succeed later
    AdapterFailure {
        adapter: AdapterKind,
        stage: WorkflowStage,
        message: String,
    },
}

impl QuestionOutcome {
    pub fn insufficient_evidence(reason: impl Into<String>) -> Self {
        Self::InsufficientEvidence {
            reason: reason.into(),
        }
    }

    pub fn adapter_failure(
        adapter: AdapterKind,
        stage: WorkflowStage,
        message: impl Into<String>,
    ) -> Self {
        Self::AdapterFailure {
            adapter,
            stage,
            message: message.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::InsufficientEvidence { .. } => "insufficient_evidence",
            Self::AdapterFailure { .. } => "adapter_failure",
        }
    }
}

/// Result of processing one question
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub request_id: Uuid,
    pub outcome: QuestionOutcome,
    pub state: GraphState,
    /// Stages in the order they were visited
    pub stages: Vec<WorkflowStage>,
    pub execution_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl WorkflowResult {
    pub fn new(
        request_id: Uuid,
        outcome: QuestionOutcome,
        state: GraphState,
        stages: Vec<WorkflowStage>,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            request_id,
            outcome,
            state,
            stages,
            execution_time_ms,
            completed_at: Utc::now(),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.outcome, QuestionOutcome::Answered)
    }

    pub fn solution(&self) -> Option<&str> {
        self.state.solution()
    }

    pub fn search_method(&self) -> Option<SearchMethod> {
        self.state.search_method()
    }

    pub fn document_relevance_score(&self) -> Option<&DocumentRelevanceScore> {
        self.state.document_relevance_score()
    }

    pub fn question_relevance_score(&self) -> Option<&Judgment> {
        self.state.question_relevance_score()
    }

    pub fn document_evaluations(&self) -> &[DocumentEvaluation] {
        self.state.document_evaluations()
    }

    /// Number of times the pipeline entered the retrieval stage
    pub fn retrieval_rounds(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| **s == WorkflowStage::Retrieve)
            .count()
    }

    pub fn fell_back_online(&self) -> bool {
        self.stages.contains(&WorkflowStage::FallbackOnline)
    }
}
