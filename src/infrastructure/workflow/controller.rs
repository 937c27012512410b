//! Adaptive RAG workflow controller
//!
//! Drives one question through route, retrieve, grade and synthesize, with at
//! most one fallback to online search. Every collaborator call is bounded by
//! the remaining invocation budget, and a failing collaborator ends the run
//! with an adapter-failure outcome instead of an error.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::crag::{
    CragConfig, DocumentEvaluation, EvidenceVerdict, RelevanceGrader, RelevancePolicy,
};
use crate::domain::workflow::{
    AdapterKind, GraphState, QuestionAnswering, QuestionOutcome, StageTrace, WorkflowError,
    WorkflowResult, WorkflowStage,
};
use crate::domain::{AnswerSynthesizer, DocumentSource, DomainError};
use crate::infrastructure::observability::{
    record_adapter_failure, record_fallback, record_question_outcome,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RagWorkflowConfig {
    /// Budget for one whole invocation, shared by every adapter call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for RagWorkflowConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Invocation deadline. Adapter calls get whatever budget is left.
struct Deadline {
    expires_at: Instant,
    budget_ms: u64,
}

impl Deadline {
    fn after(budget_ms: u64) -> Self {
        Self {
            expires_at: Instant::now() + Duration::from_millis(budget_ms),
            budget_ms,
        }
    }

    async fn run<T, F>(&self, operation: &str, future: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let remaining = self.expires_at.saturating_duration_since(Instant::now());

        tokio::time::timeout(remaining, future)
            .await
            .map_err(|_| DomainError::timeout(operation, self.budget_ms))?
    }
}

type StageOutput = Result<(GraphState, QuestionOutcome), WorkflowError>;

pub struct RagWorkflow {
    retriever: Arc<dyn DocumentSource>,
    online_search: Arc<dyn DocumentSource>,
    grader: Arc<dyn RelevanceGrader>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    grading: CragConfig,
    policy: RelevancePolicy,
    config: RagWorkflowConfig,
}

impl fmt::Debug for RagWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagWorkflow")
            .field("retriever", &self.retriever.source_name())
            .field("online_search", &self.online_search.source_name())
            .field("grader", &self.grader.grader_name())
            .field("synthesizer", &self.synthesizer.synthesizer_name())
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish()
    }
}

impl RagWorkflow {
    pub fn new(
        retriever: Arc<dyn DocumentSource>,
        online_search: Arc<dyn DocumentSource>,
        grader: Arc<dyn RelevanceGrader>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
    ) -> Self {
        Self {
            retriever,
            online_search,
            grader,
            synthesizer,
            grading: CragConfig::default(),
            policy: RelevancePolicy::default(),
            config: RagWorkflowConfig::default(),
        }
    }

    /// Grading limits and the sufficiency threshold come from `grading`
    pub fn with_grading(mut self, grading: CragConfig) -> Self {
        self.policy = RelevancePolicy::at_least(grading.min_relevant_documents);
        self.grading = grading;
        self
    }

    pub fn with_config(mut self, config: RagWorkflowConfig) -> Self {
        self.config = config;
        self
    }

    async fn run(&self, state: GraphState, trace: &mut StageTrace, deadline: &Deadline) -> StageOutput {
        trace.advance(WorkflowStage::Route)?;

        let judgment = match deadline
            .run("grade_question", self.grader.grade_question(state.question()))
            .await
        {
            Ok(judgment) => judgment,
            Err(e) => {
                return self.fail(trace, state, AdapterKind::Grader, WorkflowStage::Route, e);
            }
        };

        let out_of_scope = judgment.classification.is_incorrect();
        debug!(
            out_of_scope,
            rationale = %judgment.rationale,
            "Question routed"
        );

        let mut state = state.with_question_relevance(judgment);
        if out_of_scope {
            state = self.fall_back_online(trace, state)?;
        }

        let mut inconclusive_rounds = 0;

        loop {
            trace.advance(WorkflowStage::Retrieve)?;

            let (source, adapter) = if state.online_search() {
                (&self.online_search, AdapterKind::OnlineSearch)
            } else {
                (&self.retriever, AdapterKind::Retriever)
            };

            let mut documents = match deadline
                .run(source.source_name(), source.retrieve(state.question()))
                .await
            {
                Ok(documents) => documents,
                Err(e) => return self.fail(trace, state, adapter, WorkflowStage::Retrieve, e),
            };

            if documents.len() > self.grading.max_documents_to_grade {
                debug!(
                    retrieved = documents.len(),
                    kept = self.grading.max_documents_to_grade,
                    "Dropping documents beyond the grading limit"
                );
                documents.truncate(self.grading.max_documents_to_grade);
            }

            state = state.with_documents(documents);
            debug!(
                source = source.source_name(),
                documents = state.documents().len(),
                "Documents retrieved"
            );

            trace.advance(WorkflowStage::GradeDocuments)?;

            let evaluations = self
                .grade_documents(state.question(), state.documents(), deadline)
                .await;
            let score = self.policy.assess(&evaluations);
            state = state.with_evaluations(evaluations, score)?;

            debug!(
                verdict = ?score.verdict,
                relevant = score.relevant,
                irrelevant = score.irrelevant,
                ungraded = score.ungraded,
                "Documents graded"
            );

            match score.verdict {
                EvidenceVerdict::Sufficient => return self.synthesize(trace, state, deadline).await,
                EvidenceVerdict::Inconclusive => inconclusive_rounds += 1,
                EvidenceVerdict::Insufficient => {}
            }

            if trace.fallback_taken() {
                break;
            }
            state = self.fall_back_online(trace, state)?;
        }

        trace.advance(WorkflowStage::NoAnswer)?;
        trace.advance(WorkflowStage::End)?;

        // Ungraded documents could have changed the verdict, so this is not
        // a statement about the evidence.
        if inconclusive_rounds > 0 {
            record_adapter_failure(AdapterKind::Grader.as_str());
            let outcome = QuestionOutcome::adapter_failure(
                AdapterKind::Grader,
                WorkflowStage::GradeDocuments,
                format!(
                    "relevance grading failed for too many documents in {} round(s)",
                    inconclusive_rounds
                ),
            );
            return Ok((state, outcome));
        }

        let reason = if self.retrieval_rounds(trace) > 1 {
            "no relevant evidence found in either source"
        } else {
            "question is outside the corpus scope and online search found no relevant evidence"
        };

        Ok((state, QuestionOutcome::insufficient_evidence(reason)))
    }

    fn retrieval_rounds(&self, trace: &StageTrace) -> usize {
        trace
            .stages()
            .iter()
            .filter(|s| **s == WorkflowStage::Retrieve)
            .count()
    }

    fn fall_back_online(
        &self,
        trace: &mut StageTrace,
        state: GraphState,
    ) -> Result<GraphState, WorkflowError> {
        trace.advance(WorkflowStage::FallbackOnline)?;
        record_fallback();
        debug!("Falling back to online search");

        Ok(state.with_online_search())
    }

    /// Grade every document concurrently, keeping document order
    async fn grade_documents(
        &self,
        question: &str,
        documents: &[String],
        deadline: &Deadline,
    ) -> Vec<DocumentEvaluation> {
        let gradings: Vec<_> = documents
            .iter()
            .enumerate()
            .map(|(index, document)| self.grade_one(question, index, document, deadline))
            .collect();

        stream::iter(gradings)
            .buffered(self.grading.grading_concurrency.max(1))
            .collect()
            .await
    }

    async fn grade_one(
        &self,
        question: &str,
        index: usize,
        document: &str,
        deadline: &Deadline,
    ) -> DocumentEvaluation {
        match deadline
            .run("grade_document", self.grader.grade_document(question, document))
            .await
        {
            Ok(judgment) => DocumentEvaluation::graded(index, judgment),
            Err(e) => {
                warn!(index, error = %e, "Document could not be graded");
                DocumentEvaluation::ungraded(index, e.to_string())
            }
        }
    }

    async fn synthesize(
        &self,
        trace: &mut StageTrace,
        state: GraphState,
        deadline: &Deadline,
    ) -> StageOutput {
        trace.advance(WorkflowStage::Synthesize)?;

        let evidence = state.relevant_documents();
        let answer = match deadline
            .run(
                "synthesize",
                self.synthesizer.synthesize(state.question(), &evidence),
            )
            .await
        {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => {
                let e = DomainError::provider(
                    self.synthesizer.synthesizer_name(),
                    "synthesizer returned an empty answer",
                );
                return self.fail(trace, state, AdapterKind::Synthesizer, WorkflowStage::Synthesize, e);
            }
            Err(e) => {
                return self.fail(trace, state, AdapterKind::Synthesizer, WorkflowStage::Synthesize, e);
            }
        };

        let state = state.with_solution(answer)?;
        trace.advance(WorkflowStage::End)?;

        Ok((state, QuestionOutcome::Answered))
    }

    /// End the run on a collaborator failure, keeping partial state
    fn fail(
        &self,
        trace: &mut StageTrace,
        state: GraphState,
        adapter: AdapterKind,
        stage: WorkflowStage,
        error: DomainError,
    ) -> StageOutput {
        warn!(
            adapter = adapter.as_str(),
            stage = %stage,
            error = %error,
            "Adapter failure"
        );
        record_adapter_failure(adapter.as_str());

        trace.advance(WorkflowStage::NoAnswer)?;
        trace.advance(WorkflowStage::End)?;

        Ok((
            state,
            QuestionOutcome::adapter_failure(adapter, stage, error.to_string()),
        ))
    }
}

#[async_trait]
impl QuestionAnswering for RagWorkflow {
    async fn process_question(&self, question: &str) -> Result<WorkflowResult, WorkflowError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("process_question", %request_id);

        async move {
            let start = Instant::now();
            let state = GraphState::new(question)?;
            let deadline = Deadline::after(self.config.timeout_ms);
            let mut trace = StageTrace::new();

            let (state, outcome) = self.run(state, &mut trace, &deadline).await?;
            if !trace.current().is_terminal() {
                return Err(WorkflowError::state_invariant(format!(
                    "run stopped at {} without reaching end",
                    trace.current()
                )));
            }

            let elapsed = start.elapsed();
            record_question_outcome(outcome.label(), state.search_method(), elapsed);
            info!(
                outcome = outcome.label(),
                search_method = state.search_method().map_or("none", |m| m.as_str()),
                elapsed_ms = elapsed.as_millis() as u64,
                "Question processed"
            );

            Ok(WorkflowResult::new(
                request_id,
                outcome,
                state,
                trace.into_stages(),
                elapsed.as_millis() as u64,
            ))
        }
        .instrument(span)
        .await
    }
}
