//! Per-question state threaded through the pipeline
//!
//! Every transition consumes the state and returns the next one, so a stage
//! can never observe a half-updated record.

use serde::Serialize;

use super::error::WorkflowError;
use crate::domain::crag::{DocumentEvaluation, DocumentRelevanceScore, Judgment};
use crate::domain::retrieval::SearchMethod;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphState {
    question: String,
    solution: Option<String>,
    online_search: bool,
    documents: Vec<String>,
    search_method: Option<SearchMethod>,
    document_evaluations: Vec<DocumentEvaluation>,
    document_relevance_score: Option<DocumentRelevanceScore>,
    question_relevance_score: Option<Judgment>,
}

impl GraphState {
    /// Start processing `question`. Blank input is rejected.
    pub fn new(question: impl Into<String>) -> Result<Self, WorkflowError> {
        let question = question.into();
        let trimmed = question.trim();

        if trimmed.is_empty() {
            return Err(WorkflowError::invalid_input("question must not be blank"));
        }

        Ok(Self {
            question: trimmed.to_string(),
            solution: None,
            online_search: false,
            documents: Vec::new(),
            search_method: None,
            document_evaluations: Vec::new(),
            document_relevance_score: None,
            question_relevance_score: None,
        })
    }

    pub fn with_question_relevance(mut self, judgment: Judgment) -> Self {
        self.question_relevance_score = Some(judgment);
        self
    }

    /// Route subsequent retrieval to the online source
    pub fn with_online_search(mut self) -> Self {
        self.online_search = true;
        self
    }

    /// Replace the candidate evidence with a fresh retrieval round.
    ///
    /// The search method follows the current route, and evaluations from a
    /// previous round are discarded.
    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.search_method = Some(if self.online_search {
            SearchMethod::Online
        } else {
            SearchMethod::Documents
        });
        self.documents = documents;
        self.document_evaluations = Vec::new();
        self.document_relevance_score = None;
        self
    }

    /// Attach one evaluation per document, index-aligned, and the aggregate score
    pub fn with_evaluations(
        mut self,
        evaluations: Vec<DocumentEvaluation>,
        score: DocumentRelevanceScore,
    ) -> Result<Self, WorkflowError> {
        if self.search_method.is_none() {
            return Err(WorkflowError::state_invariant(
                "documents must be retrieved before they are graded",
            ));
        }

        if evaluations.len() != self.documents.len() {
            return Err(WorkflowError::state_invariant(format!(
                "{} evaluations for {} documents",
                evaluations.len(),
                self.documents.len()
            )));
        }

        if let Some((position, evaluation)) = evaluations
            .iter()
            .enumerate()
            .find(|(position, e)| e.index != *position)
        {
            return Err(WorkflowError::state_invariant(format!(
                "evaluation at position {} refers to document {}",
                position, evaluation.index
            )));
        }

        self.document_evaluations = evaluations;
        self.document_relevance_score = Some(score);
        Ok(self)
    }

    /// Record the synthesized answer. Only allowed once evidence is sufficient.
    pub fn with_solution(mut self, solution: impl Into<String>) -> Result<Self, WorkflowError> {
        let solution = solution.into();

        if !self
            .document_relevance_score
            .is_some_and(|score| score.is_sufficient())
        {
            return Err(WorkflowError::state_invariant(
                "solution requires sufficient evidence",
            ));
        }

        if solution.trim().is_empty() {
            return Err(WorkflowError::state_invariant("solution must not be blank"));
        }

        self.solution = Some(solution);
        Ok(self)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    pub fn online_search(&self) -> bool {
        self.online_search
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn search_method(&self) -> Option<SearchMethod> {
        self.search_method
    }

    pub fn document_evaluations(&self) -> &[DocumentEvaluation] {
        &self.document_evaluations
    }

    pub fn document_relevance_score(&self) -> Option<&DocumentRelevanceScore> {
        self.document_relevance_score.as_ref()
    }

    pub fn question_relevance_score(&self) -> Option<&Judgment> {
        self.question_relevance_score.as_ref()
    }

    /// Documents judged relevant in the current round, in retrieval order
    pub fn relevant_documents(&self) -> Vec<String> {
        self.documents
            .iter()
            .zip(&self.document_evaluations)
            .filter(|(_, evaluation)| evaluation.is_relevant())
            .map(|(document, _)| document.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::{RelevanceClassification, RelevancePolicy};

    fn judgment(relevant: bool) -> Judgment {
        let classification = if relevant {
            RelevanceClassification::Correct
        } else {
            RelevanceClassification::Incorrect
        };
        Judgment::new(relevant, classification, "test").unwrap()
    }

    fn graded(state: GraphState, relevant: &[bool]) -> Result<GraphState, WorkflowError> {
        let evaluations: Vec<DocumentEvaluation> = relevant
            .iter()
            .enumerate()
            .map(|(i, r)| DocumentEvaluation::graded(i, judgment(*r)))
            .collect();
        let score = RelevancePolicy::default().assess(&evaluations);
        state.with_evaluations(evaluations, score)
    }

    #[test]
    fn test_blank_question_is_invalid_input() {
        assert!(matches!(
            GraphState::new("   \n\t"),
            Err(WorkflowError::InvalidInput(_))
        ));
        assert!(matches!(GraphState::new(""), Err(WorkflowError::InvalidInput(_))));
    }

    #[test]
    fn test_question_is_trimmed() {
        let state = GraphState::new("  What is CRAG?  ").unwrap();

        assert_eq!(state.question(), "What is CRAG?");
        assert!(state.solution().is_none());
        assert!(state.search_method().is_none());
        assert!(!state.online_search());
    }

    #[test]
    fn test_search_method_follows_route() {
        let local = GraphState::new("q").unwrap().with_documents(vec!["a".into()]);
        assert_eq!(local.search_method(), Some(SearchMethod::Documents));

        let online = local.with_online_search().with_documents(vec![]);
        assert_eq!(online.search_method(), Some(SearchMethod::Online));
        assert!(online.documents().is_empty());
    }

    #[test]
    fn test_new_round_discards_previous_evaluations() {
        let state = GraphState::new("q").unwrap().with_documents(vec!["a".into()]);
        let state = graded(state, &[true]).unwrap();
        assert!(state.document_relevance_score().is_some());

        let state = state.with_online_search().with_documents(vec!["b".into(), "c".into()]);

        assert!(state.document_evaluations().is_empty());
        assert!(state.document_relevance_score().is_none());
    }

    #[test]
    fn test_evaluations_require_retrieval() {
        let state = GraphState::new("q").unwrap();
        assert!(matches!(
            graded(state, &[]),
            Err(WorkflowError::StateInvariant(_))
        ));
    }

    #[test]
    fn test_evaluations_must_match_document_count() {
        let state = GraphState::new("q")
            .unwrap()
            .with_documents(vec!["a".into(), "b".into()]);

        assert!(graded(state, &[true]).is_err());
    }

    #[test]
    fn test_evaluations_must_be_index_aligned() {
        let state = GraphState::new("q")
            .unwrap()
            .with_documents(vec!["a".into(), "b".into()]);
        let evaluations = vec![
            DocumentEvaluation::graded(1, judgment(true)),
            DocumentEvaluation::graded(0, judgment(false)),
        ];
        let score = RelevancePolicy::default().assess(&evaluations);

        assert!(state.with_evaluations(evaluations, score).is_err());
    }

    #[test]
    fn test_solution_requires_sufficient_evidence() {
        let state = GraphState::new("q").unwrap().with_documents(vec!["a".into()]);
        let state = graded(state, &[false]).unwrap();

        assert!(state.with_solution("an answer").is_err());
    }

    #[test]
    fn test_solution_must_not_be_blank() {
        let state = GraphState::new("q").unwrap().with_documents(vec!["a".into()]);
        let state = graded(state, &[true]).unwrap();

        assert!(state.clone().with_solution("  ").is_err());
        let answered = state.with_solution("an answer").unwrap();
        assert_eq!(answered.solution(), Some("an answer"));
    }

    #[test]
    fn test_relevant_documents_keep_order() {
        let state = GraphState::new("q")
            .unwrap()
            .with_documents(vec!["a".into(), "b".into(), "c".into()]);
        let state = graded(state, &[true, false, true]).unwrap();

        assert_eq!(state.relevant_documents(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_state_serialization() {
        let state = GraphState::new("q").unwrap().with_documents(vec!["a".into()]);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["question"], "q");
        assert_eq!(json["search_method"], "documents");
        assert_eq!(json["online_search"], false);
        assert!(json["solution"].is_null());
    }
}
