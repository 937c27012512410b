//! Question endpoint request and response bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    DocumentEvaluation, DocumentRelevanceScore, Judgment, QuestionOutcome, SearchMethod,
    WorkflowResult, WorkflowStage,
};

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionQueryParams {
    /// Include per-document judgments in the response
    #[serde(default)]
    pub include_evaluations: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub outcome: QuestionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_method: Option<SearchMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_relevance: Option<Judgment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_relevance: Option<DocumentRelevanceScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluations: Option<Vec<DocumentEvaluation>>,
    pub stages: Vec<WorkflowStage>,
    pub execution_time_ms: u64,
}

impl QuestionResponse {
    pub fn from_result(result: WorkflowResult, include_evaluations: bool) -> Self {
        let evaluations = include_evaluations.then(|| result.document_evaluations().to_vec());

        Self {
            request_id: result.request_id,
            solution: result.solution().map(str::to_string),
            search_method: result.search_method(),
            question_relevance: result.question_relevance_score().cloned(),
            document_relevance: result.document_relevance_score().copied(),
            evaluations,
            stages: result.stages,
            execution_time_ms: result.execution_time_ms,
            outcome: result.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GraphState;

    fn answered() -> WorkflowResult {
        let state = GraphState::new("What is tokio?")
            .unwrap()
            .with_documents(vec!["Tokio is a runtime.".to_string()]);
        WorkflowResult::new(
            Uuid::new_v4(),
            QuestionOutcome::Answered,
            state,
            vec![WorkflowStage::Start, WorkflowStage::End],
            12,
        )
    }

    #[test]
    fn test_outcome_is_flattened() {
        let response = QuestionResponse::from_result(answered(), false);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "answered");
        assert_eq!(json["stages"][0], "start");
        assert_eq!(json["execution_time_ms"], 12);
        assert!(json.get("evaluations").is_none());
    }

    #[test]
    fn test_insufficient_evidence_carries_reason() {
        let mut result = answered();
        result.outcome = QuestionOutcome::insufficient_evidence("nothing relevant");

        let json = serde_json::to_value(QuestionResponse::from_result(result, true)).unwrap();

        assert_eq!(json["status"], "insufficient_evidence");
        assert_eq!(json["reason"], "nothing relevant");
        assert_eq!(json["evaluations"], serde_json::json!([]));
    }

    #[test]
    fn test_query_params_default() {
        let params: QuestionQueryParams = serde_json::from_str("{}").unwrap();
        assert!(!params.include_evaluations);
    }
}
