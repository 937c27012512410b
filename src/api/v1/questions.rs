//! Question answering endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QuestionQueryParams, QuestionRequest, QuestionResponse};
use crate::domain::QuestionOutcome;

/// POST /v1/questions
///
/// Answered and insufficient-evidence runs are both 200; the `status` field
/// tells them apart. A failed collaborator is a 503 carrying the same body so
/// clients still see which stage failed.
pub async fn ask_question(
    State(state): State<AppState>,
    Query(params): Query<QuestionQueryParams>,
    Json(request): Json<QuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(question = %truncate_for_log(&request.question, 120), "Question received");

    let result = state.workflow.process_question(&request.question).await?;

    let status = match result.outcome {
        QuestionOutcome::AdapterFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    let response = QuestionResponse::from_result(result, params.include_evaluations);

    Ok((status, Json(response)))
}
