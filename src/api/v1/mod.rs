//! Versioned public API

pub mod questions;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/questions", post(questions::ask_question))
}
