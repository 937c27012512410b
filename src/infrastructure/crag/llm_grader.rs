//! LLM-based relevance grader
//!
//! Asks a chat model for a 0-10 score and a reason, normalizes the score and
//! classifies it with the configured thresholds.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::unscoped_question_judgment;
use crate::domain::crag::{CragConfig, Judgment, RelevanceGrader};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

const GRADER_NAME: &str = "llm_grader";

#[derive(Debug)]
pub struct LlmRelevanceGrader {
    provider: Arc<dyn LlmProvider>,
    config: CragConfig,
    model: String,
}

impl LlmRelevanceGrader {
    /// `config.scoring_model` overrides `default_model` when set
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        default_model: impl Into<String>,
        config: CragConfig,
    ) -> Self {
        let model = config
            .scoring_model
            .clone()
            .unwrap_or_else(|| default_model.into());

        Self {
            provider,
            config,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn ask_for_score(&self, prompt: String) -> Result<(f32, String), DomainError> {
        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(150)
            .json_output()
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let reply = parse_score_reply(response.content())?;

        Ok((normalize_score(reply.score), reply.reason))
    }
}

#[derive(Debug, Deserialize)]
struct ScoreReply {
    score: f32,
    #[serde(default)]
    reason: String,
}

fn parse_score_reply(content: &str) -> Result<ScoreReply, DomainError> {
    let json = extract_json(content).unwrap_or(content);

    let reply: ScoreReply = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, response = %content, "Unparseable grading response");
        DomainError::provider(GRADER_NAME, format!("Invalid grading response: {}", e))
    })?;

    if reply.reason.trim().is_empty() {
        return Err(DomainError::provider(
            GRADER_NAME,
            "Grading response has no reason",
        ));
    }

    if !reply.score.is_finite() {
        return Err(DomainError::provider(
            GRADER_NAME,
            "Grading response score is not a number",
        ));
    }

    Ok(reply)
}

/// The model answers on a 0-10 scale
fn normalize_score(score: f32) -> f32 {
    (score / 10.0).clamp(0.0, 1.0)
}

/// Outermost `{...}` in the text, which also strips markdown code fences
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[async_trait]
impl RelevanceGrader for LlmRelevanceGrader {
    async fn grade_document(
        &self,
        question: &str,
        document: &str,
    ) -> Result<Judgment, DomainError> {
        let prompt = self
            .config
            .get_evaluation_prompt()
            .replace("${question}", question)
            .replace("${document}", document);

        let (score, reason) = self.ask_for_score(prompt).await?;
        let judgment = Judgment::from_score(&self.config, score, reason)?;

        debug!(
            model = %self.model,
            score,
            classification = ?judgment.classification,
            "Document graded"
        );

        Ok(judgment)
    }

    async fn grade_question(&self, question: &str) -> Result<Judgment, DomainError> {
        let Some(scope) = self.config.corpus_scope.as_deref() else {
            return unscoped_question_judgment();
        };

        let prompt = self
            .config
            .get_question_prompt()
            .replace("${question}", question)
            .replace("${scope}", scope);

        let (score, reason) = self.ask_for_score(prompt).await?;
        let judgment = Judgment::from_score(&self.config, score, reason)?;

        debug!(score, classification = ?judgment.classification, "Question scope graded");

        Ok(judgment)
    }

    fn grader_name(&self) -> &'static str {
        GRADER_NAME
    }
}
