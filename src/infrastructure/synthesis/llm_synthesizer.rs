//! Grounded answer synthesis with a chat model

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::{AnswerSynthesizer, DomainError};

const SYSTEM_PROMPT: &str = "You answer questions using only the numbered evidence provided. \
If the evidence does not contain the answer, say so plainly. \
Cite evidence by its number, e.g. [1]. Be concise.";

#[derive(Debug)]
pub struct LlmAnswerSynthesizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmAnswerSynthesizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

fn build_user_prompt(question: &str, evidence: &[String]) -> String {
    let mut prompt = String::from("Evidence:\n");
    for (i, document) in evidence.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\n\n", i + 1, document.trim()));
    }
    prompt.push_str(&format!("Question: {}", question));
    prompt
}

#[async_trait]
impl AnswerSynthesizer for LlmAnswerSynthesizer {
    async fn synthesize(&self, question: &str, evidence: &[String]) -> Result<String, DomainError> {
        if evidence.is_empty() {
            return Err(DomainError::validation(
                "synthesis requires at least one evidence document",
            ));
        }

        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(build_user_prompt(question, evidence))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let answer = response.content().trim();

        if answer.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Model returned an empty answer",
            ));
        }

        debug!(model = %self.model, evidence = evidence.len(), "Answer synthesized");

        Ok(answer.to_string())
    }

    fn synthesizer_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{MessageRole, MockLlmProvider};

    fn evidence() -> Vec<String> {
        vec![
            "Tokio is an async runtime.".to_string(),
            "It schedules tasks with work stealing.".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_synthesize_numbers_evidence() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response("  Tokio is a runtime [1].  "));
        let synthesizer = LlmAnswerSynthesizer::new(provider.clone(), "gpt-4o-mini");

        let answer = synthesizer.synthesize("What is tokio?", &evidence()).await.unwrap();

        assert_eq!(answer, "Tokio is a runtime [1].");
        let request = provider.last_request().unwrap();
        let user = request.text_for(MessageRole::User);
        assert!(user.contains("[1] Tokio is an async runtime."));
        assert!(user.contains("[2] It schedules tasks"));
        assert!(user.ends_with("Question: What is tokio?"));
        assert!(!request.text_for(MessageRole::System).is_empty());
    }

    #[tokio::test]
    async fn test_empty_evidence_is_rejected_without_calling_the_model() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response("answer"));
        let synthesizer = LlmAnswerSynthesizer::new(provider.clone(), "m");

        let result = synthesizer.synthesize("q", &[]).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_model_output_is_an_error() {
        let synthesizer =
            LlmAnswerSynthesizer::new(Arc::new(MockLlmProvider::new("mock").with_response("   ")), "m");

        let result = synthesizer.synthesize("q", &evidence()).await;
        assert_eq!(
            result.unwrap_err(),
            DomainError::provider("mock", "Model returned an empty answer")
        );
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let synthesizer =
            LlmAnswerSynthesizer::new(Arc::new(MockLlmProvider::new("mock").with_error("down")), "m");

        assert!(synthesizer.synthesize("q", &evidence()).await.is_err());
    }
}
