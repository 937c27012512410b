//! Grading configuration types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Relevance classification for a graded piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceClassification {
    /// Clearly relevant
    Correct,
    /// Relevance is uncertain
    Ambiguous,
    /// Clearly not relevant
    Incorrect,
}

impl RelevanceClassification {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous)
    }

    pub fn is_incorrect(&self) -> bool {
        matches!(self, Self::Incorrect)
    }
}

/// How documents and questions are graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradingStrategy {
    /// Ask an LLM for a 0-10 score and a reason
    #[default]
    LlmBased,
    /// Deterministic term overlap, no LLM call
    Lexical,
    /// Term overlap first, LLM only for ambiguous evidence
    Hybrid,
}

/// Configuration for relevance grading and the sufficiency policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CragConfig {
    #[serde(default)]
    pub strategy: GradingStrategy,
    /// Scores at or above this are "correct" (0.0 - 1.0)
    #[serde(default = "default_correct_threshold")]
    pub correct_threshold: f32,
    /// Scores at or above this are "ambiguous"; below it "incorrect"
    #[serde(default = "default_ambiguous_threshold")]
    pub ambiguous_threshold: f32,
    /// Count ambiguous documents as relevant evidence
    #[serde(default)]
    pub include_ambiguous: bool,
    /// Relevant documents needed before an answer is synthesized
    #[serde(default = "default_min_relevant")]
    pub min_relevant_documents: usize,
    /// Retrieved documents beyond this are dropped before grading
    #[serde(default = "default_max_documents")]
    pub max_documents_to_grade: usize,
    /// Documents graded in parallel
    #[serde(default = "default_concurrency")]
    pub grading_concurrency: usize,
    /// Document prompt template; variables: ${question}, ${document}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_prompt: Option<String>,
    /// Question scope prompt template; variables: ${question}, ${scope}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_prompt: Option<String>,
    /// Topic description of the local corpus. Unset means every question is in scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_model: Option<String>,
    #[serde(default)]
    pub temperature: f32,
}

fn default_correct_threshold() -> f32 {
    0.7
}

fn default_ambiguous_threshold() -> f32 {
    0.4
}

fn default_min_relevant() -> usize {
    1
}

fn default_max_documents() -> usize {
    10
}

fn default_concurrency() -> usize {
    4
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            strategy: GradingStrategy::default(),
            correct_threshold: default_correct_threshold(),
            ambiguous_threshold: default_ambiguous_threshold(),
            include_ambiguous: false,
            min_relevant_documents: default_min_relevant(),
            max_documents_to_grade: default_max_documents(),
            grading_concurrency: default_concurrency(),
            evaluation_prompt: None,
            question_prompt: None,
            corpus_scope: None,
            scoring_model: None,
            temperature: 0.0,
        }
    }
}

impl CragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexical grading with the given thresholds
    pub fn lexical(correct: f32, ambiguous: f32) -> Self {
        Self {
            strategy: GradingStrategy::Lexical,
            correct_threshold: correct,
            ambiguous_threshold: ambiguous,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: GradingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_correct_threshold(mut self, threshold: f32) -> Self {
        self.correct_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_ambiguous_threshold(mut self, threshold: f32) -> Self {
        self.ambiguous_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_include_ambiguous(mut self, include: bool) -> Self {
        self.include_ambiguous = include;
        self
    }

    pub fn with_min_relevant_documents(mut self, min: usize) -> Self {
        self.min_relevant_documents = min;
        self
    }

    pub fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents_to_grade = max;
        self
    }

    pub fn with_grading_concurrency(mut self, concurrency: usize) -> Self {
        self.grading_concurrency = concurrency;
        self
    }

    pub fn with_corpus_scope(mut self, scope: impl Into<String>) -> Self {
        self.corpus_scope = Some(scope.into());
        self
    }

    pub fn with_evaluation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.evaluation_prompt = Some(prompt.into());
        self
    }

    pub fn with_scoring_model(mut self, model: impl Into<String>) -> Self {
        self.scoring_model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Reject combinations that would make the sufficiency policy meaningless
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ambiguous_threshold > self.correct_threshold {
            return Err(DomainError::configuration(format!(
                "ambiguous_threshold ({}) must not exceed correct_threshold ({})",
                self.ambiguous_threshold, self.correct_threshold
            )));
        }
        if self.min_relevant_documents == 0 {
            return Err(DomainError::configuration(
                "min_relevant_documents must be at least 1",
            ));
        }
        if self.max_documents_to_grade == 0 {
            return Err(DomainError::configuration(
                "max_documents_to_grade must be at least 1",
            ));
        }
        if self.grading_concurrency == 0 {
            return Err(DomainError::configuration(
                "grading_concurrency must be at least 1",
            ));
        }
        Ok(())
    }

    /// Classify a normalized score based on the configured thresholds
    pub fn classify(&self, score: f32) -> RelevanceClassification {
        if score >= self.correct_threshold {
            RelevanceClassification::Correct
        } else if score >= self.ambiguous_threshold {
            RelevanceClassification::Ambiguous
        } else {
            RelevanceClassification::Incorrect
        }
    }

    /// Whether a classification counts as relevant evidence
    pub fn counts_as_relevant(&self, classification: RelevanceClassification) -> bool {
        match classification {
            RelevanceClassification::Correct => true,
            RelevanceClassification::Ambiguous => self.include_ambiguous,
            RelevanceClassification::Incorrect => false,
        }
    }

    pub fn default_evaluation_prompt() -> &'static str {
        r#"You are grading whether a retrieved document helps answer a user question.

Question: ${question}

Document:
${document}

Rate the relevance of this document to the question on a scale of 0 to 10, where:
- 0-3: Not relevant - the document does not help answer the question
- 4-6: Partially relevant - the document touches the topic but may not answer it
- 7-10: Highly relevant - the document directly supports an answer

Respond with ONLY a JSON object in this exact format:
{"score": <number>, "reason": "<brief explanation>"}"#
    }

    pub fn default_question_prompt() -> &'static str {
        r#"You decide whether a question can be answered from a private document collection.

Collection scope: ${scope}

Question: ${question}

Rate on a scale of 0 to 10 how likely the collection covers this question, where:
- 0-3: Out of scope - the question is about something the collection does not cover
- 4-6: Unclear - the question may be partly covered
- 7-10: In scope - the collection is the right place to look

Respond with ONLY a JSON object in this exact format:
{"score": <number>, "reason": "<brief explanation>"}"#
    }

    pub fn get_evaluation_prompt(&self) -> &str {
        self.evaluation_prompt
            .as_deref()
            .unwrap_or(Self::default_evaluation_prompt())
    }

    pub fn get_question_prompt(&self) -> &str {
        self.question_prompt
            .as_deref()
            .unwrap_or(Self::default_question_prompt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();

        assert_eq!(config.strategy, GradingStrategy::LlmBased);
        assert_eq!(config.correct_threshold, 0.7);
        assert_eq!(config.ambiguous_threshold, 0.4);
        assert_eq!(config.min_relevant_documents, 1);
        assert_eq!(config.max_documents_to_grade, 10);
        assert_eq!(config.grading_concurrency, 4);
        assert!(!config.include_ambiguous);
        assert!(config.corpus_scope.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config_uses_defaults() {
        let config: CragConfig =
            serde_json::from_str(r#"{"strategy": "hybrid", "min_relevant_documents": 2}"#).unwrap();

        assert_eq!(config.strategy, GradingStrategy::Hybrid);
        assert_eq!(config.min_relevant_documents, 2);
        assert_eq!(config.correct_threshold, 0.7);
    }

    #[test]
    fn test_classification() {
        let config = CragConfig::default();

        assert_eq!(config.classify(0.9), RelevanceClassification::Correct);
        assert_eq!(config.classify(0.7), RelevanceClassification::Correct);
        assert_eq!(config.classify(0.5), RelevanceClassification::Ambiguous);
        assert_eq!(config.classify(0.4), RelevanceClassification::Ambiguous);
        assert_eq!(config.classify(0.1), RelevanceClassification::Incorrect);
    }

    #[test]
    fn test_ambiguous_counts_only_when_included() {
        let strict = CragConfig::default();
        let lenient = CragConfig::default().with_include_ambiguous(true);

        assert!(!strict.counts_as_relevant(RelevanceClassification::Ambiguous));
        assert!(lenient.counts_as_relevant(RelevanceClassification::Ambiguous));
        assert!(!lenient.counts_as_relevant(RelevanceClassification::Incorrect));
    }

    #[test]
    fn test_threshold_clamping() {
        let config = CragConfig::new()
            .with_correct_threshold(1.5)
            .with_ambiguous_threshold(-0.5);

        assert_eq!(config.correct_threshold, 1.0);
        assert_eq!(config.ambiguous_threshold, 0.0);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = CragConfig::lexical(0.3, 0.6);
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        assert!(CragConfig::new().with_min_relevant_documents(0).validate().is_err());
        assert!(CragConfig::new().with_grading_concurrency(0).validate().is_err());
        assert!(CragConfig::new().with_max_documents(0).validate().is_err());
    }

    #[test]
    fn test_prompts() {
        let config = CragConfig::default();
        assert!(config.get_evaluation_prompt().contains("${document}"));
        assert!(config.get_question_prompt().contains("${scope}"));

        let custom = config.with_evaluation_prompt("Q=${question} D=${document}");
        assert_eq!(custom.get_evaluation_prompt(), "Q=${question} D=${document}");
    }
}
