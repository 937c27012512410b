//! Relevance judgments and per-document evaluation records

use serde::{Deserialize, Serialize};

use super::config::{CragConfig, RelevanceClassification};
use crate::domain::DomainError;

/// A grader's verdict on one piece of evidence (or on the question itself)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub relevant: bool,
    pub classification: RelevanceClassification,
    /// Normalized score (0.0 - 1.0) when the grader produces one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub rationale: String,
}

impl Judgment {
    /// Create a judgment. A blank rationale is rejected: every verdict must say why.
    pub fn new(
        relevant: bool,
        classification: RelevanceClassification,
        rationale: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let rationale = rationale.into();
        if rationale.trim().is_empty() {
            return Err(DomainError::validation("judgment rationale must not be blank"));
        }

        Ok(Self {
            relevant,
            classification,
            score: None,
            rationale: rationale.trim().to_string(),
        })
    }

    /// Classify `score` with the configured thresholds and relevance rule
    pub fn from_score(
        config: &CragConfig,
        score: f32,
        rationale: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let score = score.clamp(0.0, 1.0);
        let classification = config.classify(score);
        let judgment = Self::new(config.counts_as_relevant(classification), classification, rationale)?;

        Ok(judgment.with_score(score))
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Outcome of grading one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Graded { judgment: Judgment },
    /// The grading call failed; neither relevant nor irrelevant
    Ungraded { error: String },
}

/// Evaluation record aligned with `documents[index]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvaluation {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: EvaluationOutcome,
}

impl DocumentEvaluation {
    pub fn graded(index: usize, judgment: Judgment) -> Self {
        Self {
            index,
            outcome: EvaluationOutcome::Graded { judgment },
        }
    }

    pub fn ungraded(index: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            outcome: EvaluationOutcome::Ungraded {
                error: error.into(),
            },
        }
    }

    pub fn judgment(&self) -> Option<&Judgment> {
        match &self.outcome {
            EvaluationOutcome::Graded { judgment } => Some(judgment),
            EvaluationOutcome::Ungraded { .. } => None,
        }
    }

    pub fn is_relevant(&self) -> bool {
        self.judgment().is_some_and(|j| j.relevant)
    }

    pub fn is_irrelevant(&self) -> bool {
        self.judgment().is_some_and(|j| !j.relevant)
    }

    pub fn is_ungraded(&self) -> bool {
        matches!(self.outcome, EvaluationOutcome::Ungraded { .. })
    }
}
