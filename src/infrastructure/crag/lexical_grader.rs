//! Lexical relevance grader
//!
//! Scores evidence by the fraction of the question's content terms it
//! contains. Deterministic and offline.

use async_trait::async_trait;

use super::unscoped_question_judgment;
use crate::domain::crag::{CragConfig, Judgment, RelevanceGrader};
use crate::domain::DomainError;
use crate::infrastructure::text::{content_terms, term_overlap};

#[derive(Debug, Clone)]
pub struct LexicalRelevanceGrader {
    config: CragConfig,
}

impl LexicalRelevanceGrader {
    pub fn new(config: CragConfig) -> Self {
        Self { config }
    }

    fn judge(&self, question: &str, evidence: &str, noun: &str) -> Result<Judgment, DomainError> {
        let question_terms = content_terms(question);
        if question_terms.is_empty() {
            return Judgment::from_score(
                &self.config,
                0.0,
                "question has no content terms to match",
            );
        }

        let evidence_terms = content_terms(evidence);
        let score = term_overlap(&question_terms, &evidence_terms);

        let mut matched: Vec<&str> = question_terms
            .intersection(&evidence_terms)
            .map(String::as_str)
            .collect();
        matched.sort_unstable();

        let rationale = if matched.is_empty() {
            format!("no question terms found in {}", noun)
        } else {
            format!(
                "{} of {} question terms found in {}: {}",
                matched.len(),
                question_terms.len(),
                noun,
                matched.join(", ")
            )
        };

        Judgment::from_score(&self.config, score, rationale)
    }
}

#[async_trait]
impl RelevanceGrader for LexicalRelevanceGrader {
    async fn grade_document(
        &self,
        question: &str,
        document: &str,
    ) -> Result<Judgment, DomainError> {
        self.judge(question, document, "document")
    }

    async fn grade_question(&self, question: &str) -> Result<Judgment, DomainError> {
        match self.config.corpus_scope.as_deref() {
            Some(scope) => self.judge(question, scope, "corpus scope"),
            None => unscoped_question_judgment(),
        }
    }

    fn grader_name(&self) -> &'static str {
        "lexical"
    }
}
