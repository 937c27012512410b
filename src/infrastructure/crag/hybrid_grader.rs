//! Hybrid relevance grader
//!
//! Lexical pass first; only ambiguous judgments are sent to the LLM grader.

use async_trait::async_trait;
use tracing::debug;

use super::{LexicalRelevanceGrader, LlmRelevanceGrader};
use crate::domain::crag::{Judgment, RelevanceGrader};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct HybridRelevanceGrader {
    lexical: LexicalRelevanceGrader,
    llm: LlmRelevanceGrader,
}

impl HybridRelevanceGrader {
    pub fn new(lexical: LexicalRelevanceGrader, llm: LlmRelevanceGrader) -> Self {
        Self { lexical, llm }
    }
}

#[async_trait]
impl RelevanceGrader for HybridRelevanceGrader {
    async fn grade_document(
        &self,
        question: &str,
        document: &str,
    ) -> Result<Judgment, DomainError> {
        let lexical = self.lexical.grade_document(question, document).await?;
        if !lexical.classification.is_ambiguous() {
            return Ok(lexical);
        }

        debug!("Ambiguous lexical judgment, refining with LLM");
        self.llm.grade_document(question, document).await
    }

    async fn grade_question(&self, question: &str) -> Result<Judgment, DomainError> {
        let lexical = self.lexical.grade_question(question).await?;
        if !lexical.classification.is_ambiguous() {
            return Ok(lexical);
        }

        debug!("Ambiguous question scope, refining with LLM");
        self.llm.grade_question(question).await
    }

    fn grader_name(&self) -> &'static str {
        "hybrid"
    }
}
