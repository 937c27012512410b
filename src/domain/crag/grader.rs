//! Relevance grader trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::judgment::Judgment;
use crate::domain::DomainError;

/// Grades evidence against a question.
///
/// Graders are stateless: the same inputs may still produce different
/// judgments across runs when backed by a model. On failure they return an
/// error, never a defaulted verdict.
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    /// Judge whether `document` helps answer `question`
    async fn grade_document(&self, question: &str, document: &str)
    -> Result<Judgment, DomainError>;

    /// Judge whether `question` falls within the local corpus scope
    async fn grade_question(&self, question: &str) -> Result<Judgment, DomainError>;

    fn grader_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::crag::RelevanceClassification;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Deterministic grader keyed on substrings of the document text
    #[derive(Debug, Default)]
    pub struct MockRelevanceGrader {
        relevant_needles: Vec<String>,
        failing_needles: Vec<String>,
        out_of_scope: bool,
        question_error: Option<String>,
        delay: Option<Duration>,
        document_calls: AtomicUsize,
        question_calls: AtomicUsize,
    }

    impl MockRelevanceGrader {
        pub fn new() -> Self {
            Self::default()
        }

        /// Documents containing `needle` are judged relevant; all others irrelevant
        pub fn relevant_when_contains(mut self, needle: impl Into<String>) -> Self {
            self.relevant_needles.push(needle.into());
            self
        }

        /// Grading documents containing `needle` fails
        pub fn fail_when_contains(mut self, needle: impl Into<String>) -> Self {
            self.failing_needles.push(needle.into());
            self
        }

        pub fn with_question_out_of_scope(mut self) -> Self {
            self.out_of_scope = true;
            self
        }

        pub fn with_question_error(mut self, error: impl Into<String>) -> Self {
            self.question_error = Some(error.into());
            self
        }

        /// Sleep before each document judgment
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn document_calls(&self) -> usize {
            self.document_calls.load(Ordering::SeqCst)
        }

        pub fn question_calls(&self) -> usize {
            self.question_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RelevanceGrader for MockRelevanceGrader {
        async fn grade_document(
            &self,
            _question: &str,
            document: &str,
        ) -> Result<Judgment, DomainError> {
            self.document_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.failing_needles.iter().any(|n| document.contains(n.as_str())) {
                return Err(DomainError::provider("mock_grader", "grading failed"));
            }

            if self.relevant_needles.iter().any(|n| document.contains(n.as_str())) {
                Judgment::new(true, RelevanceClassification::Correct, "mock: matched needle")
            } else {
                Judgment::new(false, RelevanceClassification::Incorrect, "mock: no needle")
            }
        }

        async fn grade_question(&self, _question: &str) -> Result<Judgment, DomainError> {
            self.question_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.question_error {
                return Err(DomainError::provider("mock_grader", error));
            }

            if self.out_of_scope {
                Judgment::new(false, RelevanceClassification::Incorrect, "mock: out of scope")
            } else {
                Judgment::new(true, RelevanceClassification::Correct, "mock: in scope")
            }
        }

        fn grader_name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockRelevanceGrader;
    use super::*;

    #[tokio::test]
    async fn test_mock_grader_needles() {
        let grader = MockRelevanceGrader::new()
            .relevant_when_contains("tokio")
            .fail_when_contains("broken");

        assert!(grader.grade_document("q", "tokio runtime").await.unwrap().relevant);
        assert!(!grader.grade_document("q", "gardening").await.unwrap().relevant);
        assert!(grader.grade_document("q", "broken tokio").await.is_err());
        assert_eq!(grader.document_calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_grader_question_scope() {
        let in_scope = MockRelevanceGrader::new();
        let out_of_scope = MockRelevanceGrader::new().with_question_out_of_scope();

        assert!(in_scope.grade_question("q").await.unwrap().relevant);
        assert!(!out_of_scope.grade_question("q").await.unwrap().relevant);
        assert_eq!(out_of_scope.question_calls(), 1);
    }
}
