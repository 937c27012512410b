//! Answer synthesis domain

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Produces an answer for a question from supporting evidence.
///
/// Implementations fail explicitly on upstream errors; an empty answer is
/// never a valid success.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(&self, question: &str, evidence: &[String]) -> Result<String, DomainError>;

    fn synthesizer_name(&self) -> &'static str;
}
