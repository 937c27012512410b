//! Aggregate sufficiency judgment over an evidence set

use serde::{Deserialize, Serialize};

use super::judgment::DocumentEvaluation;

/// Aggregate verdict over all evaluations of one retrieval round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceVerdict {
    /// Enough relevant documents to synthesize an answer
    Sufficient,
    /// Every document was graded and too few were relevant
    Insufficient,
    /// Too few relevant documents, but ungraded ones could have made up the difference
    Inconclusive,
}

/// Counts behind an `EvidenceVerdict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRelevanceScore {
    pub verdict: EvidenceVerdict,
    pub total: usize,
    pub relevant: usize,
    pub irrelevant: usize,
    pub ungraded: usize,
    /// Relevant documents the policy required
    pub required: usize,
}

impl DocumentRelevanceScore {
    pub fn is_sufficient(&self) -> bool {
        self.verdict == EvidenceVerdict::Sufficient
    }

    pub fn relevant_percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.relevant as f32 / self.total as f32) * 100.0
        }
    }
}

/// Threshold policy deciding when evidence is sufficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevancePolicy {
    pub min_relevant_documents: usize,
}

impl Default for RelevancePolicy {
    fn default() -> Self {
        Self {
            min_relevant_documents: 1,
        }
    }
}

impl RelevancePolicy {
    /// A policy requiring at least `min` relevant documents (never less than one)
    pub fn at_least(min: usize) -> Self {
        Self {
            min_relevant_documents: min.max(1),
        }
    }

    pub fn assess(&self, evaluations: &[DocumentEvaluation]) -> DocumentRelevanceScore {
        let relevant = evaluations.iter().filter(|e| e.is_relevant()).count();
        let ungraded = evaluations.iter().filter(|e| e.is_ungraded()).count();
        let total = evaluations.len();
        let required = self.min_relevant_documents;

        let verdict = if relevant >= required {
            EvidenceVerdict::Sufficient
        } else if relevant + ungraded >= required {
            EvidenceVerdict::Inconclusive
        } else {
            EvidenceVerdict::Insufficient
        };

        DocumentRelevanceScore {
            verdict,
            total,
            relevant,
            irrelevant: total - relevant - ungraded,
            ungraded,
            required,
        }
    }
}
