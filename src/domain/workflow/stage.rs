//! Pipeline stages and the transition table between them

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// A stage of the question pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Start,
    Route,
    Retrieve,
    GradeDocuments,
    Synthesize,
    FallbackOnline,
    NoAnswer,
    End,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Route => "route",
            Self::Retrieve => "retrieve",
            Self::GradeDocuments => "grade_documents",
            Self::Synthesize => "synthesize",
            Self::FallbackOnline => "fallback_online",
            Self::NoAnswer => "no_answer",
            Self::End => "end",
        }
    }

    /// Whether the pipeline may move directly from `self` to `next`
    pub fn can_transition_to(&self, next: WorkflowStage) -> bool {
        use WorkflowStage::*;

        matches!(
            (*self, next),
            (Start, Route)
                | (Route, Retrieve | FallbackOnline | NoAnswer)
                | (Retrieve, GradeDocuments | NoAnswer)
                | (GradeDocuments, Synthesize | FallbackOnline | NoAnswer)
                | (FallbackOnline, Retrieve)
                | (Synthesize, End | NoAnswer)
                | (NoAnswer, End)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the stages one run visited.
///
/// Rejects edges missing from the transition table and a second visit to
/// `FallbackOnline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTrace {
    stages: Vec<WorkflowStage>,
    fallback_taken: bool,
}

impl Default for StageTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTrace {
    pub fn new() -> Self {
        Self {
            stages: vec![WorkflowStage::Start],
            fallback_taken: false,
        }
    }

    pub fn current(&self) -> WorkflowStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(WorkflowStage::Start)
    }

    pub fn advance(&mut self, next: WorkflowStage) -> Result<(), WorkflowError> {
        let current = self.current();

        if !current.can_transition_to(next) {
            return Err(WorkflowError::invalid_transition(current, next));
        }

        if next == WorkflowStage::FallbackOnline {
            if self.fallback_taken {
                return Err(WorkflowError::invalid_transition(current, next));
            }
            self.fallback_taken = true;
        }

        self.stages.push(next);
        Ok(())
    }

    pub fn fallback_taken(&self) -> bool {
        self.fallback_taken
    }

    pub fn stages(&self) -> &[WorkflowStage] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<WorkflowStage> {
        self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkflowStage::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut trace = StageTrace::new();

        for stage in [Route, Retrieve, GradeDocuments, Synthesize, End] {
            trace.advance(stage).unwrap();
        }

        assert_eq!(
            trace.stages(),
            &[Start, Route, Retrieve, GradeDocuments, Synthesize, End]
        );
        assert!(trace.current().is_terminal());
        assert!(!trace.fallback_taken());
    }

    #[test]
    fn test_fallback_path_transitions() {
        let mut trace = StageTrace::new();

        for stage in [
            Route,
            Retrieve,
            GradeDocuments,
            FallbackOnline,
            Retrieve,
            GradeDocuments,
            NoAnswer,
            End,
        ] {
            trace.advance(stage).unwrap();
        }

        assert!(trace.fallback_taken());
        assert_eq!(trace.into_stages().len(), 9);
    }

    #[test]
    fn test_fallback_is_visited_at_most_once() {
        let mut trace = StageTrace::new();
        for stage in [Route, FallbackOnline, Retrieve, GradeDocuments] {
            trace.advance(stage).unwrap();
        }

        let result = trace.advance(FallbackOnline);

        assert_eq!(
            result,
            Err(WorkflowError::invalid_transition(GradeDocuments, FallbackOnline))
        );
        assert_eq!(trace.current(), GradeDocuments);
    }

    #[test]
    fn test_illegal_edges_are_rejected() {
        let mut trace = StageTrace::new();

        assert!(trace.advance(Retrieve).is_err());
        assert!(trace.advance(End).is_err());
        assert_eq!(trace.stages(), &[Start]);

        assert!(!Synthesize.can_transition_to(FallbackOnline));
        assert!(!End.can_transition_to(Start));
        assert!(!NoAnswer.can_transition_to(Synthesize));
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_json::to_string(&GradeDocuments).unwrap(),
            "\"grade_documents\""
        );
        assert_eq!(FallbackOnline.to_string(), "fallback_online");
    }
}
