//! Question workflow domain - the pipeline state machine

mod error;
mod executor;
mod outcome;
mod stage;
mod state;

pub use error::WorkflowError;
pub use executor::QuestionAnswering;
pub use outcome::{AdapterKind, QuestionOutcome, WorkflowResult};
pub use stage::{StageTrace, WorkflowStage};
pub use state::GraphState;
