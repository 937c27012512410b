//! Question workflow controller

mod controller;

pub use controller::{RagWorkflow, RagWorkflowConfig};
