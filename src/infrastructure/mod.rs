//! Infrastructure layer - adapters for external services and the workflow controller

pub mod crag;
pub mod http_client;
pub mod knowledge_base;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod retrieval;
pub mod synthesis;
pub mod text;
pub mod workflow;
