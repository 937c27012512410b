//! Knowledge base implementations

mod in_memory;
mod loader;

pub use in_memory::InMemoryKnowledgeBaseProvider;
pub use loader::{load_corpus, parse_corpus, seed_knowledge_base};
