//! Retrieval domain - where candidate evidence comes from

mod source;

pub use source::{DocumentSource, SearchMethod};

#[cfg(test)]
pub use source::MockDocumentSource;
