//! Answer synthesizer implementations

mod llm_synthesizer;

pub use llm_synthesizer::LlmAnswerSynthesizer;
