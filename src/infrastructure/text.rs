//! Term extraction shared by lexical search and lexical grading

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from",
    "how", "i", "in", "is", "it", "its", "me", "of", "on", "or", "that", "the", "this", "to",
    "was", "what", "when", "where", "which", "who", "why", "with", "you", "your",
];

/// Lowercased content terms of `text`, stop words and single characters removed
pub fn content_terms(text: &str) -> HashSet<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|term| term.chars().count() > 1 && !STOP_WORDS.contains(&term.as_str()))
        .collect()
}

/// Fraction of `query` terms that also occur in `document` (0.0 - 1.0)
pub fn term_overlap(query: &HashSet<String>, document: &HashSet<String>) -> f32 {
    if query.is_empty() {
        return 0.0;
    }

    let shared = query.intersection(document).count();
    shared as f32 / query.len() as f32
}
