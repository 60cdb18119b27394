//! PDF text extraction and word counting.
//!
//! Extraction wraps the pdf-extract crate: pages come back concatenated in
//! page order, and pages with no extractable text (scanned images) simply
//! contribute nothing. Encrypted or corrupted documents are errors.

use regex::Regex;
use std::collections::HashMap;

use crate::stopwords::StopwordSet;

/// Extract full text from PDF bytes.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| format!("Failed to extract PDF text: {}", e))
}

/// Count words in extracted text, excluding stopwords.
///
/// A word is a maximal run of word characters (alphanumeric plus underscore)
/// bounded by anything else; matching is case-insensitive via lowercasing the
/// whole text first. Stopwords are matched exactly against the lowercased
/// tokens. Every returned count is >= 1.
pub fn count_words(text: &str, stopwords: &StopwordSet) -> HashMap<String, u64> {
    let word_pattern = Regex::new(r"\b\w+\b").unwrap();
    let lowered = text.to_lowercase();

    let mut counts: HashMap<String, u64> = HashMap::new();
    for token in word_pattern.find_iter(&lowered) {
        let word = token.as_str();
        if stopwords.contains(word) {
            continue;
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Most frequent word in a count map, ties broken alphabetically.
pub fn top_word(counts: &HashMap<String, u64>) -> Option<(String, u64)> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(word, count)| (word.clone(), *count))
}
