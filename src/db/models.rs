use serde::{Deserialize, Serialize};

/// One persisted word-count row: a single word's tally for one publication.
///
/// Rows are written once per (publication, date) and never mutated; the only
/// delete path is a full store reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordCountRecord {
    pub publication: String,
    /// Raw date text from the manifest; None when the manifest had no date.
    pub date: Option<String>,
    pub project: String,
    /// Lowercase, no whitespace or punctuation.
    pub word: String,
    /// Always >= 1; zero-count words are never stored.
    pub count: u64,
}

/// Publication metadata row, the join target for aggregation queries.
///
/// Kept separately from the word counts: a publication can appear here with
/// zero word-count rows (e.g. its fetch failed), and the date range in global
/// stats is computed from this table, not from the counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMeta {
    pub title: String,
    pub date: Option<String>,
    pub project: String,
    pub source_url: String,
    /// Used only for derived project links.
    pub project_start_date: Option<String>,
}

/// Per-publication total for one word, as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicationCount {
    pub publication: String,
    pub total_count: u64,
}

/// Corpus-wide totals over the word-count data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreTotals {
    pub total_publications: u64,
    pub total_projects: u64,
    pub total_words: u64,
}
