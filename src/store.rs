//! Store abstraction for the aggregation layer.
//!
//! The source system grew three near-identical dashboard scripts, one per
//! backend. Here the backends sit behind one read-capability trait so the
//! aggregation functions can be written once and tested against an in-memory
//! database.

use crate::db::{Database, PublicationCount, PublicationMeta, StoreTotals};

/// Read capabilities the aggregation layer needs from a word-count store.
pub trait WordStore {
    /// Per-publication totals for one word. The word must already be
    /// lowercase; stored words always are.
    fn query_by_word(&self, word: &str) -> Result<Vec<PublicationCount>, String>;

    /// Corpus totals over the word-count data.
    fn query_totals(&self) -> Result<StoreTotals, String>;

    /// All publication metadata rows.
    fn query_metadata(&self) -> Result<Vec<PublicationMeta>, String>;
}

impl WordStore for Database {
    fn query_by_word(&self, word: &str) -> Result<Vec<PublicationCount>, String> {
        self.word_publication_counts(word)
            .map_err(|e| format!("Word count query failed: {}", e))
    }

    fn query_totals(&self) -> Result<StoreTotals, String> {
        self.totals().map_err(|e| format!("Totals query failed: {}", e))
    }

    fn query_metadata(&self) -> Result<Vec<PublicationMeta>, String> {
        self.publications()
            .map_err(|e| format!("Metadata query failed: {}", e))
    }
}
