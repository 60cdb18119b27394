//! Ingest pipeline for publication manifests.
//!
//! Per entry: idempotency gate, fetch, extract, tokenize, count. Every entry
//! resolves to a typed outcome; a failing publication never aborts the run.
//! The pipeline itself persists nothing; the caller stores returned records
//! (and thereby marks the publication processed), so the `on_entry` callback
//! fires before the next entry's gate is consulted.

use std::collections::HashMap;

use crate::db::WordCountRecord;
use crate::extract;
use crate::fetch;
use crate::manifest::ManifestEntry;
use crate::stopwords::StopwordSet;

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Extraction succeeded; one record per distinct word, sorted by word.
    Ingested {
        records: Vec<WordCountRecord>,
        top_word: Option<(String, u64)>,
    },
    /// The (title, date) pair was already processed; no work was done.
    Skipped,
    /// Fetch or extraction failed; the run continued.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub title: String,
    pub date: Option<String>,
    pub outcome: IngestOutcome,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl IngestReport {
    pub fn ingested(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Ingested { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|entry| match &entry.outcome {
            IngestOutcome::Failed { reason } => Some((entry.title.as_str(), reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&IngestOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|e| predicate(&e.outcome)).count()
    }
}

/// Run the pipeline over a manifest with the real HTTP fetcher.
///
/// `already_processed` is the idempotency gate, consulted before any network
/// or extraction work. `on_entry` fires once per entry, in order, as soon as
/// its outcome is known; persist the records there so duplicate manifest
/// rows hit the gate.
pub fn ingest<P, F>(
    manifest: &[ManifestEntry],
    stopwords: &StopwordSet,
    already_processed: P,
    on_entry: F,
) -> Result<IngestReport, String>
where
    P: Fn(&str, Option<&str>) -> bool,
    F: FnMut(usize, usize, &EntryOutcome),
{
    let client = fetch::build_client()?;
    Ok(ingest_with(
        manifest,
        stopwords,
        already_processed,
        |url| fetch::fetch_pdf(&client, url),
        on_entry,
    ))
}

/// Pipeline with an injected fetcher (tests run without a network).
pub fn ingest_with<P, F, E>(
    manifest: &[ManifestEntry],
    stopwords: &StopwordSet,
    already_processed: P,
    fetcher: F,
    mut on_entry: E,
) -> IngestReport
where
    P: Fn(&str, Option<&str>) -> bool,
    F: Fn(&str) -> Result<Vec<u8>, String>,
    E: FnMut(usize, usize, &EntryOutcome),
{
    let total = manifest.len();
    let mut report = IngestReport::default();

    for (index, entry) in manifest.iter().enumerate() {
        let outcome = process_entry(entry, stopwords, &already_processed, &fetcher);
        let entry_outcome = EntryOutcome {
            title: entry.title.clone(),
            date: entry.date.clone(),
            outcome,
        };
        on_entry(index + 1, total, &entry_outcome);
        report.outcomes.push(entry_outcome);
    }

    report
}

fn process_entry<P, F>(
    entry: &ManifestEntry,
    stopwords: &StopwordSet,
    already_processed: &P,
    fetcher: &F,
) -> IngestOutcome
where
    P: Fn(&str, Option<&str>) -> bool,
    F: Fn(&str) -> Result<Vec<u8>, String>,
{
    if already_processed(&entry.title, entry.date.as_deref()) {
        return IngestOutcome::Skipped;
    }

    let bytes = match fetcher(&entry.source_url) {
        Ok(bytes) => bytes,
        Err(reason) => return IngestOutcome::Failed { reason },
    };

    let text = match extract::extract_text(&bytes) {
        Ok(text) => text,
        Err(reason) => return IngestOutcome::Failed { reason },
    };

    let counts = extract::count_words(&text, stopwords);
    let top_word = extract::top_word(&counts);

    IngestOutcome::Ingested {
        records: to_records(entry, counts),
        top_word,
    }
}

fn to_records(entry: &ManifestEntry, counts: HashMap<String, u64>) -> Vec<WordCountRecord> {
    let mut records: Vec<WordCountRecord> = counts
        .into_iter()
        .map(|(word, count)| WordCountRecord {
            publication: entry.title.clone(),
            date: entry.date.clone(),
            project: entry.project.clone(),
            word,
            count,
        })
        .collect();
    records.sort_by(|a, b| a.word.cmp(&b.word));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::StopwordSet;

    fn entry(title: &str, date: Option<&str>, url: &str) -> ManifestEntry {
        ManifestEntry {
            title: title.to_string(),
            date: date.map(|d| d.to_string()),
            project: "Proj".to_string(),
            source_url: url.to_string(),
            project_start_date: None,
        }
    }

    #[test]
    fn test_gate_is_checked_before_any_work() {
        let manifest = vec![entry("Done", Some("2021-01-01"), "https://example.org/a.pdf")];
        let report = ingest_with(
            &manifest,
            &StopwordSet::new(),
            |_, _| true,
            |_| panic!("fetcher must not run for an already-processed entry"),
            |_, _, _| {},
        );

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.outcomes[0].outcome, IngestOutcome::Skipped);
    }

    #[test]
    fn test_one_failure_does_not_abort_the_run() {
        let manifest = vec![
            entry("Broken", Some("2020-01-01"), "https://example.org/broken.pdf"),
            entry("Skipped", Some("2021-01-01"), "https://example.org/done.pdf"),
        ];

        let report = ingest_with(
            &manifest,
            &StopwordSet::new(),
            |title, _| title == "Skipped",
            |url| Err(format!("{} returned status 404 Not Found", url)),
            |_, _, _| {},
        );

        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        let (title, reason) = report.failures().next().unwrap();
        assert_eq!(title, "Broken");
        assert!(reason.contains("404"));
    }

    #[test]
    fn test_invalid_pdf_bytes_fail_that_entry_only() {
        let manifest = vec![
            entry("Garbage", Some("2020-01-01"), "https://example.org/garbage.pdf"),
            entry("AlsoGarbage", Some("2021-01-01"), "https://example.org/more.pdf"),
        ];

        let report = ingest_with(
            &manifest,
            &StopwordSet::new(),
            |_, _| false,
            |_| Ok(b"not a pdf at all".to_vec()),
            |_, _, _| {},
        );

        assert_eq!(report.failed(), 2);
        assert_eq!(report.ingested(), 0);
    }

    #[test]
    fn test_on_entry_fires_in_order_with_progress() {
        let manifest = vec![
            entry("A", None, "https://example.org/a.pdf"),
            entry("B", None, "https://example.org/b.pdf"),
        ];

        let mut seen = Vec::new();
        ingest_with(
            &manifest,
            &StopwordSet::new(),
            |_, _| true,
            |_| unreachable!(),
            |current, total, outcome| seen.push((current, total, outcome.title.clone())),
        );

        assert_eq!(
            seen,
            vec![(1, 2, "A".to_string()), (2, 2, "B".to_string())]
        );
    }
}
