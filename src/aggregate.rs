//! Aggregation queries over a word-count store.
//!
//! Every function here is pure over a [`WordStore`]: no caching, no handles
//! held between calls. Output is plain structured data; formatting (date
//! strings, links, tables) belongs to the presentation layer.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::db::PublicationMeta;
use crate::store::WordStore;
use crate::utils::{parse_pub_date, slugify};

/// Corpus-wide summary.
///
/// Totals come from the word-count data; the date range comes from the
/// metadata table. The two can disagree when a publication yielded zero
/// words (failed fetch): it moves the date range but not the totals.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_publications: u64,
    pub total_projects: u64,
    pub total_words: u64,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// One publication's total for a queried word, joined to its metadata.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordOccurrence {
    pub publication: String,
    pub date: NaiveDate,
    pub project: String,
    pub source_url: String,
    pub total_count: u64,
}

/// A named set of words whose yearly counts accumulate into one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup {
    pub label: String,
    pub words: Vec<String>,
}

/// One year of an accumulated series: the per-word breakdown plus its sum.
/// Every word of the group appears in `per_word`, zero-filled when absent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YearAccumulation {
    pub year: i32,
    pub per_word: BTreeMap<String, u64>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatedGroup {
    pub label: String,
    pub series: Vec<YearAccumulation>,
}

pub fn global_stats(store: &dyn WordStore) -> Result<GlobalStats, String> {
    let totals = store.query_totals()?;

    let mut date_range: Option<(NaiveDate, NaiveDate)> = None;
    for meta in store.query_metadata()? {
        let Some(date) = meta.date.as_deref().and_then(parse_pub_date) else {
            continue;
        };
        date_range = Some(match date_range {
            None => (date, date),
            Some((min, max)) => (min.min(date), max.max(date)),
        });
    }

    Ok(GlobalStats {
        total_publications: totals.total_publications,
        total_projects: totals.total_projects,
        total_words: totals.total_words,
        date_range,
    })
}

/// Per-publication occurrences of one word, case-insensitive.
///
/// Publications whose metadata is missing or whose date does not resolve to
/// a valid year are excluded. An unknown word yields an empty vec, a normal
/// outcome rather than an error. Sorted by total count descending, then
/// publication.
pub fn word_occurrences(store: &dyn WordStore, word: &str) -> Result<Vec<WordOccurrence>, String> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let counts = store.query_by_word(&needle)?;
    if counts.is_empty() {
        return Ok(Vec::new());
    }

    let metadata: HashMap<String, PublicationMeta> = store
        .query_metadata()?
        .into_iter()
        .map(|meta| (meta.title.clone(), meta))
        .collect();

    let mut occurrences = Vec::new();
    for count in counts {
        let Some(meta) = metadata.get(&count.publication) else {
            continue;
        };
        let Some(date) = meta.date.as_deref().and_then(parse_pub_date) else {
            continue;
        };
        occurrences.push(WordOccurrence {
            publication: count.publication,
            date,
            project: meta.project.clone(),
            source_url: meta.source_url.clone(),
            total_count: count.total_count,
        });
    }

    occurrences.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.publication.cmp(&b.publication))
    });
    Ok(occurrences)
}

/// Yearly totals for one word, ascending by year, each year at most once.
pub fn yearly_series(store: &dyn WordStore, word: &str) -> Result<Vec<(i32, u64)>, String> {
    let mut years: BTreeMap<i32, u64> = BTreeMap::new();
    for occurrence in word_occurrences(store, word)? {
        *years.entry(occurrence.date.year()).or_insert(0) += occurrence.total_count;
    }
    Ok(years.into_iter().collect())
}

/// Accumulated yearly series for groups of words.
///
/// Within a group, per-word yearly series are outer-joined on year: a year
/// present for any word appears for all of them, missing combinations as 0.
pub fn accumulated_series(
    store: &dyn WordStore,
    groups: &[WordGroup],
) -> Result<Vec<AccumulatedGroup>, String> {
    let mut result = Vec::with_capacity(groups.len());

    for group in groups {
        let mut words: Vec<String> = Vec::new();
        for raw in &group.words {
            let word = raw.trim().to_lowercase();
            if !word.is_empty() && !words.contains(&word) {
                words.push(word);
            }
        }

        let mut per_word_series: Vec<(String, BTreeMap<i32, u64>)> = Vec::new();
        let mut all_years: BTreeSet<i32> = BTreeSet::new();
        for word in &words {
            let series: BTreeMap<i32, u64> = yearly_series(store, word)?.into_iter().collect();
            all_years.extend(series.keys().copied());
            per_word_series.push((word.clone(), series));
        }

        let series = all_years
            .into_iter()
            .map(|year| {
                let per_word: BTreeMap<String, u64> = per_word_series
                    .iter()
                    .map(|(word, series)| {
                        (word.clone(), series.get(&year).copied().unwrap_or(0))
                    })
                    .collect();
                let total = per_word.values().sum();
                YearAccumulation { year, per_word, total }
            })
            .collect();

        result.push(AccumulatedGroup { label: group.label.clone(), series });
    }

    Ok(result)
}

/// Per-project totals for one word, descending by count, ties by name.
///
/// Derived from [`word_occurrences`], so publications without a resolvable
/// year are excluded here too.
pub fn project_breakdown(store: &dyn WordStore, word: &str) -> Result<Vec<(String, u64)>, String> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for occurrence in word_occurrences(store, word)? {
        *totals.entry(occurrence.project).or_insert(0) += occurrence.total_count;
    }

    let mut rows: Vec<(String, u64)> = totals.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(rows)
}

/// Derived project page link: `{base}/{year}/{mon}/{slug}/`.
///
/// None when the project start date is absent or unparseable.
pub fn project_link(base_url: &str, project: &str, start_date: Option<&str>) -> Option<String> {
    let date = start_date.and_then(parse_pub_date)?;
    let month = date.format("%b").to_string().to_lowercase();
    Some(format!(
        "{}/{}/{}/{}/",
        base_url.trim_end_matches('/'),
        date.year(),
        month,
        slugify(project)
    ))
}

/// Parse the comparison-input syntax: words separated by `;`, groups
/// separated by `;;`. Group labels list the words, as in the original UI.
pub fn parse_word_groups(input: &str) -> Vec<WordGroup> {
    input
        .to_lowercase()
        .split(";;")
        .filter_map(|group| {
            let words: Vec<String> = group
                .split(';')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
            if words.is_empty() {
                return None;
            }
            Some(words)
        })
        .enumerate()
        .map(|(index, words)| WordGroup {
            label: format!("Group {} ({})", index + 1, words.join(", ")),
            words,
        })
        .collect()
}
