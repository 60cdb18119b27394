//! Batch ingestion runner.
//!
//! Walks a publication manifest sequentially: fetch PDF, extract text, count
//! words, store. Safe to re-run over a growing manifest; already-processed
//! publications are skipped before any network work.
//!
//! Usage: cargo run --bin batch_ingest -- --manifest publications.json

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use pubwords::db::{Database, WordCountRecord};
use pubwords::pipeline::{self, IngestOutcome};
use pubwords::stopwords::{self, StopwordSet};
use pubwords::{export, manifest};

#[derive(Parser)]
#[command(version, about = "Ingest publication PDFs into the word-count store")]
struct Args {
    /// Publication manifest (JSON array with the spreadsheet column names)
    #[arg(long)]
    manifest: PathBuf,

    /// Newline-delimited stopword list
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// SQLite database path (defaults to the platform data dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// CSV export of this run's records
    #[arg(long, default_value = "word_counts.csv")]
    csv: PathBuf,
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("pubwords"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("word_counts.db")
}

fn main() {
    let args = Args::parse();

    println!("==============================================");
    println!("  Publication Word-Count Ingest");
    println!("==============================================");
    println!();

    let db_path = args.db.unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).ok();
    }
    println!("[Ingest] Using database: {:?}", db_path);

    let db = match Database::new(&db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("[Ingest] ERROR: Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let loaded = match manifest::load_manifest(&args.manifest) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("[Ingest] ERROR: {}", e);
            std::process::exit(1);
        }
    };
    for warning in &loaded.warnings {
        eprintln!("[Ingest] WARNING: {}", warning);
    }

    let stopword_set = match &args.stopwords {
        Some(path) => match stopwords::load_stopwords(path) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("[Ingest] ERROR: {}", e);
                std::process::exit(1);
            }
        },
        None => StopwordSet::new(),
    };

    println!(
        "[Ingest] {} manifest entries, {} stopwords",
        loaded.entries.len(),
        stopword_set.len()
    );
    println!();

    // Metadata is recorded for every valid row up front: the dataset's date
    // range is derived from it even when a fetch later fails.
    for entry in &loaded.entries {
        if let Err(e) = db.upsert_publication(&entry.meta()) {
            eprintln!("[Ingest] ERROR: Failed to record metadata for '{}': {}", entry.title, e);
        }
    }

    let start_time = Instant::now();
    let mut stored_publications = 0usize;
    let mut run_records: Vec<WordCountRecord> = Vec::new();

    let report = pipeline::ingest(
        &loaded.entries,
        &stopword_set,
        |title, date| db.has_publication(title, date).unwrap_or(false),
        |current, total, entry| match &entry.outcome {
            IngestOutcome::Skipped => {
                println!(
                    "[Ingest] Skipping already processed paper {}/{}: {}",
                    current, total, entry.title
                );
            }
            IngestOutcome::Failed { reason } => {
                println!(
                    "[Ingest] Failed paper {}/{}: {}: {}",
                    current, total, entry.title, reason
                );
            }
            IngestOutcome::Ingested { records, top_word } => {
                println!(
                    "[Ingest] Processing paper {}/{}: {}",
                    current, total, entry.title
                );
                if let Some((word, count)) = top_word {
                    println!(
                        "  Most frequent word in '{}': '{}' (Count: {})",
                        entry.title, word, count
                    );
                }
                match db.insert_word_counts(records) {
                    Ok(true) => {
                        stored_publications += 1;
                        run_records.extend(records.iter().cloned());
                    }
                    Ok(false) => {}
                    Err(e) => {
                        eprintln!("[Ingest] ERROR: Failed to store '{}': {}", entry.title, e);
                    }
                }
            }
        },
    );

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[Ingest] ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = export::write_csv(&args.csv, &run_records) {
        eprintln!("[Ingest] ERROR: {}", e);
    } else {
        println!(
            "[Ingest] Wrote {} records to {:?}",
            run_records.len(),
            args.csv
        );
    }

    let elapsed = start_time.elapsed();
    println!("----------------------------------------------");
    println!(
        "[Ingest] DONE: {} ingested, {} skipped, {} failed ({:.1}s)",
        report.ingested(),
        report.skipped(),
        report.failed(),
        elapsed.as_secs_f64()
    );
    println!("[Ingest] {} publications stored this run", stored_publications);

    if report.failed() > 0 {
        println!("[Ingest] Failures:");
        for (i, (title, reason)) in report.failures().take(5).enumerate() {
            println!("  {}. {}: {}", i + 1, title, reason);
        }
        if report.failed() > 5 {
            println!("  ... and {} more", report.failed() - 5);
        }
    }
}
