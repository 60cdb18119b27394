//! pubwords CLI - query surface over the word-count store.
//!
//! Runs the same queries against the local SQLite store or, with --remote,
//! against a served word-count store. Supports JSON output for scripting.
//! All display formatting lives here; the library returns plain data.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pubwords::aggregate;
use pubwords::db::Database;
use pubwords::http_server;
use pubwords::remote::RemoteStore;
use pubwords::store::WordStore;

#[derive(Parser)]
#[command(name = "pubwords", version, about = "Publication word-frequency analysis")]
struct Cli {
    /// SQLite database path (defaults to the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Base URL of a served word-count store to query instead of a local db
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Corpus summary: totals and publication time frame
    Stats,
    /// Per-publication occurrences of one word
    Word { word: String },
    /// Yearly totals for one word
    Series { word: String },
    /// Accumulated series for word groups: ';' between words, ';;' between groups
    Accumulate { groups: String },
    /// Per-project totals for one word
    Projects {
        word: String,
        /// Derive project page links under this base URL
        #[arg(long)]
        link_base: Option<String>,
    },
    /// Write every stored word-count record to a CSV file
    Export {
        #[arg(default_value = "word_counts.csv")]
        path: PathBuf,
    },
    /// Serve the local store over HTTP for remote dashboards
    Serve {
        #[arg(long, default_value_t = 9876)]
        port: u16,
    },
    /// Delete all stored word counts and metadata
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("pubwords"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("word_counts.db")
}

fn open_database(path: Option<&Path>) -> Result<Database, String> {
    let path = path.map(PathBuf::from).unwrap_or_else(default_db_path);
    Database::new(&path).map_err(|e| format!("Failed to open database {:?}: {}", path, e))
}

fn open_store(db: Option<&Path>, remote: Option<&str>) -> Result<Box<dyn WordStore>, String> {
    match remote {
        Some(base_url) => Ok(Box::new(RemoteStore::new(base_url)?)),
        None => Ok(Box::new(open_database(db)?)),
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let Cli { db, remote, json, command } = cli;

    match command {
        Commands::Serve { port } => {
            if remote.is_some() {
                return Err("serve runs on a local database, not --remote".to_string());
            }
            let db = Arc::new(open_database(db.as_deref())?);
            http_server::serve(db, port)
        }
        Commands::Export { path } => {
            if remote.is_some() {
                return Err("export runs on a local database, not --remote".to_string());
            }
            let db = open_database(db.as_deref())?;
            let records = db
                .all_word_counts()
                .map_err(|e| format!("Export query failed: {}", e))?;
            pubwords::export::write_csv(&path, &records)?;
            println!("Wrote {} records to {:?}", records.len(), path);
            Ok(())
        }
        Commands::Reset { yes } => {
            if remote.is_some() {
                return Err("reset runs on a local database, not --remote".to_string());
            }
            if !yes {
                return Err("refusing to wipe the store without --yes".to_string());
            }
            let db = open_database(db.as_deref())?;
            db.reset().map_err(|e| format!("Reset failed: {}", e))?;
            println!("Store reset.");
            Ok(())
        }
        Commands::Stats => {
            let store = open_store(db.as_deref(), remote.as_deref())?;
            cmd_stats(store.as_ref(), json)
        }
        Commands::Word { word } => {
            let store = open_store(db.as_deref(), remote.as_deref())?;
            cmd_word(store.as_ref(), &word, json)
        }
        Commands::Series { word } => {
            let store = open_store(db.as_deref(), remote.as_deref())?;
            cmd_series(store.as_ref(), &word, json)
        }
        Commands::Accumulate { groups } => {
            let store = open_store(db.as_deref(), remote.as_deref())?;
            cmd_accumulate(store.as_ref(), &groups, json)
        }
        Commands::Projects { word, link_base } => {
            let store = open_store(db.as_deref(), remote.as_deref())?;
            cmd_projects(store.as_ref(), &word, link_base.as_deref(), json)
        }
    }
}

fn cmd_stats(store: &dyn WordStore, json: bool) -> Result<(), String> {
    let stats = aggregate::global_stats(store)?;

    if json {
        println!("{}", to_json(&stats)?);
        return Ok(());
    }

    println!("Total publications: {}", stats.total_publications);
    println!("Total projects:     {}", stats.total_projects);
    println!("Total words:        {}", stats.total_words);
    match stats.date_range {
        Some((min, max)) => {
            println!("Time frame:         {} to {}", format_date(min), format_date(max));
        }
        None => println!("Time frame:         no parseable publication dates"),
    }
    Ok(())
}

fn cmd_word(store: &dyn WordStore, word: &str, json: bool) -> Result<(), String> {
    let occurrences = aggregate::word_occurrences(store, word)?;

    if json {
        println!("{}", to_json(&occurrences)?);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("No occurrences of '{}' found.", word.trim().to_lowercase());
        return Ok(());
    }

    println!("Occurrences of '{}':", word.trim().to_lowercase());
    for occurrence in &occurrences {
        println!(
            "  {:>6}  {} ({}, {})",
            occurrence.total_count,
            occurrence.publication,
            occurrence.project,
            format_date(occurrence.date)
        );
        println!("          {}", occurrence.source_url);
    }
    Ok(())
}

fn cmd_series(store: &dyn WordStore, word: &str, json: bool) -> Result<(), String> {
    let series = aggregate::yearly_series(store, word)?;

    if json {
        println!("{}", to_json(&series)?);
        return Ok(());
    }

    if series.is_empty() {
        println!("No occurrences of '{}' found.", word.trim().to_lowercase());
        return Ok(());
    }

    for (year, total) in series {
        println!("  {}  {}", year, total);
    }
    Ok(())
}

fn cmd_accumulate(store: &dyn WordStore, groups: &str, json: bool) -> Result<(), String> {
    let groups = aggregate::parse_word_groups(groups);
    if groups.is_empty() {
        return Err("no word groups given; use ';' between words and ';;' between groups".to_string());
    }

    let accumulated = aggregate::accumulated_series(store, &groups)?;

    if json {
        println!("{}", to_json(&accumulated)?);
        return Ok(());
    }

    for group in &accumulated {
        println!("{}", group.label);
        if group.series.is_empty() {
            println!("  no occurrences");
            continue;
        }
        for year in &group.series {
            let breakdown: Vec<String> = year
                .per_word
                .iter()
                .map(|(word, count)| format!("{}={}", word, count))
                .collect();
            println!("  {}  {:>6}  ({})", year.year, year.total, breakdown.join(", "));
        }
    }
    Ok(())
}

fn cmd_projects(
    store: &dyn WordStore,
    word: &str,
    link_base: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let breakdown = aggregate::project_breakdown(store, word)?;

    // Project start dates feed the derived links; first metadata row per
    // project wins, as in the source's drop_duplicates.
    let mut start_dates = std::collections::HashMap::new();
    if link_base.is_some() {
        for meta in store.query_metadata()? {
            start_dates.entry(meta.project).or_insert(meta.project_start_date);
        }
    }
    let link_for = |project: &str| -> Option<String> {
        let base = link_base?;
        let start = start_dates.get(project)?.as_deref();
        aggregate::project_link(base, project, start)
    };

    if json {
        let rows: Vec<serde_json::Value> = breakdown
            .iter()
            .map(|(project, total)| {
                serde_json::json!({
                    "project": project,
                    "totalCount": total,
                    "link": link_for(project),
                })
            })
            .collect();
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    if breakdown.is_empty() {
        println!("No occurrences of '{}' found.", word.trim().to_lowercase());
        return Ok(());
    }

    for (project, total) in &breakdown {
        match link_for(project) {
            Some(link) => println!("  {:>6}  {}  {}", total, project, link),
            None => println!("  {:>6}  {}", total, project),
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON encoding failed: {}", e))
}
