//! Publication manifest loading.
//!
//! The manifest is a JSON array keyed by the original spreadsheet column
//! names. A row missing its title, project, or file URL is malformed: it is
//! skipped with a warning rather than ingested with fabricated defaults. A
//! missing date is tolerated; the row ingests but is excluded from
//! date-dependent aggregation.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::db::PublicationMeta;

/// One validated manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub title: String,
    /// Raw date text; None when the column was absent or blank.
    pub date: Option<String>,
    pub project: String,
    pub source_url: String,
    /// Used only for derived project links.
    pub project_start_date: Option<String>,
}

impl ManifestEntry {
    pub fn meta(&self) -> PublicationMeta {
        PublicationMeta {
            title: self.title.clone(),
            date: self.date.clone(),
            project: self.project.clone(),
            source_url: self.source_url.clone(),
            project_start_date: self.project_start_date.clone(),
        }
    }
}

/// Result of a manifest load: the usable entries plus one warning per
/// malformed row.
#[derive(Debug)]
pub struct ManifestLoad {
    pub entries: Vec<ManifestEntry>,
    pub warnings: Vec<String>,
}

/// Raw row as it appears in the file; every field optional so one bad row
/// cannot fail the whole load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Publication Title", default)]
    title: Option<String>,
    #[serde(rename = "Publication Date", default)]
    date: Option<String>,
    #[serde(rename = "Project Name", default)]
    project: Option<String>,
    #[serde(rename = "Publication File", default)]
    source_url: Option<String>,
    #[serde(rename = "Project Start Date", default)]
    project_start_date: Option<String>,
}

pub fn load_manifest(path: &Path) -> Result<ManifestLoad, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?;
    parse_manifest(&content)
}

pub fn parse_manifest(json: &str) -> Result<ManifestLoad, String> {
    let rows: Vec<RawRow> =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse manifest JSON: {}", e))?;

    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        match validate_row(row) {
            Ok(entry) => entries.push(entry),
            Err(reason) => warnings.push(format!("Manifest row {}: {}", index + 1, reason)),
        }
    }

    Ok(ManifestLoad { entries, warnings })
}

fn validate_row(row: RawRow) -> Result<ManifestEntry, String> {
    let title = required(row.title, "Publication Title")?;
    let project = required(row.project, "Project Name")?;
    let source_url = required(row.source_url, "Publication File")?;

    Ok(ManifestEntry {
        title,
        date: non_blank(row.date),
        project,
        source_url,
        project_start_date: non_blank(row.project_start_date),
    })
}

fn required(value: Option<String>, column: &str) -> Result<String, String> {
    match non_blank(value) {
        Some(v) => Ok(v),
        None => Err(format!("missing {}", column)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_row() {
        let loaded = parse_manifest(
            r#"[{
                "Publication Title": "Microplastic Uptake in Cell Models",
                "Publication Date": "15.03.2021",
                "Project Name": "PlastiCell",
                "Publication File": "https://example.org/papers/uptake.pdf",
                "Project Start Date": "2019-01-01"
            }]"#,
        )
        .unwrap();

        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.entries.len(), 1);
        let entry = &loaded.entries[0];
        assert_eq!(entry.title, "Microplastic Uptake in Cell Models");
        assert_eq!(entry.date.as_deref(), Some("15.03.2021"));
        assert_eq!(entry.project, "PlastiCell");
        assert_eq!(entry.project_start_date.as_deref(), Some("2019-01-01"));
    }

    #[test]
    fn test_missing_date_is_tolerated() {
        let loaded = parse_manifest(
            r#"[{
                "Publication Title": "Undated Report",
                "Project Name": "PlastiCell",
                "Publication File": "https://example.org/report.pdf"
            }]"#,
        )
        .unwrap();

        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.entries[0].date, None);
    }

    #[test]
    fn test_malformed_row_is_skipped_with_warning() {
        let loaded = parse_manifest(
            r#"[
                {"Publication Title": "Good", "Project Name": "P", "Publication File": "https://example.org/a.pdf"},
                {"Publication Title": "  ", "Project Name": "P", "Publication File": "https://example.org/b.pdf"},
                {"Publication Title": "No URL", "Project Name": "P"}
            ]"#,
        )
        .unwrap();

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].title, "Good");
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded.warnings[0].contains("row 2"));
        assert!(loaded.warnings[0].contains("Publication Title"));
        assert!(loaded.warnings[1].contains("row 3"));
        assert!(loaded.warnings[1].contains("Publication File"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_manifest("not json").is_err());
    }
}
