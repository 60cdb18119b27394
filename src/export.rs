//! CSV export of word-count records.
//!
//! Flat file with the `Publication,Date,Project,Word,Count` header, one row
//! per record, overwritten on each batch run.

use std::fs;
use std::path::Path;

use crate::db::WordCountRecord;

pub fn write_csv(path: &Path, records: &[WordCountRecord]) -> Result<(), String> {
    fs::write(path, render_csv(records))
        .map_err(|e| format!("Failed to write CSV {}: {}", path.display(), e))
}

fn render_csv(records: &[WordCountRecord]) -> String {
    let mut out = String::from("Publication,Date,Project,Word,Count\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&record.publication),
            csv_field(record.date.as_deref().unwrap_or("")),
            csv_field(&record.project),
            csv_field(&record.word),
            record.count
        ));
    }
    out
}

/// Quote a field when it contains a comma, quote, or line break; embedded
/// quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(publication: &str, date: Option<&str>, word: &str, count: u64) -> WordCountRecord {
        WordCountRecord {
            publication: publication.to_string(),
            date: date.map(|d| d.to_string()),
            project: "Proj".to_string(),
            word: word.to_string(),
            count,
        }
    }

    #[test]
    fn test_render_header_and_rows() {
        let csv = render_csv(&[
            record("Paper A", Some("2021-03-15"), "alpha", 2),
            record("Paper A", Some("2021-03-15"), "beta", 1),
        ]);
        assert_eq!(
            csv,
            "Publication,Date,Project,Word,Count\n\
             Paper A,2021-03-15,Proj,alpha,2\n\
             Paper A,2021-03-15,Proj,beta,1\n"
        );
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_quoted() {
        let csv = render_csv(&[record("Plastics, \"micro\" and nano", None, "alpha", 1)]);
        assert!(csv.contains("\"Plastics, \"\"micro\"\" and nano\",,Proj,alpha,1"));
    }

    #[test]
    fn test_write_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("word_counts.csv");
        write_csv(&path, &[record("Paper A", Some("2021-03-15"), "alpha", 2)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Publication,Date,Project,Word,Count\n"));
        assert!(content.contains("Paper A,2021-03-15,Proj,alpha,2"));
    }
}
