use rusqlite::{params, Connection, Result};
use std::path::Path;
use std::sync::Mutex;

use super::models::{PublicationCount, PublicationMeta, StoreTotals, WordCountRecord};

pub struct Database {
    conn: Mutex<Connection>,
    path: String,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn = Connection::open(&path)?;
        let db = Database { conn: Mutex::new(conn), path: path_str };
        db.init()?;
        Ok(db)
    }

    pub fn get_path(&self) -> String {
        self.path.clone()
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn: Mutex::new(conn), path: ":memory:".to_string() };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS word_counts (
                publication TEXT NOT NULL,
                date TEXT,
                project TEXT NOT NULL,
                word TEXT NOT NULL,
                count INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_word_counts_word ON word_counts(word);
            CREATE INDEX IF NOT EXISTS idx_word_counts_publication ON word_counts(publication);

            -- Manifest metadata, upserted at ingest time. May contain
            -- publications with no word-count rows (failed fetches).
            CREATE TABLE IF NOT EXISTS publications (
                title TEXT NOT NULL,
                date TEXT,
                project TEXT NOT NULL,
                source_url TEXT NOT NULL,
                project_start_date TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_publications_title ON publications(title);
            ",
        )?;

        Ok(())
    }

    /// Idempotency gate: has this (title, date) pair already produced
    /// word-count rows? Checked before any network or extraction work.
    pub fn has_publication(&self, title: &str, date: Option<&str>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT 1 FROM word_counts WHERE publication = ?1 AND date IS ?2 LIMIT 1",
        )?;
        let mut rows = stmt.query(params![title, date])?;
        Ok(rows.next()?.is_some())
    }

    /// Insert one publication's word counts as a single transaction.
    ///
    /// The existence check runs inside the same transaction as the inserts,
    /// so a concurrent second writer cannot duplicate a (title, date) pair.
    /// Returns false without writing when the publication is already present
    /// or `records` is empty.
    pub fn insert_word_counts(&self, records: &[WordCountRecord]) -> Result<bool> {
        let first = match records.first() {
            Some(r) => r,
            None => return Ok(false),
        };

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let exists = {
            let mut stmt = tx.prepare(
                "SELECT 1 FROM word_counts WHERE publication = ?1 AND date IS ?2 LIMIT 1",
            )?;
            let mut rows = stmt.query(params![&first.publication, first.date.as_deref()])?;
            rows.next()?.is_some()
        };
        if exists {
            return Ok(false);
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO word_counts (publication, date, project, word, count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.publication,
                    record.date.as_deref(),
                    record.project,
                    record.word,
                    record.count as i64,
                ])?;
            }
        }

        tx.commit()?;
        Ok(true)
    }

    /// Record manifest metadata for a publication. Safe to call on every run;
    /// an existing (title, date) row is left untouched.
    pub fn upsert_publication(&self, meta: &PublicationMeta) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let exists = {
            let mut stmt = conn.prepare(
                "SELECT 1 FROM publications WHERE title = ?1 AND date IS ?2 LIMIT 1",
            )?;
            let mut rows = stmt.query(params![&meta.title, meta.date.as_deref()])?;
            rows.next()?.is_some()
        };
        if exists {
            return Ok(());
        }

        conn.execute(
            "INSERT INTO publications (title, date, project, source_url, project_start_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                meta.title,
                meta.date.as_deref(),
                meta.project,
                meta.source_url,
                meta.project_start_date.as_deref(),
            ],
        )?;
        Ok(())
    }

    /// Per-publication totals for one word (already lowercased by callers).
    pub fn word_publication_counts(&self, word: &str) -> Result<Vec<PublicationCount>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT publication, SUM(count) AS total_count
             FROM word_counts
             WHERE word = ?1
             GROUP BY publication
             ORDER BY publication",
        )?;

        let counts = stmt
            .query_map(params![word], |row| {
                Ok(PublicationCount {
                    publication: row.get(0)?,
                    total_count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Corpus totals from the word-count table. The date range is a separate
    /// concern computed over the metadata table by the aggregation layer.
    pub fn totals(&self) -> Result<StoreTotals> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(DISTINCT publication), COUNT(DISTINCT project), COALESCE(SUM(count), 0)
             FROM word_counts",
            [],
            |row| {
                Ok(StoreTotals {
                    total_publications: row.get::<_, i64>(0)? as u64,
                    total_projects: row.get::<_, i64>(1)? as u64,
                    total_words: row.get::<_, i64>(2)? as u64,
                })
            },
        )
    }

    pub fn publications(&self) -> Result<Vec<PublicationMeta>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT title, date, project, source_url, project_start_date
             FROM publications
             ORDER BY title",
        )?;

        let metas = stmt
            .query_map([], |row| {
                Ok(PublicationMeta {
                    title: row.get(0)?,
                    date: row.get(1)?,
                    project: row.get(2)?,
                    source_url: row.get(3)?,
                    project_start_date: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(metas)
    }

    /// All stored word-count rows, for the CSV export.
    pub fn all_word_counts(&self) -> Result<Vec<WordCountRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT publication, date, project, word, count
             FROM word_counts
             ORDER BY publication, word",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(WordCountRecord {
                    publication: row.get(0)?,
                    date: row.get(1)?,
                    project: row.get(2)?,
                    word: row.get(3)?,
                    count: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Full reset: the only delete path for word-count data.
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM word_counts", [])?;
        conn.execute("DELETE FROM publications", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(publication: &str, date: Option<&str>, project: &str, word: &str, count: u64) -> WordCountRecord {
        WordCountRecord {
            publication: publication.to_string(),
            date: date.map(|d| d.to_string()),
            project: project.to_string(),
            word: word.to_string(),
            count,
        }
    }

    #[test]
    fn test_insert_and_query_counts() {
        let db = Database::in_memory().unwrap();
        let inserted = db
            .insert_word_counts(&[
                record("Paper A", Some("2021-03-15"), "Proj", "alpha", 2),
                record("Paper A", Some("2021-03-15"), "Proj", "beta", 1),
            ])
            .unwrap();
        assert!(inserted);

        let counts = db.word_publication_counts("alpha").unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].publication, "Paper A");
        assert_eq!(counts[0].total_count, 2);
    }

    #[test]
    fn test_duplicate_publication_is_not_written_twice() {
        let db = Database::in_memory().unwrap();
        let records = vec![record("Paper A", Some("2021-03-15"), "Proj", "alpha", 2)];

        assert!(db.insert_word_counts(&records).unwrap());
        assert!(db.has_publication("Paper A", Some("2021-03-15")).unwrap());

        // Second ingestion of the same (title, date) writes nothing.
        assert!(!db.insert_word_counts(&records).unwrap());

        let totals = db.totals().unwrap();
        assert_eq!(totals.total_publications, 1);
        assert_eq!(totals.total_words, 2);
    }

    #[test]
    fn test_same_title_different_date_is_distinct() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .insert_word_counts(&[record("Paper A", Some("2020-01-01"), "Proj", "alpha", 1)])
            .unwrap());
        assert!(db
            .insert_word_counts(&[record("Paper A", Some("2021-01-01"), "Proj", "alpha", 1)])
            .unwrap());
        assert!(!db.has_publication("Paper A", Some("2022-01-01")).unwrap());
    }

    #[test]
    fn test_missing_date_gate() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .insert_word_counts(&[record("Paper A", None, "Proj", "alpha", 1)])
            .unwrap());
        assert!(db.has_publication("Paper A", None).unwrap());
        assert!(!db.insert_word_counts(&[record("Paper A", None, "Proj", "alpha", 1)]).unwrap());
    }

    #[test]
    fn test_empty_records_are_a_noop() {
        let db = Database::in_memory().unwrap();
        assert!(!db.insert_word_counts(&[]).unwrap());
        assert_eq!(db.totals().unwrap().total_words, 0);
    }

    #[test]
    fn test_totals_across_projects() {
        let db = Database::in_memory().unwrap();
        db.insert_word_counts(&[
            record("Paper A", Some("2020-01-01"), "Proj One", "alpha", 3),
            record("Paper A", Some("2020-01-01"), "Proj One", "beta", 1),
        ])
        .unwrap();
        db.insert_word_counts(&[record("Paper B", Some("2021-01-01"), "Proj Two", "alpha", 5)])
            .unwrap();

        let totals = db.totals().unwrap();
        assert_eq!(totals.total_publications, 2);
        assert_eq!(totals.total_projects, 2);
        assert_eq!(totals.total_words, 9);
    }

    #[test]
    fn test_upsert_publication_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let meta = PublicationMeta {
            title: "Paper A".to_string(),
            date: Some("2021-03-15".to_string()),
            project: "Proj".to_string(),
            source_url: "https://example.org/a.pdf".to_string(),
            project_start_date: None,
        };
        db.upsert_publication(&meta).unwrap();
        db.upsert_publication(&meta).unwrap();
        assert_eq!(db.publications().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let db = Database::in_memory().unwrap();
        db.insert_word_counts(&[record("Paper A", Some("2020-01-01"), "Proj", "alpha", 1)])
            .unwrap();
        db.upsert_publication(&PublicationMeta {
            title: "Paper A".to_string(),
            date: Some("2020-01-01".to_string()),
            project: "Proj".to_string(),
            source_url: "https://example.org/a.pdf".to_string(),
            project_start_date: None,
        })
        .unwrap();

        db.reset().unwrap();
        assert_eq!(db.totals().unwrap().total_publications, 0);
        assert!(db.publications().unwrap().is_empty());
        assert!(db.all_word_counts().unwrap().is_empty());
    }
}
