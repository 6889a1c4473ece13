//! Bulk writer for the flattened tree
//!
//! All three tables are written inside one transaction that is committed at
//! the very end of [`TopicDbWriter::write_all`]. A run that dies before the
//! commit leaves a file with an empty schema, safe to delete and rebuild.
//!
//! Rows are written sparsely: each row's column list depends on which of
//! its fields are present, so statements are prepared through the
//! connection's statement cache keyed by SQL text.

use crate::db::row::{insert_sql, SqlRow};
use crate::db::schema;
use crate::error::{DbError, DbResult};
use crate::tree::FlattenedTree;
use rusqlite::{params_from_iter, Connection};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Distinct column sets seen per table stay well under this
const STATEMENT_CACHE_CAPACITY: usize = 128;

/// Outcome of one bulk insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReport {
    pub table: &'static str,
    pub attempted: usize,
    pub inserted: usize,
}

impl InsertReport {
    /// Rows dropped by ignore-on-conflict
    pub fn ignored(&self) -> usize {
        self.attempted.saturating_sub(self.inserted)
    }
}

/// Per-table reports for a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub topics: InsertReport,
    pub videos: InsertReport,
    pub links: InsertReport,
}

impl WriteReport {
    pub fn reports(&self) -> [&InsertReport; 3] {
        [&self.topics, &self.videos, &self.links]
    }
}

/// Insert every row, skipping absent fields and ignoring key conflicts
///
/// Accepts a plain connection or a transaction (which derefs to one).
pub fn bulk_insert<R: SqlRow>(conn: &Connection, rows: &[R]) -> DbResult<InsertReport> {
    let mut inserted = 0usize;

    for row in rows {
        let columns = row.columns();
        let sql = insert_sql(R::TABLE, &columns);
        let mut stmt = conn.prepare_cached(&sql)?;
        inserted += stmt.execute(params_from_iter(columns.into_iter().map(|(_, value)| value)))?;
    }

    let report = InsertReport {
        table: R::TABLE,
        attempted: rows.len(),
        inserted,
    };
    info!(
        table = report.table,
        inserted = report.inserted,
        attempted = report.attempted,
        "{} of {} inserted",
        report.inserted,
        report.attempted
    );

    Ok(report)
}

/// Remove a previous output file so the build starts from an empty database
///
/// A missing file is not an error. A stale rollback journal next to it is
/// removed as well, since SQLite would otherwise replay it into the new file.
/// Returns whether a database file was removed.
pub fn remove_existing(db_path: &Path) -> DbResult<bool> {
    let removed = remove_if_present(db_path)?;

    let mut journal = db_path.as_os_str().to_owned();
    journal.push("-journal");
    remove_if_present(Path::new(&journal))?;

    Ok(removed)
}

fn remove_if_present(path: &Path) -> DbResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed existing file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DbError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Owns the output connection for one rebuild
pub struct TopicDbWriter {
    conn: Connection,
}

impl TopicDbWriter {
    /// Open a new database file and create the schema
    ///
    /// The file must not already contain the schema; call
    /// [`remove_existing`] first.
    pub fn create(db_path: &Path) -> DbResult<Self> {
        let conn = Connection::open(db_path).map_err(|e| DbError::CreateFailed {
            path: db_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::init(conn)
    }

    /// In-memory database with the full schema
    pub fn in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        schema::create_database(&conn)?;
        conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
        Ok(Self { conn })
    }

    /// Insert topics, videos and links, then commit once
    pub fn write_all(&mut self, tree: &FlattenedTree) -> DbResult<WriteReport> {
        let tx = self.conn.transaction()?;

        info!("Inserting topics...");
        let topics = bulk_insert(&tx, &tree.topics)?;
        info!("Inserting videos...");
        let videos = bulk_insert(&tx, &tree.videos)?;
        info!("Inserting topicvideos...");
        let links = bulk_insert(&tx, &tree.links)?;

        tx.commit()?;
        debug!("Transaction committed");

        Ok(WriteReport {
            topics,
            videos,
            links,
        })
    }

    /// Borrow the connection, e.g. to read back what was written
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error from the final flush
    pub fn finish(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, e)| DbError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Topic, TopicVideoLink, Video};
    use tempfile::tempdir;

    fn topic(id: &str) -> Topic {
        Topic {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM `{}`", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_bulk_insert_ignores_duplicate_keys() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();

        let report = bulk_insert(conn, &[topic("a"), topic("b"), topic("a")]).unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.ignored(), 1);
        assert_eq!(count(conn, "topic"), 2);
    }

    #[test]
    fn test_duplicate_videos_and_links_ignored() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();

        let video = Video {
            readable_id: Some("v".into()),
            ..Default::default()
        };
        let report = bulk_insert(conn, &[video.clone(), video]).unwrap();
        assert_eq!(report.inserted, 1);

        let link = TopicVideoLink {
            topic_id: Some("t".into()),
            video_id: Some("v".into()),
        };
        let report = bulk_insert(conn, &[link.clone(), link]).unwrap();
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_write_all_commits_every_table() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("out.sqlite3");

        let tree = FlattenedTree {
            topics: vec![topic("root")],
            videos: vec![Video {
                readable_id: Some("v1".into()),
                ancestry: "|root".into(),
                ..Default::default()
            }],
            links: vec![TopicVideoLink {
                topic_id: Some("root".into()),
                video_id: Some("v1".into()),
            }],
            ..Default::default()
        };

        let mut writer = TopicDbWriter::create(&db_path).unwrap();
        let report = writer.write_all(&tree).unwrap();
        assert_eq!(report.topics.inserted, 1);
        assert_eq!(report.videos.inserted, 1);
        assert_eq!(report.links.inserted, 1);
        writer.finish().unwrap();

        let conn = Connection::open(&db_path).unwrap();
        assert_eq!(count(&conn, "topic"), 1);
        assert_eq!(count(&conn, "video"), 1);
        assert_eq!(count(&conn, "topicvideo"), 1);
    }

    #[test]
    fn test_uncommitted_rows_are_discarded() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();
        {
            let tx = conn.unchecked_transaction().unwrap();
            bulk_insert(&tx, &[topic("lost")]).unwrap();
            // dropped without commit
        }
        assert_eq!(count(conn, "topic"), 0);
    }

    #[test]
    fn test_remove_existing() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("out.sqlite3");

        assert!(!remove_existing(&db_path).unwrap());

        std::fs::write(&db_path, b"stale").unwrap();
        std::fs::write(dir.path().join("out.sqlite3-journal"), b"stale").unwrap();
        assert!(remove_existing(&db_path).unwrap());
        assert!(!db_path.exists());
        assert!(!dir.path().join("out.sqlite3-journal").exists());
    }

    #[test]
    fn test_remove_existing_fails_on_directory() {
        let dir = tempdir().unwrap();
        let err = remove_existing(dir.path()).unwrap_err();
        assert!(matches!(err, DbError::RemoveFailed { .. }));
    }
}
