//! Database schema definitions and creation
//!
//! The client application opens the generated file with its own ORM, so
//! table and column names (including their casing and the leading
//! underscore on `_id`) must not change. Only `topic`, `video` and
//! `topicvideo` are populated here; the remaining tables are created empty
//! for the client to fill.

use crate::error::{DbError, DbResult};
use rusqlite::Connection;

/// Pragmas applied before any table is created
const BUILD_PRAGMAS: &str = r#"
PRAGMA legacy_file_format = true;
PRAGMA temp_store = MEMORY;
PRAGMA cache_size = -64000;
"#;

const CREATE_ANDROID_METADATA_TABLE: &str = "CREATE TABLE android_metadata (locale TEXT)";

const CREATE_TOPIC_TABLE: &str = "CREATE TABLE `topic` (`_id` VARCHAR , `child_kind` VARCHAR , `video_count` INTEGER NOT NULL DEFAULT 0, `downloaded_video_count` INTEGER NOT NULL DEFAULT 0, `standalone_title` VARCHAR , `title` VARCHAR , `description` VARCHAR , `ka_url` VARCHAR , `hide` VARCHAR , `parentTopic_id` VARCHAR , `ancestry` VARCHAR , `seq` INTEGER , `kind` VARCHAR , `thumb_id` VARCHAR , PRIMARY KEY (`_id`) )";

const CREATE_VIDEO_TABLE: &str = "CREATE TABLE `video` (`_id` INTEGER PRIMARY KEY AUTOINCREMENT , `readable_id` VARCHAR, `download_status` INTEGER NOT NULL DEFAULT 0, `keywords` VARCHAR , `progress_key` VARCHAR , `duration` INTEGER NOT NULL DEFAULT 0, `youtube_id` VARCHAR , `mp4url` VARCHAR , `pngurl` VARCHAR , `m3u8url` VARCHAR , `date_added` VARCHAR , `views` INTEGER NOT NULL DEFAULT 0, `title` VARCHAR , `description` VARCHAR , `ka_url` VARCHAR , `hide` VARCHAR , `parentTopic_id` VARCHAR , `ancestry` VARCHAR , `seq` INTEGER NOT NULL DEFAULT 0, `kind` VARCHAR, `dlm_id` INTEGER NOT NULL DEFAULT 0, UNIQUE (`readable_id`) ON CONFLICT IGNORE )";

const CREATE_TOPICVIDEO_TABLE: &str = "CREATE TABLE `topicvideo` (`_id` INTEGER PRIMARY KEY AUTOINCREMENT, `topic_id` VARCHAR, `video_id` VARCHAR, UNIQUE (`topic_id`, `video_id`) ON CONFLICT IGNORE )";

const CREATE_ENQUEUEDDOWNLOAD_TABLE: &str =
    "CREATE TABLE `enqueueddownload` (`youtubeId` VARCHAR , PRIMARY KEY (`youtubeId`) )";

const CREATE_USER_TABLE: &str = "CREATE TABLE `user` (`user_id` VARCHAR , `joined` VARCHAR , `nickname` VARCHAR , `token` VARCHAR , `prettified_user_email` VARCHAR , `secret` VARCHAR , `points` INTEGER NOT NULL DEFAULT 0, `total_seconds_watched` INTEGER NOT NULL DEFAULT 0, `isSignedIn` SMALLINT , `kind` VARCHAR , PRIMARY KEY (`nickname`) )";

const CREATE_USERVIDEO_TABLE: &str = "CREATE TABLE `uservideo` (`id` INTEGER PRIMARY KEY AUTOINCREMENT , `user_id` VARCHAR , `video_id` VARCHAR , `completed` SMALLINT , `duration` INTEGER NOT NULL DEFAULT 0, `last_second_watched` INTEGER NOT NULL DEFAULT 0, `last_watched` VARCHAR , `points` INTEGER NOT NULL DEFAULT 0, `seconds_watched` INTEGER NOT NULL DEFAULT 0, `kind` VARCHAR )";

const CREATE_CAPTION_TABLE: &str = "CREATE TABLE `caption` (`_id` INTEGER PRIMARY KEY AUTOINCREMENT , `youtube_id` VARCHAR, `start_time` INTEGER, `end_time` INTEGER, `time_string` VARCHAR, `sub_order` REAL, `text` VARCHAR )";

const CREATE_THUMBNAIL_TABLE: &str = "CREATE TABLE `thumbnail` (`_id` INTEGER PRIMARY KEY AUTOINCREMENT , `youtube_id` VARCHAR, `q` INTEGER, `availability` INTEGER, `data` BLOB )";

/// Table DDL in creation order
const CREATE_TABLES: &[&str] = &[
    CREATE_ANDROID_METADATA_TABLE,
    CREATE_TOPIC_TABLE,
    CREATE_VIDEO_TABLE,
    CREATE_TOPICVIDEO_TABLE,
    CREATE_ENQUEUEDDOWNLOAD_TABLE,
    CREATE_USER_TABLE,
    CREATE_USERVIDEO_TABLE,
    CREATE_CAPTION_TABLE,
    CREATE_THUMBNAIL_TABLE,
];

/// SQL to create indexes used by the client's caption and thumbnail lookups
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS `caption_youtube_id_idx` on `caption` ( `youtube_id` )",
    "CREATE INDEX IF NOT EXISTS `thumbnail_youtube_id_idx` on `thumbnail` ( `youtube_id` )",
    "CREATE INDEX IF NOT EXISTS `thumbnail_q_idx` on `thumbnail` ( `q` )",
];

/// Table names
pub mod tables {
    pub const ANDROID_METADATA: &str = "android_metadata";
    pub const TOPIC: &str = "topic";
    pub const VIDEO: &str = "video";
    pub const TOPICVIDEO: &str = "topicvideo";
    pub const ENQUEUEDDOWNLOAD: &str = "enqueueddownload";
    pub const USER: &str = "user";
    pub const USERVIDEO: &str = "uservideo";
    pub const CAPTION: &str = "caption";
    pub const THUMBNAIL: &str = "thumbnail";

    /// Every table the schema creates
    pub const ALL: &[&str] = &[
        ANDROID_METADATA,
        TOPIC,
        VIDEO,
        TOPICVIDEO,
        ENQUEUEDDOWNLOAD,
        USER,
        USERVIDEO,
        CAPTION,
        THUMBNAIL,
    ];

    pub fn is_known(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// Create the full schema on a fresh connection
///
/// Fails if any table already exists; callers start from an empty file.
pub fn create_database(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(BUILD_PRAGMAS)?;

    for sql in CREATE_TABLES {
        conn.execute(sql, [])?;
    }

    for sql in CREATE_INDEXES {
        conn.execute(sql, [])?;
    }

    Ok(())
}

/// Verify that every expected table is present
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for table in tables::ALL {
        if !existing.iter().any(|name| name == table) {
            return Err(DbError::Schema(format!("missing table '{}'", table)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_create_database() {
        let conn = Connection::open_in_memory().unwrap();
        create_database(&conn).unwrap();
        verify_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name LIKE '%_idx'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_create_twice_fails() {
        let conn = Connection::open_in_memory().unwrap();
        create_database(&conn).unwrap();
        assert!(create_database(&conn).is_err());
    }

    #[test]
    fn test_verify_schema_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(CREATE_TOPIC_TABLE, []).unwrap();

        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, DbError::Schema(ref msg) if msg.contains("android_metadata")));
    }

    #[test]
    fn test_column_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        create_database(&conn).unwrap();

        conn.execute("INSERT INTO video (readable_id) VALUES ('v')", [])
            .unwrap();
        let (status, duration, views, seq): (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT download_status, duration, views, seq FROM video",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!((status, duration, views, seq), (0, 0, 0, 0));
    }

    #[test]
    fn test_table_names_match_schema() {
        assert_eq!(tables::ALL.len(), CREATE_TABLES.len());
        for (name, ddl) in tables::ALL.iter().zip(CREATE_TABLES) {
            assert!(ddl.contains(name), "{} not created by {}", name, ddl);
        }
        assert!(tables::is_known("topicvideo"));
        assert!(!tables::is_known("entries"));
    }
}
