//! Read rows back from a built database
//!
//! Rows come back in insertion order. Columns with a NOT NULL DEFAULT come
//! back as their default when the row never set them (`duration`, `views`
//! and `download_status` read as `Some(0)`); nullable columns come back as
//! `None`.

use crate::db::schema::tables;
use crate::error::{DbError, DbResult};
use crate::tree::{NodeKind, Topic, TopicVideoLink, Video};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

const SELECT_TOPICS: &str = "SELECT `_id`, `child_kind`, `video_count`, `downloaded_video_count`, \
     `standalone_title`, `title`, `description`, `ka_url`, `hide`, `parentTopic_id`, `ancestry`, \
     `seq`, `thumb_id` FROM `topic` ORDER BY rowid";

const SELECT_VIDEOS: &str = "SELECT `readable_id`, `download_status`, `keywords`, `progress_key`, \
     `duration`, `youtube_id`, `mp4url`, `pngurl`, `m3u8url`, `date_added`, `views`, `title`, \
     `description`, `ka_url`, `hide`, `parentTopic_id`, `ancestry`, `seq` FROM `video` ORDER BY `_id`";

const SELECT_LINKS: &str = "SELECT `topic_id`, `video_id` FROM `topicvideo` ORDER BY `_id`";

pub fn load_topics(conn: &Connection) -> DbResult<Vec<Topic>> {
    let mut stmt = conn.prepare(SELECT_TOPICS)?;
    let rows = stmt.query_map([], |row| {
        Ok(Topic {
            id: row.get(0)?,
            child_kind: row
                .get::<_, Option<String>>(1)?
                .as_deref()
                .and_then(NodeKind::parse),
            video_count: row.get(2)?,
            downloaded_video_count: row.get(3)?,
            standalone_title: row.get(4)?,
            title: row.get(5)?,
            description: row.get(6)?,
            ka_url: row.get(7)?,
            hide: read_flag(row, 8)?,
            parent_topic_id: row.get(9)?,
            ancestry: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            seq: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
            thumb_id: row.get(12)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn load_videos(conn: &Connection) -> DbResult<Vec<Video>> {
    let mut stmt = conn.prepare(SELECT_VIDEOS)?;
    let rows = stmt.query_map([], |row| {
        Ok(Video {
            readable_id: row.get(0)?,
            download_status: row.get(1)?,
            keywords: row.get(2)?,
            progress_key: row.get(3)?,
            duration: row.get(4)?,
            youtube_id: row.get(5)?,
            mp4url: row.get(6)?,
            pngurl: row.get(7)?,
            m3u8url: row.get(8)?,
            date_added: row.get(9)?,
            views: row.get(10)?,
            title: row.get(11)?,
            description: row.get(12)?,
            ka_url: row.get(13)?,
            hide: read_flag(row, 14)?,
            parent_topic_id: row.get(15)?,
            ancestry: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
            seq: row.get(17)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn load_links(conn: &Connection) -> DbResult<Vec<TopicVideoLink>> {
    let mut stmt = conn.prepare(SELECT_LINKS)?;
    let rows = stmt.query_map([], |row| {
        Ok(TopicVideoLink {
            topic_id: row.get(0)?,
            video_id: row.get(1)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Row count of one schema table
pub fn table_count(conn: &Connection, table: &str) -> DbResult<i64> {
    if !tables::is_known(table) {
        return Err(DbError::Schema(format!("unknown table '{}'", table)));
    }
    let sql = format!("SELECT COUNT(*) FROM `{}`", table);
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

/// `hide` is declared VARCHAR, so a stored 0/1 comes back as text
fn read_flag(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<bool>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => Some(i != 0),
        Value::Text(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::writer::{bulk_insert, TopicDbWriter};

    #[test]
    fn test_topic_round_trip() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();

        let topic = Topic {
            id: Some("math".into()),
            child_kind: Some(NodeKind::Topic),
            video_count: 12,
            title: Some("Math".into()),
            hide: Some(false),
            parent_topic_id: Some("root".into()),
            ancestry: "|root".into(),
            seq: 3,
            thumb_id: Some("abc".into()),
            ..Default::default()
        };
        bulk_insert(conn, std::slice::from_ref(&topic)).unwrap();

        assert_eq!(load_topics(conn).unwrap(), vec![topic]);
    }

    #[test]
    fn test_absent_columns_read_back_as_null_or_default() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();

        bulk_insert(
            conn,
            &[Video {
                readable_id: Some("bare".into()),
                ..Default::default()
            }],
        )
        .unwrap();

        let video = load_videos(conn).unwrap().pop().unwrap();
        assert_eq!(video.youtube_id, None);
        assert_eq!(video.mp4url, None);
        assert_eq!(video.hide, None);
        assert_eq!(video.duration, Some(0));
        assert_eq!(video.download_status, Some(0));

        let raw: Option<String> = conn
            .query_row("SELECT title FROM video", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, None);
    }

    #[test]
    fn test_table_count() {
        let writer = TopicDbWriter::in_memory().unwrap();
        let conn = writer.connection();
        assert_eq!(table_count(conn, "caption").unwrap(), 0);
        assert!(matches!(
            table_count(conn, "sqlite_master; DROP TABLE topic"),
            Err(DbError::Schema(_))
        ));
    }
}
