//! Projection of row structs onto table columns
//!
//! A row only lists the columns it has a value for. Absent fields never
//! reach SQL, so the column keeps its schema default (NULL or 0) instead of
//! a placeholder.

use crate::db::schema::tables;
use crate::tree::{Topic, TopicVideoLink, Video};
use rusqlite::types::Value;

/// A struct that can be inserted into one table
pub trait SqlRow {
    /// Target table
    const TABLE: &'static str;

    /// Present fields as `(column, value)` pairs, in schema order
    fn columns(&self) -> Vec<(&'static str, Value)>;
}

/// Builder that drops `None` fields
#[derive(Debug, Default)]
pub struct Columns(Vec<(&'static str, Value)>);

impl Columns {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn text(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            self.0.push((column, Value::Text(v.to_string())));
        }
        self
    }

    pub fn int(mut self, column: &'static str, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.0.push((column, Value::Integer(v)));
        }
        self
    }

    /// Booleans are stored as 0/1
    pub fn flag(mut self, column: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.0.push((column, Value::from(v)));
        }
        self
    }

    pub fn into_vec(self) -> Vec<(&'static str, Value)> {
        self.0
    }
}

impl SqlRow for Topic {
    const TABLE: &'static str = tables::TOPIC;

    fn columns(&self) -> Vec<(&'static str, Value)> {
        Columns::with_capacity(14)
            .text("_id", self.id.as_deref())
            .text("child_kind", self.child_kind.map(|k| k.as_str()))
            .int("video_count", Some(self.video_count))
            .int("downloaded_video_count", Some(self.downloaded_video_count))
            .text("standalone_title", self.standalone_title.as_deref())
            .text("title", self.title.as_deref())
            .text("description", self.description.as_deref())
            .text("ka_url", self.ka_url.as_deref())
            .flag("hide", self.hide)
            .text("parentTopic_id", self.parent_topic_id.as_deref())
            .text("ancestry", Some(self.ancestry.as_str()))
            .int("seq", Some(self.seq))
            .text("kind", Some(self.kind().as_str()))
            .text("thumb_id", self.thumb_id.as_deref())
            .into_vec()
    }
}

impl SqlRow for Video {
    const TABLE: &'static str = tables::VIDEO;

    fn columns(&self) -> Vec<(&'static str, Value)> {
        Columns::with_capacity(19)
            .text("readable_id", self.readable_id.as_deref())
            .int("download_status", self.download_status)
            .text("keywords", self.keywords.as_deref())
            .text("progress_key", self.progress_key.as_deref())
            .int("duration", self.duration)
            .text("youtube_id", self.youtube_id.as_deref())
            .text("mp4url", self.mp4url.as_deref())
            .text("pngurl", self.pngurl.as_deref())
            .text("m3u8url", self.m3u8url.as_deref())
            .text("date_added", self.date_added.as_deref())
            .int("views", self.views)
            .text("title", self.title.as_deref())
            .text("description", self.description.as_deref())
            .text("ka_url", self.ka_url.as_deref())
            .flag("hide", self.hide)
            .text("parentTopic_id", self.parent_topic_id.as_deref())
            .text("ancestry", Some(self.ancestry.as_str()))
            .int("seq", Some(self.seq))
            .text("kind", Some(self.kind().as_str()))
            .into_vec()
    }
}

impl SqlRow for TopicVideoLink {
    const TABLE: &'static str = tables::TOPICVIDEO;

    fn columns(&self) -> Vec<(&'static str, Value)> {
        Columns::with_capacity(2)
            .text("topic_id", self.topic_id.as_deref())
            .text("video_id", self.video_id.as_deref())
            .into_vec()
    }
}

/// Build the INSERT statement for one column set
///
/// Every table is written with `OR IGNORE`, so a row that collides with an
/// existing key is dropped rather than failing the run.
pub fn insert_sql(table: &str, columns: &[(&'static str, Value)]) -> String {
    if columns.is_empty() {
        return format!("INSERT OR IGNORE INTO `{}` DEFAULT VALUES", table);
    }

    let names: Vec<String> = columns.iter().map(|(name, _)| format!("`{}`", name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

    format!(
        "INSERT OR IGNORE INTO `{}` ({}) VALUES ({})",
        table,
        names.join(", "),
        placeholders.join(", ")
    )
}
