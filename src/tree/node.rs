//! Input node types for the topic tree
//!
//! The source document is loosely typed: every node is a JSON object with a
//! `kind` tag, and any field may be missing or carry an unexpected type.
//! Nodes are decoded permissively into [`TopicNode`]; a field with the wrong
//! JSON type is treated the same as a missing one.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Kind tag of a topic node
pub const KIND_TOPIC: &str = "Topic";

/// Kind tag of a video node
pub const KIND_VIDEO: &str = "Video";

/// The two node kinds the flattener understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Topic,
    Video,
}

impl NodeKind {
    /// Parse a kind tag, returning `None` for anything unrecognised
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            KIND_TOPIC => Some(NodeKind::Topic),
            KIND_VIDEO => Some(NodeKind::Video),
            _ => None,
        }
    }

    /// Tag as stored in the `kind` and `child_kind` columns
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Topic => KIND_TOPIC,
            NodeKind::Video => KIND_VIDEO,
        }
    }
}

/// Fields shared by topics and videos
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCommon {
    pub id: Option<String>,
    pub title: Option<String>,
    pub standalone_title: Option<String>,
    pub description: Option<String>,
    pub ka_url: Option<String>,
    pub hide: Option<bool>,

    /// Placement carried by the document itself. Only honoured on the root;
    /// the flattener overwrites it for every child.
    pub parent_topic_id: Option<String>,
    pub ancestry: Option<String>,
    pub seq: Option<i64>,
}

/// A topic node and its ordered children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicData {
    pub common: NodeCommon,
    pub children: Vec<TopicNode>,
}

/// Media URLs published under `download_urls`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadUrls {
    pub mp4: Option<String>,
    pub png: Option<String>,
    pub m3u8: Option<String>,
}

/// A video node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoData {
    pub common: NodeCommon,
    pub readable_id: Option<String>,
    pub youtube_id: Option<String>,
    pub duration: Option<i64>,
    pub keywords: Option<String>,
    pub progress_key: Option<String>,
    pub date_added: Option<String>,
    pub views: Option<i64>,
    pub download_status: Option<i64>,
    pub download_urls: Option<DownloadUrls>,
}

/// A node of the topic tree
#[derive(Debug, Clone, PartialEq)]
pub enum TopicNode {
    Topic(TopicData),
    Video(VideoData),

    /// Any other kind, a missing kind, or a value that is not an object
    Unknown {
        kind: Option<String>,
        id: Option<String>,
    },
}

impl TopicNode {
    /// Decode a node (and, for topics, its whole subtree) from JSON
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return TopicNode::Unknown { kind: None, id: None };
        };

        let kind = take_string(&mut map, "kind");
        match kind.as_deref().and_then(NodeKind::parse) {
            Some(NodeKind::Topic) => {
                let children = match map.remove("children") {
                    Some(Value::Array(items)) => {
                        items.into_iter().map(TopicNode::from_value).collect()
                    }
                    _ => Vec::new(),
                };
                TopicNode::Topic(TopicData {
                    common: NodeCommon::from_map(&mut map),
                    children,
                })
            }
            Some(NodeKind::Video) => TopicNode::Video(VideoData::from_map(&mut map)),
            None => TopicNode::Unknown {
                kind,
                id: take_string(&mut map, "id"),
            },
        }
    }

    /// Node id, if the document carried one
    pub fn id(&self) -> Option<&str> {
        match self {
            TopicNode::Topic(topic) => topic.common.id.as_deref(),
            TopicNode::Video(video) => video.common.id.as_deref(),
            TopicNode::Unknown { id, .. } => id.as_deref(),
        }
    }

    /// Node kind, `None` for nodes the flattener skips
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            TopicNode::Topic(_) => Some(NodeKind::Topic),
            TopicNode::Video(_) => Some(NodeKind::Video),
            TopicNode::Unknown { .. } => None,
        }
    }
}

impl<'de> Deserialize<'de> for TopicNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(TopicNode::from_value)
    }
}

impl NodeCommon {
    fn from_map(map: &mut Map<String, Value>) -> Self {
        Self {
            id: take_string(map, "id"),
            title: take_string(map, "title"),
            standalone_title: take_string(map, "standalone_title"),
            description: take_string(map, "description"),
            ka_url: take_string(map, "ka_url"),
            hide: take_bool(map, "hide"),
            parent_topic_id: take_string(map, "parentTopic_id"),
            ancestry: take_string(map, "ancestry"),
            seq: take_i64(map, "seq"),
        }
    }
}

impl VideoData {
    fn from_map(map: &mut Map<String, Value>) -> Self {
        let download_urls = match map.remove("download_urls") {
            Some(Value::Object(mut urls)) => Some(DownloadUrls {
                mp4: take_string(&mut urls, "mp4"),
                png: take_string(&mut urls, "png"),
                m3u8: take_string(&mut urls, "m3u8"),
            }),
            _ => None,
        };

        Self {
            common: NodeCommon::from_map(map),
            readable_id: take_string(map, "readable_id"),
            youtube_id: take_string(map, "youtube_id"),
            duration: take_i64(map, "duration"),
            keywords: take_string(map, "keywords"),
            progress_key: take_string(map, "progress_key"),
            date_added: take_string(map, "date_added"),
            views: take_i64(map, "views"),
            download_status: take_i64(map, "download_status"),
            download_urls,
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn take_bool(map: &mut Map<String, Value>, key: &str) -> Option<bool> {
    match map.remove(key) {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    }
}

/// Integers may arrive as floats (`"duration": 431.0`). A float with a
/// fractional part is treated as absent rather than truncated.
fn take_i64(map: &mut Map<String, Value>, key: &str) -> Option<i64> {
    match map.remove(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_topic_with_children() {
        let node: TopicNode = serde_json::from_value(json!({
            "id": "math",
            "kind": "Topic",
            "title": "Math",
            "hide": false,
            "children": [
                {"id": "v1", "kind": "Video", "readable_id": "v1", "youtube_id": "y1"},
                {"id": "ex", "kind": "Exercise"}
            ]
        }))
        .unwrap();

        let TopicNode::Topic(topic) = node else {
            panic!("expected topic");
        };
        assert_eq!(topic.common.id.as_deref(), Some("math"));
        assert_eq!(topic.common.hide, Some(false));
        assert_eq!(topic.children.len(), 2);
        assert_eq!(topic.children[0].kind(), Some(NodeKind::Video));
        assert_eq!(topic.children[1].kind(), None);
        assert_eq!(topic.children[1].id(), Some("ex"));
    }

    #[test]
    fn test_missing_kind_is_unknown() {
        let node = TopicNode::from_value(json!({"id": "orphan", "title": "x"}));
        assert_eq!(
            node,
            TopicNode::Unknown {
                kind: None,
                id: Some("orphan".into())
            }
        );

        let node = TopicNode::from_value(json!("not an object"));
        assert_eq!(node.kind(), None);
    }

    #[test]
    fn test_download_urls_are_optional_per_key() {
        let node = TopicNode::from_value(json!({
            "kind": "Video",
            "readable_id": "intro",
            "download_urls": {"mp4": "http://cdn/intro.mp4", "png": null}
        }));
        let TopicNode::Video(video) = node else {
            panic!("expected video");
        };
        let urls = video.download_urls.unwrap();
        assert_eq!(urls.mp4.as_deref(), Some("http://cdn/intro.mp4"));
        assert_eq!(urls.png, None);
        assert_eq!(urls.m3u8, None);
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let node = TopicNode::from_value(json!({
            "kind": "Video",
            "readable_id": 42,
            "duration": "long",
            "views": 1200.0,
            "hide": "yes",
            "download_urls": "none"
        }));
        let TopicNode::Video(video) = node else {
            panic!("expected video");
        };
        assert_eq!(video.readable_id, None);
        assert_eq!(video.duration, None);
        assert_eq!(video.views, Some(1200));
        assert_eq!(video.common.hide, None);
        assert_eq!(video.download_urls, None);
    }

    #[test]
    fn test_fractional_numbers_are_not_truncated() {
        let node = TopicNode::from_value(json!({
            "kind": "Video",
            "readable_id": "v",
            "duration": 431.5,
            "views": 12.0,
            "seq": -3.25
        }));
        let TopicNode::Video(video) = node else {
            panic!("expected video");
        };
        assert_eq!(video.duration, None);
        assert_eq!(video.views, Some(12));
        assert_eq!(video.common.seq, None);
    }

    #[test]
    fn test_topic_without_children_array() {
        let node = TopicNode::from_value(json!({"id": "empty", "kind": "Topic", "children": null}));
        let TopicNode::Topic(topic) = node else {
            panic!("expected topic");
        };
        assert!(topic.children.is_empty());
    }
}
