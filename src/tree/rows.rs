//! Output row types produced by the flattener
//!
//! One struct per populated table. Optional fields that are `None` are left
//! out of the INSERT entirely, so the column keeps its schema default.

use super::node::{NodeCommon, NodeKind, VideoData};

/// Where a node sits in the tree, assigned by its parent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub parent_topic_id: Option<String>,
    pub seq: i64,
    pub ancestry: String,
}

impl Placement {
    /// Placement for the root node: no parent and an empty ancestry, whatever
    /// the document says. Only a `seq` the root already carries is kept.
    pub fn root(common: &NodeCommon) -> Self {
        Self {
            parent_topic_id: None,
            seq: common.seq.unwrap_or(0),
            ancestry: String::new(),
        }
    }
}

/// Row of the `topic` table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topic {
    pub id: Option<String>,
    pub child_kind: Option<NodeKind>,
    pub video_count: i64,
    pub downloaded_video_count: i64,
    pub standalone_title: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub ka_url: Option<String>,
    pub hide: Option<bool>,
    pub parent_topic_id: Option<String>,
    pub ancestry: String,
    pub seq: i64,
    pub thumb_id: Option<String>,
}

impl Topic {
    /// Topic row with placement applied and derived fields still zeroed
    pub fn placed(common: &NodeCommon, placement: Placement) -> Self {
        Self {
            id: common.id.clone(),
            child_kind: None,
            video_count: 0,
            downloaded_video_count: 0,
            standalone_title: common.standalone_title.clone(),
            title: common.title.clone(),
            description: common.description.clone(),
            ka_url: common.ka_url.clone(),
            hide: common.hide,
            parent_topic_id: placement.parent_topic_id,
            ancestry: placement.ancestry,
            seq: placement.seq,
            thumb_id: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Topic
    }
}

/// Row of the `video` table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Video {
    pub readable_id: Option<String>,
    pub download_status: Option<i64>,
    pub keywords: Option<String>,
    pub progress_key: Option<String>,
    pub duration: Option<i64>,
    pub youtube_id: Option<String>,
    pub mp4url: Option<String>,
    pub pngurl: Option<String>,
    pub m3u8url: Option<String>,
    pub date_added: Option<String>,
    pub views: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub ka_url: Option<String>,
    pub hide: Option<bool>,
    pub parent_topic_id: Option<String>,
    pub ancestry: String,
    pub seq: i64,
}

impl Video {
    /// Video row with placement applied and download URLs split out
    pub fn placed(video: &VideoData, placement: Placement) -> Self {
        let urls = video.download_urls.clone().unwrap_or_default();
        Self {
            readable_id: video.readable_id.clone(),
            download_status: video.download_status,
            keywords: video.keywords.clone(),
            progress_key: video.progress_key.clone(),
            duration: video.duration,
            youtube_id: video.youtube_id.clone(),
            mp4url: urls.mp4,
            pngurl: urls.png,
            m3u8url: urls.m3u8,
            date_added: video.date_added.clone(),
            views: video.views,
            title: video.common.title.clone(),
            description: video.common.description.clone(),
            ka_url: video.common.ka_url.clone(),
            hide: video.common.hide,
            parent_topic_id: placement.parent_topic_id,
            ancestry: placement.ancestry,
            seq: placement.seq,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Video
    }
}

/// Row of the `topicvideo` table: a video and its immediate parent topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TopicVideoLink {
    pub topic_id: Option<String>,
    pub video_id: Option<String>,
}
