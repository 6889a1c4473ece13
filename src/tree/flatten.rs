//! Single-pass tree flattener
//!
//! Walks the topic tree depth-first, left to right, and splits it into the
//! three row collections written to the database. While descending it
//! assigns each child its placement (parent id, sibling `seq`, ancestry
//! path), and on the way back up it aggregates video counts and picks each
//! topic's thumbnail.
//!
//! Output order is pre-order: a topic row is appended before any of its
//! descendants, and videos and links follow traversal order.

use super::node::{NodeKind, TopicData, TopicNode, VideoData};
use super::rows::{Placement, Topic, TopicVideoLink, Video};
use tracing::debug;

/// Separator between ids in an ancestry path
pub const ANCESTRY_SEPARATOR: char = '|';

/// Counters gathered during a flatten pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub topics: usize,
    pub videos: usize,
    pub links: usize,

    /// Nodes dropped because their kind was neither Topic nor Video
    pub skipped: usize,

    /// Deepest level reached (root is 0)
    pub max_depth: usize,
}

/// The flattened tree, ready for bulk insertion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedTree {
    pub topics: Vec<Topic>,
    pub videos: Vec<Video>,
    pub links: Vec<TopicVideoLink>,
    pub stats: FlattenStats,
}

/// What a subtree hands back to its parent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Contribution {
    thumb_id: Option<String>,
    video_count: i64,
}

/// Flatten a whole tree rooted at `root`
pub fn flatten(root: &TopicNode) -> FlattenedTree {
    Flattener::default().run(root)
}

/// Owns the output buffers for the duration of one pass
#[derive(Debug, Default)]
pub struct Flattener {
    topics: Vec<Topic>,
    videos: Vec<Video>,
    links: Vec<TopicVideoLink>,
    skipped: usize,
    max_depth: usize,
}

impl Flattener {
    pub fn run(mut self, root: &TopicNode) -> FlattenedTree {
        let placement = match root {
            TopicNode::Topic(topic) => Placement::root(&topic.common),
            TopicNode::Video(video) => Placement::root(&video.common),
            TopicNode::Unknown { .. } => {
                self.skip(root, None);
                Placement::default()
            }
        };

        let root_contribution = self.visit(root, "", placement, 0);
        debug!(
            videos = root_contribution.video_count,
            thumb_id = ?root_contribution.thumb_id,
            "Tree flattened"
        );

        let stats = FlattenStats {
            topics: self.topics.len(),
            videos: self.videos.len(),
            links: self.links.len(),
            skipped: self.skipped,
            max_depth: self.max_depth,
        };

        FlattenedTree {
            topics: self.topics,
            videos: self.videos,
            links: self.links,
            stats,
        }
    }

    fn visit(
        &mut self,
        node: &TopicNode,
        ancestry_prefix: &str,
        placement: Placement,
        depth: usize,
    ) -> Contribution {
        self.max_depth = self.max_depth.max(depth);
        match node {
            TopicNode::Topic(topic) => self.visit_topic(topic, ancestry_prefix, placement, depth),
            TopicNode::Video(video) => self.visit_video(video, placement),
            TopicNode::Unknown { .. } => Contribution::default(),
        }
    }

    fn visit_topic(
        &mut self,
        topic: &TopicData,
        ancestry_prefix: &str,
        placement: Placement,
        depth: usize,
    ) -> Contribution {
        let id = topic.common.id.as_deref().unwrap_or_default();
        let ancestry = format!("{ancestry_prefix}{ANCESTRY_SEPARATOR}{id}");

        // Reserve the pre-order slot; derived fields are filled in below.
        let index = self.topics.len();
        self.topics.push(Topic::placed(&topic.common, placement));

        let mut seq = 0i64;
        let mut thumb_id: Option<String> = None;
        let mut child_kind: Option<NodeKind> = None;
        let mut video_count = 0i64;

        for child in &topic.children {
            let Some(kind) = child.kind() else {
                self.skip(child, topic.common.id.as_deref());
                continue;
            };

            let child_placement = Placement {
                parent_topic_id: topic.common.id.clone(),
                seq,
                ancestry: ancestry.clone(),
            };
            seq += 1;

            let contribution = self.visit(child, &ancestry, child_placement, depth + 1);
            video_count += contribution.video_count;
            if thumb_id.is_none() {
                thumb_id = contribution.thumb_id;
            }
            // Last eligible child wins, even when kinds are mixed.
            child_kind = Some(kind);
        }

        let row = &mut self.topics[index];
        row.thumb_id = thumb_id.clone();
        row.child_kind = child_kind;
        row.video_count = video_count;
        row.downloaded_video_count = 0;

        Contribution {
            thumb_id,
            video_count,
        }
    }

    fn visit_video(&mut self, video: &VideoData, placement: Placement) -> Contribution {
        self.links.push(TopicVideoLink {
            topic_id: placement.parent_topic_id.clone(),
            video_id: video.readable_id.clone(),
        });
        self.videos.push(Video::placed(video, placement));

        Contribution {
            thumb_id: video.youtube_id.clone(),
            video_count: 1,
        }
    }

    fn skip(&mut self, node: &TopicNode, parent: Option<&str>) {
        self.skipped += 1;
        if let TopicNode::Unknown { kind, id } = node {
            debug!(parent = ?parent, id = ?id, kind = ?kind, "Skipping node of unsupported kind");
        }
    }
}
