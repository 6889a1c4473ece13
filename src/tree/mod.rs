//! Topic tree model and flattener
//!
//! ```text
//!            TopicNode (JSON)
//!                  │
//!                  ▼
//!        ┌───────────────────┐
//!        │     Flattener     │  depth-first, one pass
//!        │ - placement       │  parent / seq / ancestry
//!        │ - aggregation     │  video_count / thumb_id / child_kind
//!        └─────────┬─────────┘
//!        ┌─────────┼──────────┐
//!        ▼         ▼          ▼
//!     topics     videos     links
//! ```

pub mod flatten;
pub mod node;
pub mod rows;

pub use flatten::{flatten, FlattenStats, FlattenedTree, Flattener, ANCESTRY_SEPARATOR};
pub use node::{DownloadUrls, NodeCommon, NodeKind, TopicData, TopicNode, VideoData};
pub use rows::{Placement, Topic, TopicVideoLink, Video};
