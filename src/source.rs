//! Loading the topic tree document
//!
//! The whole document is read into memory and decoded in one go. Remote
//! retrieval of the tree is not supported; the file is expected to have been
//! fetched beforehand.
//!
//! Decoding keeps serde_json's default nesting limit of 128 (objects and
//! arrays both count), so a tree deeper than about 60 topic levels is
//! rejected as a parse error. The flattener recurses once per level and
//! relies on that bound.

use crate::error::{SourceError, SourceResult};
use crate::tree::TopicNode;
use std::path::Path;
use tracing::{debug, info};

/// Read and decode the topic tree at `path`
pub fn load_tree(path: &Path) -> SourceResult<TopicNode> {
    info!(path = %path.display(), "Loading topic tree file...");

    let bytes = std::fs::read(path).map_err(|e| SourceError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(bytes = bytes.len(), "Topic tree read");

    serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
