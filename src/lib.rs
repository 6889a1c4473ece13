//! topictree-db - Offline Library Database Builder
//!
//! Converts a hierarchical JSON topic tree (topics containing child topics
//! and videos) into the SQLite database an offline client ships with.
//!
//! # Features
//!
//! - **Single-pass flattening**: One depth-first walk assigns every node its
//!   parent, sibling position and ancestry path, and rolls video counts and
//!   thumbnails up to each topic.
//!
//! - **Sparse inserts**: Fields missing from the document stay NULL (or the
//!   column default) in the database, never a placeholder value.
//!
//! - **All-or-nothing output**: Every row is written in one transaction that
//!   commits at the end of the run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    topictree (JSON document)                     │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ serde_json
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TopicNode tree                           │
//! │              Topic(children…) | Video | Unknown                  │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ flatten()
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         FlattenedTree                            │
//! │       topics (pre-order) │ videos │ topic-video links            │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ TopicDbWriter::write_all()
//!                               ▼
//!                    ┌──────────────────┐
//!                    │   SQLite DB      │
//!                    │  (out.sqlite3)   │
//!                    └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Rebuild out.sqlite3 from ../topictree
//! topictree-db
//!
//! # Explicit paths
//! topictree-db -i topictree.json -o library.sqlite3
//!
//! # Query results
//! sqlite3 out.sqlite3 "SELECT _id, video_count FROM topic WHERE parentTopic_id = 'root'"
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod tree;

pub use config::{BuildConfig, CliArgs};
pub use error::{BuildError, Result};
pub use pipeline::{BuildResult, Builder};
pub use tree::{flatten, FlattenedTree, TopicNode};
