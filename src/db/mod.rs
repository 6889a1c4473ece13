//! Database module for the SQLite output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  FlattenedTree                       │
//! │  topics / videos / links (owned Vec<Row>)            │
//! └─────────────────────┬───────────────────────────────┘
//!                       │ SqlRow::columns()
//!                       ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  TopicDbWriter                       │
//! │  - One transaction for the whole run                 │
//! │  - Sparse INSERT OR IGNORE per row                   │
//! │  - Cached statements per column set                  │
//! └─────────────────────┬───────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                SQLite file (out.sqlite3)             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod reader;
pub mod row;
pub mod schema;
pub mod writer;

pub use reader::{load_links, load_topics, load_videos, table_count};
pub use row::{Columns, SqlRow};
pub use schema::{create_database, tables, verify_schema};
pub use writer::{bulk_insert, remove_existing, InsertReport, TopicDbWriter, WriteReport};
