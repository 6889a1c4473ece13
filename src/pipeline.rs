//! End-to-end rebuild
//!
//! Stages run strictly in order, each consuming the previous one's output:
//!
//! ```text
//! remove old file → create schema → load tree → flatten → insert + commit
//! ```
//!
//! Nothing is written until the old file is gone, and nothing is committed
//! until every row has been inserted.

use crate::config::BuildConfig;
use crate::db::{remove_existing, table_count, tables, TopicDbWriter, WriteReport};
use crate::error::{DbResult, Result};
use crate::progress::ProgressReporter;
use crate::source::load_tree;
use crate::tree::{flatten, FlattenStats};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a rebuild
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub flatten: FlattenStats,
    pub write: WriteReport,

    /// Row counts read back from the committed file
    pub table_rows: Vec<(&'static str, i64)>,

    /// Whether a previous output file was replaced
    pub replaced_existing: bool,

    pub duration: Duration,

    /// Size of the finished database file
    pub db_size: Option<u64>,
}

/// Runs one full rebuild for a configuration
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Rebuild the database, reporting stages to `progress` if given
    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<BuildResult> {
        let start = Instant::now();
        let status = |msg: &str| {
            if let Some(p) = progress {
                p.set_status(msg);
            }
        };

        let output = &self.config.output_path;

        status("Removing previous database...");
        let replaced_existing = remove_existing(output)?;
        if replaced_existing {
            info!(path = %output.display(), "Replacing existing database");
        }

        status("Creating schema...");
        info!("Opening database: {}", output.display());
        let mut writer = TopicDbWriter::create(output)?;

        status("Loading topic tree...");
        let root = load_tree(&self.config.input_path)?;

        status("Parsing tree...");
        info!("Parsing tree...");
        let flat = flatten(&root);
        drop(root);
        debug!(
            topics = flat.stats.topics,
            videos = flat.stats.videos,
            links = flat.stats.links,
            max_depth = flat.stats.max_depth,
            "Tree parsed"
        );
        if flat.stats.skipped > 0 {
            warn!(
                skipped = flat.stats.skipped,
                "Skipped nodes whose kind is neither Topic nor Video"
            );
        }

        status("Writing rows...");
        let write = writer.write_all(&flat)?;
        let table_rows = [tables::TOPIC, tables::VIDEO, tables::TOPICVIDEO]
            .into_iter()
            .map(|table| Ok((table, table_count(writer.connection(), table)?)))
            .collect::<DbResult<Vec<_>>>()?;
        writer.finish()?;

        let db_size = std::fs::metadata(output).map(|m| m.len()).ok();
        let duration = start.elapsed();
        info!(duration_ms = duration.as_millis() as u64, "done!");

        Ok(BuildResult {
            flatten: flat.stats,
            write,
            table_rows,
            replaced_existing,
            duration,
            db_size,
        })
    }
}
