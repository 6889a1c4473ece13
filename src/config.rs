//! Configuration types for topictree-db
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//!
//! Every flag has a default, so running the binary with no arguments
//! rebuilds `out.sqlite3` from `../topictree`.

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Default location of the topic tree document
pub const DEFAULT_INPUT: &str = "../topictree";

/// Default output database file
pub const DEFAULT_OUTPUT: &str = "out.sqlite3";

/// Rebuild the offline library database from a topic tree
#[derive(Parser, Debug, Clone)]
#[command(
    name = "topictree-db",
    version,
    about = "Rebuild the offline library database from a JSON topic tree",
    long_about = "Reads a topic tree JSON document, flattens it into topic, video and \
                  topic-video rows, and writes them to a fresh SQLite database.\n\n\
                  Any existing output file is removed first.",
    after_help = "EXAMPLES:\n    \
        topictree-db\n    \
        topictree-db -i topictree.json -o library.sqlite3\n    \
        topictree-db -v  # debug logging"
)]
pub struct CliArgs {
    /// Topic tree JSON document
    #[arg(short, long, default_value = DEFAULT_INPUT, value_name = "FILE")]
    pub input: PathBuf,

    /// Output database file (replaced if it exists)
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_name = "FILE")]
    pub output: PathBuf,

    /// Quiet mode - suppress header, spinner and summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Topic tree document
    pub input_path: PathBuf,

    /// Output database path
    pub output_path: PathBuf,

    /// Show header, spinner and summary
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl BuildConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Validate input path
        if !args.input.exists() {
            return Err(ConfigError::InvalidInputPath {
                path: args.input.clone(),
                reason: "File does not exist".to_string(),
            });
        }
        if !args.input.is_file() {
            return Err(ConfigError::InvalidInputPath {
                path: args.input.clone(),
                reason: "Not a regular file".to_string(),
            });
        }

        // Validate output path
        if args.output.is_dir() {
            return Err(ConfigError::InvalidOutputPath {
                path: args.output.clone(),
                reason: "Path is a directory".to_string(),
            });
        }
        if let Some(parent) = args.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidOutputPath {
                    path: args.output.clone(),
                    reason: format!("Parent directory '{}' does not exist", parent.display()),
                });
            }
        }

        Ok(Self {
            input_path: args.input,
            output_path: args.output,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }
}
