//! Error types for topictree-db
//!
//! This module defines the error hierarchy for a rebuild:
//! - Topic tree source errors (opening and parsing the JSON document)
//! - SQLite database errors
//! - Configuration and CLI errors
//!
//! Malformed nodes inside an otherwise valid tree are not errors. The
//! flattener skips them and counts them in its stats.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a database rebuild
#[derive(Error, Debug)]
pub enum BuildError {
    /// Topic tree loading errors
    #[error("Topic tree error: {0}")]
    Source(#[from] SourceError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while reading the topic tree document
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be opened or read
    #[error("Failed to open topic tree '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not valid JSON
    #[error("Failed to parse topic tree '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to create database file
    #[error("Failed to create database at '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A previous output file exists and could not be removed
    #[error("Failed to remove existing database '{path}': {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema error
    #[error("Database schema error: {0}")]
    Schema(String),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input path error
    #[error("Invalid input path '{path}': {reason}")]
    InvalidInputPath { path: PathBuf, reason: String },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Result type alias for BuildError
pub type Result<T> = std::result::Result<T, BuildError>;

/// Result type alias for SourceError
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for DbError
pub type DbResult<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let db_err = DbError::Schema("missing table".into());
        let build_err: BuildError = db_err.into();
        assert!(matches!(build_err, BuildError::Database(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: BuildError = ConfigError::InvalidInputPath {
            path: PathBuf::from("../topictree"),
            reason: "File does not exist".into(),
        }
        .into();
        assert!(matches!(err, BuildError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid input path '../topictree': File does not exist"
        );
    }

    #[test]
    fn test_source_error_message_names_path() {
        let err = SourceError::Open {
            path: PathBuf::from("../topictree"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("../topictree"));
        assert!(msg.contains("no such file"));
    }
}
