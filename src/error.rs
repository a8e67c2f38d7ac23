//! Error types for the glob-import preprocessor.
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for transform and invalidation operations
#[derive(Error, Debug)]
pub enum GlobImportError {
    /// File system errors
    #[error("Failed to stat '{path}': {source}")]
    FileStat {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Pattern errors
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to expand glob pattern '{pattern}': {source}")]
    GlobExpansion {
        pattern: String,
        source: glob::GlobError,
    },

    /// Watcher errors
    #[error("Failed to initialize file watcher: {reason}")]
    WatcherInit { reason: String },

    #[error("Cannot watch directory '{path}': {reason}")]
    WatchFailed { path: PathBuf, reason: String },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl GlobImportError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in structured output
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileStat { .. } => "FILE_STAT_ERROR",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::GlobExpansion { .. } => "GLOB_EXPANSION_ERROR",
            Self::WatcherInit { .. } => "WATCHER_INIT_ERROR",
            Self::WatchFailed { .. } => "WATCH_FAILED",
            Self::Config { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileStat { .. } => vec![
                "Check that the matched file still exists and you have read permissions",
                "Ensure the file is not being removed by a concurrent process",
            ],
            Self::InvalidPattern { .. } => vec![
                "Check the glob pattern in the import statement or in ignore_paths",
                "Only '*' and '**' wildcards are supported",
            ],
            Self::WatcherInit { .. } | Self::WatchFailed { .. } => vec![
                "Check file system permissions for the watched directory",
                "Disable auto_invalidation if watching is not needed",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for transform and invalidation operations
pub type GlobImportResult<T> = Result<T, GlobImportError>;
