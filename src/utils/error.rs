//! Error types for the summarization engine.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, classifying, or reporting edge logs
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Cannot open trace log {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {} at line {line}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {} at line {line}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to write output {}: {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern for edge kind '{label}': {reason}")]
    InvalidPattern { label: String, reason: String },

    #[error("Failed to load edge kinds from {}: {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },
}

impl SummaryError {
    /// Build a `MalformedRecord` error
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        SummaryError::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Build an `OutputWriteFailed` error from any displayable cause
    pub(crate) fn write_failed(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        SummaryError::OutputWriteFailed {
            path: path.into(),
            source: std::io::Error::other(cause.to_string()),
        }
    }
}
