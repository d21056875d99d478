//! Report and dataset serialization.
//!
//! - `json`: run reports as JSON documents
//! - `csv`: datasets as `x,y` CSV files
//! - `artifacts`: timestamped run directories
//! - `terminal`: human-readable run summary

pub mod artifacts;
pub mod csv;
pub mod json;
pub mod terminal;

use thiserror::Error;

/// Errors from reading or writing run outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Loaded data failed validation.
    #[error("invalid data at line {line}: {source}")]
    Data {
        /// 1-indexed line of the offending row (0 for whole-file problems).
        line: usize,
        /// Underlying validation error.
        #[source]
        source: crate::Error,
    },
}

impl OutputError {
    /// Validation error behind this failure, if any.
    pub fn validation(&self) -> Option<&crate::Error> {
        match self {
            OutputError::Data { source, .. } => Some(source),
            _ => None,
        }
    }
}
