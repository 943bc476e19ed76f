//! Error types for JSONL operations.

use std::io;
use thiserror::Error;

/// The error type for JSONL reading and writing.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line could not be decoded.
    #[error("line {line_number}: {source}")]
    Json {
        /// 1-based line number of the offending line.
        line_number: usize,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// Line number of a decode failure, if this is one.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Json { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

/// A specialized Result type for JSONL operations.
pub type Result<T> = std::result::Result<T, Error>;
