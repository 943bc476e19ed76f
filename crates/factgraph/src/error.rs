//! Error types for factgraph operations.
//!
//! Only persistence and configuration can fail. Lookups, queries, traversals,
//! and cycle detection always return a well-formed (possibly empty) result.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for factgraph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened, created, or renamed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A persisted fact file could not be read or written.
    #[error("fact file {}: {source}", path.display())]
    Persistence {
        /// The fact file involved.
        path: PathBuf,
        /// The underlying JSONL error.
        #[source]
        source: factgraph_jsonl::Error,
    },

    /// JSONL error on a stream with no associated path.
    #[error("JSONL error: {0}")]
    Jsonl(#[from] factgraph_jsonl::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Attach a path to a JSONL error, keeping plain I/O failures as [`Error::Io`].
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: factgraph_jsonl::Error) -> Self {
        match source {
            factgraph_jsonl::Error::Io(source) => Self::Io {
                path: path.into(),
                source,
            },
            source => Self::Persistence {
                path: path.into(),
                source,
            },
        }
    }

    /// Line number of a malformed record, if this error is a decode failure.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Persistence { source, .. } | Self::Jsonl(source) => source.line_number(),
            _ => None,
        }
    }
}

/// A specialized Result type for factgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
