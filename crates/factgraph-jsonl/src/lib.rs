//! Strict JSON Lines support for fact files.
//!
//! One JSON value per line, order preserved. Blank lines are skipped on read;
//! any other line that fails to decode aborts the read and reports its
//! 1-based line number. [`JsonlWriter`] writes to any async sink; callers
//! that need crash-safe files stage and rename on their side.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use writer::JsonlWriter;

use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;

/// Reads every record from a JSONL file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// [`Error::Json`] for the first line that is not a valid `T`.
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    JsonlReader::new(file).read_all().await
}
