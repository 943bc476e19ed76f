//! JSONL persistence for the fact store.
//!
//! One fact per line, in insertion order. Writes take a snapshot under the
//! read lock and do their I/O after releasing it. Reads decode the whole
//! input before touching the store, so a malformed line leaves the store
//! exactly as it was.

use super::FactStore;
use crate::error::{Error, Result};
use crate::model::Fact;
use factgraph_jsonl::{JsonlReader, JsonlWriter, read_jsonl};
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};

impl FactStore {
    /// Create a store populated from a fact file.
    ///
    /// # Errors
    ///
    /// See [`load_from_path`](Self::load_from_path).
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new();
        store.load_from_path(path).await?;
        Ok(store)
    }

    /// Serialize every fact to `writer`, one JSON object per line.
    ///
    /// Returns the number of facts written. An empty store writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Jsonl`] if writing fails.
    pub async fn write_jsonl<W>(&self, writer: W) -> Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let facts = self.snapshot().await;
        let mut writer = JsonlWriter::new(writer);
        writer.write_all(facts.iter()).await?;
        writer.flush().await?;
        Ok(writer.records_written())
    }

    /// Append every fact read from `reader`, skipping blank lines.
    ///
    /// Returns the positions of the appended facts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Jsonl`] for the first line that does not decode; no
    /// facts are added in that case.
    pub async fn read_jsonl<R>(&self, reader: R) -> Result<Range<usize>>
    where
        R: AsyncRead + Unpin,
    {
        let facts: Vec<Fact> = JsonlReader::new(reader).read_all().await?;
        Ok(self.add(facts).await)
    }

    /// Atomically write every fact to `path`.
    ///
    /// Facts are staged in `<file name>.tmp` next to `path`, synced, and
    /// renamed over it. The staging file is removed whenever the save fails,
    /// and an existing fact file is only replaced by a complete one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] (with `path`) if the staging file cannot be
    /// written or renamed into place.
    pub async fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let facts = self.snapshot().await;
        let staging = staging_path(path);

        let saved = match write_staged(&staging, path, &facts).await {
            Ok(()) => tokio::fs::rename(&staging, path)
                .await
                .map_err(|source| io_error(path, source)),
            Err(err) => Err(err),
        };
        if let Err(err) = saved {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::debug!(staging = %staging.display(), error = %cleanup, "Staging file not removed");
            }
            return Err(err);
        }

        tracing::debug!(path = %path.display(), facts = facts.len(), "Saved fact store");
        Ok(())
    }

    /// Append every fact from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Persistence`] naming the path and line of the first malformed
    /// record. The store is unchanged on error.
    pub async fn load_from_path(&self, path: impl AsRef<Path>) -> Result<Range<usize>> {
        let path = path.as_ref();
        let facts: Vec<Fact> = read_jsonl(path)
            .await
            .map_err(|e| Error::persistence(path, e))?;
        let added = self.add(facts).await;
        tracing::debug!(path = %path.display(), facts = added.len(), "Loaded fact file");
        Ok(added)
    }
}

/// `facts.jsonl` stages as `facts.jsonl.tmp` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

async fn write_staged(staging: &Path, target: &Path, facts: &[Fact]) -> Result<()> {
    let file = File::create(staging)
        .await
        .map_err(|source| io_error(target, source))?;
    let mut writer = JsonlWriter::new(file);
    writer
        .write_all(facts.iter())
        .await
        .map_err(|e| Error::persistence(target, e))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::persistence(target, e))?;
    writer
        .into_inner()
        .into_inner()
        .sync_all()
        .await
        .map_err(|source| io_error(target, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn staging_file_sits_next_to_the_fact_file() {
        assert_eq!(
            staging_path(Path::new(".factgraph/facts.jsonl")),
            Path::new(".factgraph/facts.jsonl.tmp")
        );
        assert_eq!(staging_path(Path::new("facts")), Path::new("facts.tmp"));
    }

    #[tokio::test]
    async fn empty_store_writes_no_lines() {
        let store = FactStore::new();
        let mut buf = Vec::new();
        assert_eq!(store.write_jsonl(&mut buf).await.unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn read_skips_blank_lines() {
        let store = FactStore::new();
        let data = "\n{\"kind\":\"module\",\"name\":\"a\"}\n\n{\"kind\":\"module\",\"name\":\"b\"}\n\n";
        let added = store.read_jsonl(Cursor::new(data)).await.unwrap();
        assert_eq!(added, 0..2);
    }

    #[tokio::test]
    async fn malformed_line_leaves_store_untouched() {
        let store = FactStore::new();
        store.add([Fact::new("module", "existing")]).await;

        let data = "{\"kind\":\"module\",\"name\":\"a\"}\n{\"kind\":\n";
        let err = store.read_jsonl(Cursor::new(data)).await.unwrap_err();

        assert_eq!(err.line_number(), Some(2));
        assert_eq!(store.count().await, 1);
    }
}
