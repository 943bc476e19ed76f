//! Indexed fact store.
//!
//! [`FactStore`] is the single source of truth for the architectural model.
//! It is an append-only sequence of [`Fact`]s (until [`FactStore::clear`])
//! with four secondary indexes:
//!
//! | Index | Key | Skipped when |
//! |-------|-----|--------------|
//! | kind | `fact.kind` | never |
//! | file | `fact.file` | file is empty |
//! | name | `fact.name` | name is empty |
//! | repo | `fact.repo` | repo is empty |
//!
//! Every lookup returns facts in insertion order; there is no other ordering.
//!
//! # Thread Safety
//!
//! The facts, the indexes, and the cached [`GraphIndex`] sit behind one
//! `tokio::sync::RwLock`. Reads run concurrently; `add`, the tagging
//! operations, `clear`, and `rebuild_graph` take the write lock, so the
//! indexes can never be observed half-updated.
//!
//! # Graph Cache
//!
//! The graph is derived data. [`FactStore::rebuild_graph`] builds it from
//! the current snapshot; adding or tagging facts afterwards does not refresh
//! it, and [`FactStore::clear`] drops it. A [`GraphIndex`] shares the fact
//! allocation it was built from, and the store copies that allocation on its
//! next mutation, so an in-flight traversal never sees facts change under it.

mod inner;
mod jsonl;
mod query;
mod tagging;

pub use query::{DEFAULT_QUERY_LIMIT, FactFilter, MAX_QUERY_LIMIT, QueryOptions, QueryPage};

use crate::graph::GraphIndex;
use crate::model::{Fact, FactKind};
use inner::StoreInner;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe, indexed collection of facts.
#[derive(Debug, Default)]
pub struct FactStore {
    inner: RwLock<StoreInner>,
}

impl FactStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Mutation ==========

    /// Append facts and index them.
    ///
    /// Relation targets are not validated; dangling targets become nodes
    /// with empty metadata once the graph is built. Returns the positions the
    /// new facts occupy, which is what [`tag_range`](Self::tag_range) expects
    /// as its start.
    pub async fn add(&self, facts: impl IntoIterator<Item = Fact>) -> Range<usize> {
        let mut inner = self.inner.write().await;
        let added = inner.add_all(facts);
        tracing::trace!(added = added.len(), total = inner.facts.len(), "Added facts");
        added
    }

    /// Label facts at or after `start` with `repo` and prefix their paths.
    ///
    /// The label is set on every fact in the range, but the prefix is only
    /// prepended to non-empty paths: a fact without a file stays without
    /// one rather than gaining a bare prefix that names no file. Returns the
    /// number of facts labelled.
    pub async fn tag_range(&self, start: usize, repo: &str, file_prefix: &str) -> usize {
        let tagged = self.inner.write().await.tag_range(start, repo, file_prefix);
        tracing::debug!(start, repo, tagged, "Tagged fact range");
        tagged
    }

    /// Label unlabelled facts with `repo`, prefixing paths that lack the
    /// prefix. Facts owned by another repository are skipped.
    ///
    /// Returns the number of facts whose file path changed.
    pub async fn tag_untagged(&self, repo: &str, file_prefix: &str) -> usize {
        let renamed = self.inner.write().await.tag_untagged(repo, file_prefix);
        tracing::debug!(repo, renamed, "Tagged untagged facts");
        renamed
    }

    /// Label facts at or after `start` with `repo`, leaving paths alone.
    ///
    /// Returns the number of facts labelled.
    pub async fn set_repo_range(&self, start: usize, repo: &str) -> usize {
        self.inner.write().await.set_repo_range(start, repo)
    }

    /// Drop every fact and index, and invalidate the cached graph.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
        tracing::debug!("Cleared fact store");
    }

    // ========== Lookups ==========

    /// Number of facts.
    pub async fn count(&self) -> usize {
        self.inner.read().await.facts.len()
    }

    /// Whether the store holds no facts.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.facts.is_empty()
    }

    /// Point-in-time view of every fact, shared rather than copied.
    pub async fn snapshot(&self) -> Arc<Vec<Fact>> {
        Arc::clone(&self.inner.read().await.facts)
    }

    /// Clone of every fact, in insertion order.
    pub async fn all(&self) -> Vec<Fact> {
        self.inner.read().await.facts.as_ref().clone()
    }

    /// The fact at `position`, if any.
    pub async fn get(&self, position: usize) -> Option<Fact> {
        self.inner.read().await.facts.get(position).cloned()
    }

    /// Facts of exactly this kind.
    pub async fn by_kind(&self, kind: &FactKind) -> Vec<Fact> {
        let inner = self.inner.read().await;
        inner.lookup(&inner.by_kind, kind)
    }

    /// Facts declared in exactly this file.
    pub async fn by_file(&self, file: &str) -> Vec<Fact> {
        let inner = self.inner.read().await;
        inner.lookup(&inner.by_file, file)
    }

    /// Facts with exactly this name.
    pub async fn by_name(&self, name: &str) -> Vec<Fact> {
        let inner = self.inner.read().await;
        inner.lookup(&inner.by_name, name)
    }

    /// Facts labelled with exactly this repository.
    pub async fn by_repo(&self, repo: &str) -> Vec<Fact> {
        let inner = self.inner.read().await;
        inner.lookup(&inner.by_repo, repo)
    }

    /// Facts for each of `names`, grouped in the order the names are given.
    pub async fn by_names(&self, names: &[&str]) -> Vec<Fact> {
        let inner = self.inner.read().await;
        names
            .iter()
            .flat_map(|name| inner.lookup(&inner.by_name, *name))
            .collect()
    }

    /// Facts whose name contains `needle`.
    pub async fn search_names(&self, needle: &str) -> Vec<Fact> {
        self.scan(|fact| !fact.name.is_empty() && fact.name.contains(needle))
            .await
    }

    /// Facts whose name starts with `prefix`.
    pub async fn by_name_prefix(&self, prefix: &str) -> Vec<Fact> {
        self.scan(|fact| !fact.name.is_empty() && fact.name.starts_with(prefix))
            .await
    }

    async fn scan(&self, keep: impl Fn(&Fact) -> bool) -> Vec<Fact> {
        let inner = self.inner.read().await;
        inner.facts.iter().filter(|f| keep(f)).cloned().collect()
    }

    // ========== Queries ==========

    /// Facts matching every criterion set in `filter`.
    pub async fn query(&self, filter: &FactFilter) -> Vec<Fact> {
        self.inner.read().await.query(filter)
    }

    /// One page of facts matching `options`, with the total match count.
    ///
    /// An offset past the end yields an empty page, not an error.
    pub async fn query_advanced(&self, options: &QueryOptions) -> QueryPage {
        self.inner.read().await.query_advanced(options)
    }

    // ========== Summaries ==========

    /// Number of facts per kind, in the order kinds were first seen.
    pub async fn kind_counts(&self) -> Vec<(FactKind, usize)> {
        let inner = self.inner.read().await;
        let mut order: Vec<(FactKind, usize)> = Vec::new();
        let mut seen: HashMap<&FactKind, usize> = HashMap::new();
        for fact in inner.facts.iter() {
            if let Some(&slot) = seen.get(&fact.kind) {
                order[slot].1 += 1;
            } else {
                seen.insert(&fact.kind, order.len());
                order.push((fact.kind.clone(), 1));
            }
        }
        order
    }

    /// Distinct repository labels, in the order first seen.
    pub async fn repos(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        first_seen(inner.facts.iter().map(|f| f.repo.as_str()))
    }

    /// Distinct file paths, in the order first seen.
    pub async fn files(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        first_seen(inner.facts.iter().map(|f| f.file.as_str()))
    }

    // ========== Graph ==========

    /// Build a graph from the current facts and cache it.
    pub async fn rebuild_graph(&self) -> Arc<GraphIndex> {
        let mut inner = self.inner.write().await;
        let graph = Arc::new(GraphIndex::build(Arc::clone(&inner.facts)));
        inner.graph = Some(Arc::clone(&graph));
        graph
    }

    /// The graph cached by the last rebuild, unless the store was cleared.
    pub async fn graph(&self) -> Option<Arc<GraphIndex>> {
        self.inner.read().await.graph.clone()
    }
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
