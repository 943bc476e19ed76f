//! Core store data structures.
//!
//! The fact sequence, its four secondary indexes, and the cached graph live
//! together in [`StoreInner`] so one lock keeps them consistent.

use crate::graph::GraphIndex;
use crate::model::{Fact, FactKind};
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;
use std::sync::Arc;

/// Inner storage structure (not thread-safe).
///
/// Index lists hold positions into `facts` in ascending order, so every
/// lookup returns facts in insertion order.
#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    /// Copy-on-write fact sequence. A built graph shares this allocation
    /// until the next mutation clones it.
    pub(super) facts: Arc<Vec<Fact>>,

    /// Positions by fact kind
    pub(super) by_kind: HashMap<FactKind, Vec<usize>>,

    /// Positions by file path (facts with an empty file are not indexed)
    pub(super) by_file: HashMap<String, Vec<usize>>,

    /// Positions by name (facts with an empty name are not indexed)
    pub(super) by_name: HashMap<String, Vec<usize>>,

    /// Positions by repository label (unlabelled facts are not indexed)
    pub(super) by_repo: HashMap<String, Vec<usize>>,

    /// Graph built by the last `rebuild_graph`, dropped by `clear`
    pub(super) graph: Option<Arc<GraphIndex>>,
}

fn index_into<K: Eq + Hash>(index: &mut HashMap<K, Vec<usize>>, key: K, position: usize) {
    index.entry(key).or_default().push(position);
}

impl StoreInner {
    /// Append facts, indexing each one as it is pushed.
    pub(super) fn add_all(&mut self, new_facts: impl IntoIterator<Item = Fact>) -> Range<usize> {
        let facts = Arc::make_mut(&mut self.facts);
        let start = facts.len();

        for fact in new_facts {
            let position = facts.len();
            index_into(&mut self.by_kind, fact.kind.clone(), position);
            if !fact.file.is_empty() {
                index_into(&mut self.by_file, fact.file.clone(), position);
            }
            if !fact.name.is_empty() {
                index_into(&mut self.by_name, fact.name.clone(), position);
            }
            if !fact.repo.is_empty() {
                index_into(&mut self.by_repo, fact.repo.clone(), position);
            }
            facts.push(fact);
        }

        start..facts.len()
    }

    /// Rebuild the file and repo indexes after facts were relabelled.
    ///
    /// Rebuilding from scratch keeps each index list in insertion order,
    /// which remove-then-push updates would not.
    pub(super) fn reindex_locations(&mut self) {
        self.by_file.clear();
        self.by_repo.clear();
        for (position, fact) in self.facts.iter().enumerate() {
            if !fact.file.is_empty() {
                index_into(&mut self.by_file, fact.file.clone(), position);
            }
            if !fact.repo.is_empty() {
                index_into(&mut self.by_repo, fact.repo.clone(), position);
            }
        }
    }

    /// Clone the facts at the given positions.
    pub(super) fn collect(&self, positions: &[usize]) -> Vec<Fact> {
        positions
            .iter()
            .filter_map(|&i| self.facts.get(i).cloned())
            .collect()
    }

    /// Clone the facts listed under `key` in `index`.
    pub(super) fn lookup<K, Q>(&self, index: &HashMap<K, Vec<usize>>, key: &Q) -> Vec<Fact>
    where
        K: Eq + Hash + std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        index
            .get(key)
            .map(|positions| self.collect(positions))
            .unwrap_or_default()
    }

    /// Drop every fact, index, and the cached graph.
    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_all_returns_the_new_range() {
        let mut inner = StoreInner::default();
        let first = inner.add_all([Fact::new("module", "a"), Fact::new("module", "b")]);
        let second = inner.add_all([Fact::new("symbol", "c")]);
        assert_eq!(first, 0..2);
        assert_eq!(second, 2..3);
    }

    #[test]
    fn empty_keys_are_not_indexed() {
        let mut inner = StoreInner::default();
        inner.add_all([Fact::new("symbol", "")]);
        assert!(inner.by_name.is_empty());
        assert!(inner.by_file.is_empty());
        assert!(inner.by_repo.is_empty());
        assert_eq!(inner.by_kind[&FactKind::Symbol], vec![0]);
    }

    #[test]
    fn adding_after_snapshot_does_not_touch_the_snapshot() {
        let mut inner = StoreInner::default();
        inner.add_all([Fact::new("module", "a")]);
        let snapshot = Arc::clone(&inner.facts);

        inner.add_all([Fact::new("module", "b")]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(inner.facts.len(), 2);
    }

    #[test]
    fn reindex_keeps_insertion_order() {
        let mut inner = StoreInner::default();
        inner.add_all([
            Fact::new("symbol", "a").with_file("x.go", 1),
            Fact::new("symbol", "b").with_file("y.go", 1),
            Fact::new("symbol", "c").with_file("x.go", 2),
        ]);
        Arc::make_mut(&mut inner.facts)[1].file = "x.go".to_string();
        inner.reindex_locations();

        assert_eq!(inner.by_file["x.go"], vec![0, 1, 2]);
        assert!(!inner.by_file.contains_key("y.go"));
    }
}
