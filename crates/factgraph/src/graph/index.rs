//! Adjacency index built from a fact snapshot.

use super::types::NodeMeta;
use crate::model::{Fact, FactKind, RelationKind, containing_dir, parent_segment};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One entry in an adjacency list.
///
/// In the forward map `node` is the relation target; in the reverse map it
/// is the declaring fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentEdge {
    /// Relation kind
    pub kind: RelationKind,
    /// The node at the other end
    pub node: String,
    /// Derived from dependency facts rather than declared
    pub synthetic: bool,
}

/// Forward and reverse adjacency lists keyed by fact name.
///
/// Built once from a snapshot and read-only afterwards. Node metadata comes
/// from the first fact carrying each name; later facts with the same name
/// contribute edges but not metadata.
#[derive(Debug)]
pub struct GraphIndex {
    facts: Arc<Vec<Fact>>,
    first_seen: HashMap<String, usize>,
    pub(super) forward: HashMap<String, Vec<AdjacentEdge>>,
    pub(super) reverse: HashMap<String, Vec<AdjacentEdge>>,
    edge_count: usize,
    synthetic_count: usize,
}

impl GraphIndex {
    /// Build the index from a snapshot of facts.
    ///
    /// Besides one edge per declared relation, every `imports` relation on a
    /// `dependency` fact that lives inside a known module is resolved to the
    /// nearest enclosing module of its target, and a synthetic
    /// module-to-module `imports` edge is added for it. This lets a module
    /// node reach the modules its files import even when the recorded target
    /// is a path deep inside another module.
    #[must_use]
    pub fn build(facts: Arc<Vec<Fact>>) -> Self {
        let mut graph = Self {
            facts,
            first_seen: HashMap::new(),
            forward: HashMap::new(),
            reverse: HashMap::new(),
            edge_count: 0,
            synthetic_count: 0,
        };
        let snapshot = Arc::clone(&graph.facts);

        let mut modules = HashSet::new();
        for (position, fact) in snapshot.iter().enumerate() {
            if fact.name.is_empty() {
                continue;
            }
            graph.first_seen.entry(fact.name.clone()).or_insert(position);
            if fact.kind == FactKind::Module {
                modules.insert(fact.name.as_str());
            }
        }

        let mut bridged: HashSet<(&str, &str)> = HashSet::new();
        for fact in snapshot.iter() {
            if fact.name.is_empty() {
                continue;
            }
            for relation in &fact.relations {
                graph.add_edge(&fact.name, &relation.kind, &relation.target, false);
            }

            if fact.kind != FactKind::Dependency {
                continue;
            }
            let source = containing_dir(&fact.file);
            if !modules.contains(source) {
                continue;
            }
            for relation in fact.relations.iter().filter(|r| r.kind == RelationKind::Imports) {
                let Some(resolved) = nearest_module(&relation.target, &modules) else {
                    continue;
                };
                if resolved != source && bridged.insert((source, resolved)) {
                    graph.add_edge(source, &RelationKind::Imports, resolved, true);
                    graph.synthetic_count += 1;
                }
            }
        }

        tracing::debug!(
            facts = snapshot.len(),
            nodes = graph.first_seen.len(),
            edges = graph.edge_count,
            synthetic = graph.synthetic_count,
            "Built graph index"
        );
        graph
    }

    fn add_edge(&mut self, from: &str, kind: &RelationKind, to: &str, synthetic: bool) {
        self.forward
            .entry(from.to_string())
            .or_default()
            .push(AdjacentEdge {
                kind: kind.clone(),
                node: to.to_string(),
                synthetic,
            });
        self.reverse
            .entry(to.to_string())
            .or_default()
            .push(AdjacentEdge {
                kind: kind.clone(),
                node: from.to_string(),
                synthetic,
            });
        self.edge_count += 1;
    }

    /// Metadata for `name`; empty when no fact has that name.
    #[must_use]
    pub fn node_for(&self, name: &str) -> NodeMeta {
        self.first_seen
            .get(name)
            .and_then(|&position| self.facts.get(position))
            .map(|fact| NodeMeta {
                kind: Some(fact.kind.clone()),
                file: fact.file.clone(),
                line: fact.line,
            })
            .unwrap_or_default()
    }

    /// Whether a fact with this name exists in the snapshot.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.first_seen.contains_key(name)
    }

    /// Relations declared by `name`.
    #[must_use]
    pub fn outgoing(&self, name: &str) -> &[AdjacentEdge] {
        self.forward.get(name).map_or(&[], Vec::as_slice)
    }

    /// Relations targeting `name`.
    #[must_use]
    pub fn incoming(&self, name: &str) -> &[AdjacentEdge] {
        self.reverse.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct named facts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.first_seen.len()
    }

    /// Number of edges, synthetic ones included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of synthetic module-to-module edges.
    #[must_use]
    pub fn synthetic_edge_count(&self) -> usize {
        self.synthetic_count
    }

    /// The snapshot this index was built from.
    #[must_use]
    pub fn facts(&self) -> &Arc<Vec<Fact>> {
        &self.facts
    }
}

/// Walk `target` and its parent segments until one names a module.
fn nearest_module<'a>(target: &'a str, modules: &HashSet<&str>) -> Option<&'a str> {
    let mut current = target.trim_end_matches('/');
    loop {
        if modules.contains(current) {
            return Some(current);
        }
        current = parent_segment(current)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(facts: Vec<Fact>) -> GraphIndex {
        GraphIndex::build(Arc::new(facts))
    }

    #[test]
    fn first_fact_with_a_name_supplies_metadata() {
        let graph = build(vec![
            Fact::new("module", "shared").with_file("shared/doc.go", 1),
            Fact::new("symbol", "shared").with_file("other/shared.go", 9),
        ]);
        let meta = graph.node_for("shared");
        assert_eq!(meta.kind, Some(FactKind::Module));
        assert_eq!(meta.file, "shared/doc.go");
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn dangling_target_has_empty_metadata() {
        let graph = build(vec![Fact::new("symbol", "a").with_relation("calls", "ghost")]);
        assert_eq!(graph.node_for("ghost"), NodeMeta::default());
        assert!(!graph.contains("ghost"));
        assert_eq!(graph.incoming("ghost").len(), 1);
    }

    #[test]
    fn every_relation_gets_forward_and_reverse_entries() {
        let graph = build(vec![
            Fact::new("symbol", "a")
                .with_relation("calls", "b")
                .with_relation("implements", "c"),
        ]);
        assert_eq!(graph.outgoing("a").len(), 2);
        assert_eq!(graph.incoming("b")[0].node, "a");
        assert_eq!(graph.incoming("c")[0].kind, RelationKind::Implements);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn dependency_import_bridges_to_enclosing_module() {
        let graph = build(vec![
            Fact::new("module", "internal/api"),
            Fact::new("module", "internal/store"),
            Fact::new("dependency", "internal/api/server.go")
                .with_file("internal/api/server.go", 3)
                .with_relation("imports", "internal/store/sql/conn"),
        ]);

        let synthetic: Vec<_> = graph
            .outgoing("internal/api")
            .iter()
            .filter(|e| e.synthetic)
            .collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].node, "internal/store");
        assert_eq!(synthetic[0].kind, RelationKind::Imports);
        assert_eq!(graph.synthetic_edge_count(), 1);
    }

    #[test]
    fn no_bridge_without_enclosing_module_or_to_self() {
        let graph = build(vec![
            Fact::new("module", "internal/api"),
            Fact::new("dependency", "internal/api/server.go")
                .with_file("internal/api/server.go", 3)
                .with_relation("imports", "github.com/pkg/errors")
                .with_relation("imports", "internal/api/middleware"),
        ]);
        assert_eq!(graph.synthetic_edge_count(), 0);
    }

    #[test]
    fn no_bridge_when_dependency_lives_outside_modules() {
        let graph = build(vec![
            Fact::new("module", "internal/store"),
            Fact::new("dependency", "scripts/gen.go")
                .with_file("scripts/gen.go", 1)
                .with_relation("imports", "internal/store"),
        ]);
        assert_eq!(graph.synthetic_edge_count(), 0);
        assert!(graph.outgoing("scripts").is_empty());
    }

    #[test]
    fn repeated_imports_bridge_once() {
        let graph = build(vec![
            Fact::new("module", "api"),
            Fact::new("module", "store"),
            Fact::new("dependency", "api/a.go")
                .with_file("api/a.go", 1)
                .with_relation("imports", "store/x"),
            Fact::new("dependency", "api/b.go")
                .with_file("api/b.go", 1)
                .with_relation("imports", "store/y"),
        ]);
        assert_eq!(graph.synthetic_edge_count(), 1);
    }

    #[test]
    fn nearest_module_prefers_deepest_match() {
        let modules: HashSet<&str> = ["a", "a/b"].into_iter().collect();
        assert_eq!(nearest_module("a/b/c/d", &modules), Some("a/b"));
        assert_eq!(nearest_module("a/x", &modules), Some("a"));
        assert_eq!(nearest_module("z/y", &modules), None);
    }
}
