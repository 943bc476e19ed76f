//! Shortest path search.

use super::GraphIndex;
use super::types::{DEFAULT_PATH_DEPTH, MAX_PATH_DEPTH, PathResult, TraversalEdge, normalize};
use crate::model::RelationKind;
use std::collections::{HashMap, VecDeque};

/// How a node was first reached: its predecessor, the relation crossed, and
/// whether that relation was synthetic.
type Parent<'a> = (&'a str, &'a RelationKind, bool);

impl GraphIndex {
    /// Shortest forward path from `from` to `to`, at most `max_depth` hops.
    ///
    /// An empty `relation_kinds` follows every relation. A missing path is
    /// reported with `found: false`, never as an error.
    #[must_use]
    pub fn find_path(
        &self,
        from: &str,
        to: &str,
        relation_kinds: &[RelationKind],
        max_depth: usize,
    ) -> PathResult {
        if from == to {
            return PathResult {
                from: from.to_string(),
                to: to.to_string(),
                found: true,
                path: vec![from.to_string()],
                edges: Vec::new(),
            };
        }

        let max_depth = normalize(max_depth, DEFAULT_PATH_DEPTH, MAX_PATH_DEPTH);
        let mut parents: HashMap<&str, Parent<'_>> = HashMap::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(from, 0)]);
        let mut reached = false;

        'search: while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.outgoing(current) {
                if !relation_kinds.is_empty() && !relation_kinds.contains(&edge.kind) {
                    continue;
                }
                let next = edge.node.as_str();
                if next == from || parents.contains_key(next) {
                    continue;
                }
                parents.insert(next, (current, &edge.kind, edge.synthetic));
                if next == to {
                    reached = true;
                    break 'search;
                }
                queue.push_back((next, depth + 1));
            }
        }

        if !reached {
            return PathResult::not_found(from, to);
        }

        let mut path = vec![to.to_string()];
        let mut edges = Vec::new();
        let mut cursor = to;
        while let Some(&(parent, kind, synthetic)) = parents.get(cursor) {
            edges.push(TraversalEdge {
                from: parent.to_string(),
                to: cursor.to_string(),
                kind: kind.clone(),
                synthetic,
            });
            path.push(parent.to_string());
            cursor = parent;
        }
        path.reverse();
        edges.reverse();

        PathResult {
            from: from.to_string(),
            to: to.to_string(),
            found: true,
            path,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fact;
    use std::sync::Arc;

    fn ring() -> GraphIndex {
        GraphIndex::build(Arc::new(vec![
            Fact::new("module", "a").with_relation("imports", "b"),
            Fact::new("module", "b").with_relation("imports", "c"),
            Fact::new("module", "c").with_relation("imports", "a"),
        ]))
    }

    #[test]
    fn same_endpoints_are_a_trivial_path() {
        let result = ring().find_path("a", "a", &[], 0);
        assert!(result.found);
        assert_eq!(result.path, ["a"]);
        assert_eq!(result.hops(), 0);
    }

    #[test]
    fn follows_forward_edges_only() {
        let result = ring().find_path("a", "c", &[], 0);
        assert_eq!(result.path, ["a", "b", "c"]);
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.edges[1].from, "b");
        assert_eq!(result.edges[1].kind, RelationKind::Imports);
    }

    #[test]
    fn depth_ceiling_hides_longer_paths() {
        let result = ring().find_path("a", "c", &[], 1);
        assert!(!result.found);
        assert!(result.path.is_empty());
    }

    #[test]
    fn relation_filter_applies() {
        let result = ring().find_path("a", "b", &[RelationKind::Calls], 0);
        assert!(!result.found);
    }

    #[test]
    fn picks_the_shortest_branch() {
        let graph = GraphIndex::build(Arc::new(vec![
            Fact::new("module", "a")
                .with_relation("imports", "long")
                .with_relation("imports", "goal"),
            Fact::new("module", "long").with_relation("imports", "goal"),
        ]));
        let result = graph.find_path("a", "goal", &[], 0);
        assert_eq!(result.path, ["a", "goal"]);
    }
}
