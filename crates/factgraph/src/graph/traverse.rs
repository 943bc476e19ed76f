//! Breadth-first traversal.

use super::GraphIndex;
use super::types::{
    DEFAULT_TRAVERSE_DEPTH, DEFAULT_TRAVERSE_NODES, Direction, MAX_TRAVERSE_DEPTH,
    MAX_TRAVERSE_NODES, TraversalEdge, TraversalNode, TraversalOptions, TraversalResult,
    TraversalStats, normalize,
};
use std::collections::{HashSet, VecDeque};

impl GraphIndex {
    /// Walk the graph breadth-first from `start`.
    ///
    /// The start node is always reported, at depth 0, even when it is not a
    /// fact or fails the node-kind filter. Nodes failing the node-kind filter
    /// are still expanded; they are only left out of `nodes`. Once `nodes`
    /// holds `max_nodes` entries, newly discovered nodes are dropped and not
    /// expanded, and `stats.truncated` is set. Every edge crossed is
    /// reported, including the ones leading to dropped nodes.
    #[must_use]
    pub fn traverse(&self, start: &str, options: &TraversalOptions) -> TraversalResult {
        let max_depth = normalize(options.max_depth, DEFAULT_TRAVERSE_DEPTH, MAX_TRAVERSE_DEPTH);
        let max_nodes = normalize(options.max_nodes, DEFAULT_TRAVERSE_NODES, MAX_TRAVERSE_NODES);
        let adjacency = match options.direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        };

        let mut nodes = vec![TraversalNode::new(start, self.node_for(start), 0)];
        let mut edges = Vec::new();
        let mut stats = TraversalStats {
            nodes_visited: 1,
            ..TraversalStats::default()
        };

        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(start, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let Some(neighbours) = adjacency.get(current) else {
                continue;
            };

            for edge in neighbours {
                if !options.relation_kinds.is_empty() && !options.relation_kinds.contains(&edge.kind)
                {
                    continue;
                }

                let (from, to) = match options.direction {
                    Direction::Forward => (current, edge.node.as_str()),
                    Direction::Reverse => (edge.node.as_str(), current),
                };
                edges.push(TraversalEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                    kind: edge.kind.clone(),
                    synthetic: edge.synthetic,
                });

                let next = edge.node.as_str();
                if !visited.insert(next) {
                    continue;
                }
                if nodes.len() >= max_nodes {
                    stats.truncated = true;
                    continue;
                }

                let meta = self.node_for(next);
                let reported = options.node_kinds.is_empty()
                    || meta
                        .kind
                        .as_ref()
                        .is_some_and(|kind| options.node_kinds.contains(kind));
                if reported {
                    nodes.push(TraversalNode::new(next, meta, depth + 1));
                }
                stats.nodes_visited += 1;
                stats.max_depth_reached = stats.max_depth_reached.max(depth + 1);
                queue.push_back((next, depth + 1));
            }
        }

        stats.edges_traversed = edges.len();
        if stats.truncated {
            tracing::debug!(start, max_nodes, "Traversal truncated at node ceiling");
        }

        TraversalResult {
            start: start.to_string(),
            direction: options.direction,
            nodes,
            edges,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fact, FactKind, RelationKind};
    use std::sync::Arc;

    fn chain() -> GraphIndex {
        GraphIndex::build(Arc::new(vec![
            Fact::new("module", "a").with_relation("imports", "b"),
            Fact::new("symbol", "b").with_relation("calls", "c"),
            Fact::new("module", "c").with_relation("imports", "d"),
            Fact::new("module", "d"),
        ]))
    }

    fn names(result: &TraversalResult) -> Vec<&str> {
        result.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn forward_walk_reports_depths() {
        let result = chain().traverse("a", &TraversalOptions::default());
        assert_eq!(names(&result), ["a", "b", "c", "d"]);
        assert_eq!(result.nodes[3].depth, 3);
        assert_eq!(result.stats.max_depth_reached, 3);
        assert_eq!(result.stats.edges_traversed, 3);
        assert!(!result.stats.truncated);
    }

    #[test]
    fn reverse_edges_keep_declaring_side_as_from() {
        let options = TraversalOptions {
            direction: Direction::Reverse,
            ..TraversalOptions::default()
        };
        let result = chain().traverse("c", &options);
        assert_eq!(names(&result), ["c", "b", "a"]);
        assert_eq!(result.edges[0].from, "b");
        assert_eq!(result.edges[0].to, "c");
    }

    #[test]
    fn depth_ceiling_stops_expansion() {
        let options = TraversalOptions {
            max_depth: 1,
            ..TraversalOptions::default()
        };
        let result = chain().traverse("a", &options);
        assert_eq!(names(&result), ["a", "b"]);
    }

    #[test]
    fn relation_filter_skips_edges_entirely() {
        let options = TraversalOptions {
            relation_kinds: vec![RelationKind::Imports],
            ..TraversalOptions::default()
        };
        let result = chain().traverse("a", &options);
        assert_eq!(names(&result), ["a", "b"]);
        assert_eq!(result.stats.edges_traversed, 1);
    }

    #[test]
    fn node_filter_passes_through_hidden_nodes() {
        let options = TraversalOptions {
            node_kinds: vec![FactKind::Module],
            ..TraversalOptions::default()
        };
        let result = chain().traverse("a", &options);
        assert_eq!(names(&result), ["a", "c", "d"]);
        assert_eq!(result.stats.nodes_visited, 4);
        assert!(result.edges.iter().any(|e| e.from == "a" && e.to == "b"));
    }

    #[test]
    fn node_ceiling_truncates_but_records_edge() {
        let graph = GraphIndex::build(Arc::new(vec![
            Fact::new("module", "hub")
                .with_relation("imports", "x")
                .with_relation("imports", "y")
                .with_relation("imports", "z"),
        ]));
        let options = TraversalOptions {
            max_nodes: 2,
            ..TraversalOptions::default()
        };
        let result = graph.traverse("hub", &options);
        assert_eq!(names(&result), ["hub", "x"]);
        assert_eq!(result.edges.len(), 3);
        assert!(result.stats.truncated);
    }

    #[test]
    fn cycle_terminates() {
        let graph = GraphIndex::build(Arc::new(vec![
            Fact::new("module", "a").with_relation("imports", "b"),
            Fact::new("module", "b").with_relation("imports", "a"),
        ]));
        let result = graph.traverse("a", &TraversalOptions::default());
        assert_eq!(names(&result), ["a", "b"]);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn unknown_start_yields_single_empty_node() {
        let result = chain().traverse("nowhere", &TraversalOptions::default());
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].kind, None);
        assert!(result.edges.is_empty());
    }
}
