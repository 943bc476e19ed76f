//! Types for graph operations.

use crate::model::{FactKind, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default traversal depth when none is given.
pub const DEFAULT_TRAVERSE_DEPTH: usize = 5;
/// Largest traversal depth accepted.
pub const MAX_TRAVERSE_DEPTH: usize = 20;
/// Default traversal node ceiling.
pub const DEFAULT_TRAVERSE_NODES: usize = 100;
/// Largest traversal node ceiling accepted.
pub const MAX_TRAVERSE_NODES: usize = 500;

/// Default path search depth.
pub const DEFAULT_PATH_DEPTH: usize = 10;
/// Largest path search depth accepted.
pub const MAX_PATH_DEPTH: usize = 20;

/// Default impact analysis depth.
pub const DEFAULT_IMPACT_DEPTH: usize = 3;
/// Largest impact analysis depth accepted.
pub const MAX_IMPACT_DEPTH: usize = 10;
/// Default impact analysis node ceiling.
pub const DEFAULT_IMPACT_NODES: usize = 200;
/// Largest impact analysis node ceiling accepted.
pub const MAX_IMPACT_NODES: usize = 500;

/// Replace 0 with `default` and cap at `max`.
pub(crate) fn normalize(value: usize, default: usize, max: usize) -> usize {
    if value == 0 { default } else { value.min(max) }
}

/// Which adjacency list a traversal follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow relations from declarer to target (what does this use?)
    #[default]
    Forward,
    /// Follow relations from target back to declarer (what uses this?)
    Reverse,
}

/// Metadata of a graph node, taken from the first fact with that name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    /// `None` when the name only ever appeared as a relation target
    pub kind: Option<FactKind>,
    /// Source file
    pub file: String,
    /// Source line
    pub line: u32,
}

/// Parameters for [`GraphIndex::traverse`](super::GraphIndex::traverse).
///
/// Zero ceilings mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Direction to walk
    pub direction: Direction,
    /// Only follow relations of these kinds; empty follows all
    pub relation_kinds: Vec<RelationKind>,
    /// Only report nodes of these kinds; empty reports all
    pub node_kinds: Vec<FactKind>,
    /// Depth ceiling (default 5, max 20)
    pub max_depth: usize,
    /// Reported-node ceiling (default 100, max 500)
    pub max_nodes: usize,
}

/// A node reached by a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalNode {
    /// Node name
    pub name: String,
    /// Kind of the first fact with this name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FactKind>,
    /// Source file
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// Source line
    #[serde(skip_serializing_if = "is_zero")]
    pub line: u32,
    /// Shortest BFS distance from the start
    pub depth: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl TraversalNode {
    pub(crate) fn new(name: &str, meta: NodeMeta, depth: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: meta.kind,
            file: meta.file,
            line: meta.line,
            depth,
        }
    }

    /// Label used when summarising nodes by kind.
    #[must_use]
    pub fn kind_label(&self) -> &str {
        self.kind.as_ref().map_or("unknown", FactKind::as_str)
    }
}

/// An edge crossed by a traversal or path.
///
/// `from` is always the fact that declared the relation and `to` its
/// target, whichever direction the traversal walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalEdge {
    /// Declaring node
    pub from: String,
    /// Target node
    pub to: String,
    /// Relation kind
    pub kind: RelationKind,
    /// Whether the edge was derived from dependency facts
    #[serde(skip_serializing_if = "is_false")]
    pub synthetic: bool,
}

/// Counters describing a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    /// Nodes discovered and expanded, including ones hidden by the kind filter
    pub nodes_visited: usize,
    /// Edges crossed
    pub edges_traversed: usize,
    /// Deepest level a node was discovered at
    pub max_depth_reached: usize,
    /// Whether the node ceiling cut the traversal short
    pub truncated: bool,
}

/// Result of a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalResult {
    /// Start node
    pub start: String,
    /// Direction walked
    pub direction: Direction,
    /// Reported nodes in discovery order, start first
    pub nodes: Vec<TraversalNode>,
    /// Edges crossed, in the order they were crossed
    pub edges: Vec<TraversalEdge>,
    /// Counters
    pub stats: TraversalStats,
}

/// Result of a shortest-path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Source node
    pub from: String,
    /// Destination node
    pub to: String,
    /// Whether a path exists within the depth ceiling
    pub found: bool,
    /// Node names from `from` to `to`; empty when not found
    pub path: Vec<String>,
    /// One edge per hop
    pub edges: Vec<TraversalEdge>,
}

impl PathResult {
    pub(crate) fn not_found(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            found: false,
            path: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Number of hops; 0 for a trivial or missing path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

/// Parameters for [`GraphIndex::impact`](super::GraphIndex::impact).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactOptions {
    /// Depth ceiling (default 3, max 10)
    pub max_depth: usize,
    /// Node ceiling (default 200, max 500)
    pub max_nodes: usize,
    /// Also report what the target itself depends on
    pub include_forward: bool,
}

/// Result of a reverse-impact analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactResult {
    /// Node being analysed
    pub target: String,
    /// Number of dependents (the target itself excluded)
    pub total: usize,
    /// Dependents grouped by distance from the target
    pub by_depth: BTreeMap<usize, Vec<TraversalNode>>,
    /// One-line description of `by_depth`
    pub summary: String,
    /// The reverse traversal the buckets came from
    pub dependents: TraversalResult,
    /// Forward traversal from the target, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<TraversalResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 5)]
    #[case(1, 1)]
    #[case(20, 20)]
    #[case(21, 20)]
    fn normalize_defaults_and_clamps(#[case] value: usize, #[case] expected: usize) {
        assert_eq!(
            normalize(value, DEFAULT_TRAVERSE_DEPTH, MAX_TRAVERSE_DEPTH),
            expected
        );
    }

    #[test]
    fn dangling_node_is_labelled_unknown() {
        let node = TraversalNode::new("ghost", NodeMeta::default(), 1);
        assert_eq!(node.kind_label(), "unknown");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"name":"ghost","depth":1}"#);
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Reverse).unwrap(),
            "\"reverse\""
        );
    }
}
