//! Graph operations over the fact store.
//!
//! This module provides:
//! - The adjacency index ([`GraphIndex`]) derived from fact relations
//! - Breadth-first traversal in either direction (what does this use? what
//!   uses this?)
//! - Shortest forward path between two nodes
//! - Reverse impact analysis grouped by distance
//!
//! ## Design
//!
//! - Nodes are fact names. A name that only appears as a relation target is
//!   still a node, with empty metadata.
//! - The index is immutable once built; [`FactStore::rebuild_graph`] swaps
//!   in a new one.
//! - Depth and node ceilings are never errors: zero means the default and
//!   larger values are clamped.
//!
//! [`FactStore::rebuild_graph`]: crate::store::FactStore::rebuild_graph

mod impact;
mod index;
mod path;
mod traverse;
mod types;

pub use index::{AdjacentEdge, GraphIndex};
pub use types::{
    DEFAULT_IMPACT_DEPTH, DEFAULT_IMPACT_NODES, DEFAULT_PATH_DEPTH, DEFAULT_TRAVERSE_DEPTH,
    DEFAULT_TRAVERSE_NODES, Direction, ImpactOptions, ImpactResult, MAX_IMPACT_DEPTH,
    MAX_IMPACT_NODES, MAX_PATH_DEPTH, MAX_TRAVERSE_DEPTH, MAX_TRAVERSE_NODES, NodeMeta,
    PathResult, TraversalEdge, TraversalNode, TraversalOptions, TraversalResult, TraversalStats,
};
