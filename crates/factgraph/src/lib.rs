//! Factgraph - an indexed fact store and dependency graph for architectural
//! models of source repositories.
//!
//! Extractors describe a codebase as [`Fact`]s (modules, symbols, routes,
//! storage declarations, dependency records) with typed [`Relation`]s
//! between them. This crate stores and indexes those facts, derives a
//! forward/reverse graph from the relations, and answers traversal,
//! shortest-path, impact, and module-cycle questions over it.
//!
//! ```no_run
//! # async fn demo() -> factgraph::Result<()> {
//! use factgraph::{FactStore, TraversalOptions};
//!
//! let store = FactStore::open(".factgraph/facts.jsonl").await?;
//! let graph = store.rebuild_graph().await;
//! let reach = graph.traverse("internal/api", &TraversalOptions::default());
//! println!("{} nodes reachable", reach.nodes.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod model;
pub mod store;

// Public CLI module (needed by binary)
pub mod cli;

pub use cycles::{CycleDetector, CycleFinding, Evidence};
pub use error::{Error, Result};
pub use graph::{
    Direction, GraphIndex, ImpactOptions, ImpactResult, PathResult, TraversalOptions,
    TraversalResult,
};
pub use model::{Fact, FactKind, Relation, RelationKind};
pub use store::{FactFilter, FactStore, QueryOptions, QueryPage};
