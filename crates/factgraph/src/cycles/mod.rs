//! Module-level import cycle detection.
//!
//! The detector builds a directed graph whose nodes are `module` facts and
//! whose edges come from two places:
//!
//! - `dependency` facts: the edge runs from the directory containing the
//!   fact's file to each internal `imports` target, with relative targets
//!   resolved against that directory
//! - `imports` and `depends_on` relations declared directly on a module
//!
//! Edges whose source or target is not a known module are dropped. Every
//! strongly connected component with more than one member is reported as a
//! [`CycleFinding`]. A module importing itself is not a cycle.

mod classify;
mod tarjan;

pub use classify::{ImportClassifier, PathHeuristicClassifier};
pub use tarjan::strongly_connected_components;

use crate::model::{Fact, FactKind, RelationKind, containing_dir};
use classify::resolve_target;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A cyclic chain of module imports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleFinding {
    /// Short headline, e.g. "Import cycle between 3 modules"
    pub title: String,
    /// The cycle spelled out as `a -> b -> c -> a`
    pub description: String,
    /// Members in discovery order
    pub modules: Vec<String>,
    /// Members followed by the first member again
    pub path: Vec<String>,
    /// One entry per member
    pub evidence: Vec<Evidence>,
    /// Always 1.0; the analysis is exact
    pub confidence: f64,
}

/// Where a cycle member is declared and which other members it imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// Module name
    pub module: String,
    /// File of the module fact
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// Line of the module fact
    pub line: u32,
    /// e.g. "imports internal/store, internal/cache"
    pub detail: String,
}

/// Finds import cycles among modules.
pub struct CycleDetector {
    classifier: Box<dyn ImportClassifier>,
}

impl std::fmt::Debug for CycleDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleDetector").finish_non_exhaustive()
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    /// Detector using [`PathHeuristicClassifier`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(PathHeuristicClassifier)
    }

    /// Detector using a custom internal/external predicate.
    #[must_use]
    pub fn with_classifier(classifier: impl ImportClassifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Report every import cycle among the modules in `facts`.
    #[must_use]
    pub fn detect(&self, facts: &[Fact]) -> Vec<CycleFinding> {
        let modules = ModuleGraph::build(facts, self.classifier.as_ref());
        let findings: Vec<CycleFinding> = strongly_connected_components(&modules.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| modules.finding(component))
            .collect();

        tracing::debug!(
            modules = modules.graph.node_count(),
            edges = modules.graph.edge_count(),
            cycles = findings.len(),
            "Detected import cycles"
        );
        findings
    }
}

/// Module import graph plus the module facts the nodes came from.
struct ModuleGraph<'a> {
    graph: DiGraph<String, ()>,
    nodes: HashMap<&'a str, NodeIndex>,
    declared: HashMap<&'a str, &'a Fact>,
}

impl<'a> ModuleGraph<'a> {
    fn build(facts: &'a [Fact], classifier: &dyn ImportClassifier) -> Self {
        let mut modules = Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            declared: HashMap::new(),
        };

        for fact in facts {
            if fact.kind != FactKind::Module || fact.name.is_empty() {
                continue;
            }
            if modules.declared.contains_key(fact.name.as_str()) {
                continue;
            }
            modules.declared.insert(&fact.name, fact);
            let node = modules.graph.add_node(fact.name.clone());
            modules.nodes.insert(&fact.name, node);
        }

        for fact in facts {
            match fact.kind {
                FactKind::Module => {
                    for relation in &fact.relations {
                        if matches!(relation.kind, RelationKind::Imports | RelationKind::DependsOn) {
                            modules.connect(&fact.name, &relation.target);
                        }
                    }
                }
                FactKind::Dependency => {
                    let source = containing_dir(&fact.file);
                    for relation in fact.relations.iter().filter(|r| r.kind == RelationKind::Imports)
                    {
                        if !classifier.is_internal(&relation.target) {
                            continue;
                        }
                        if let Some(target) = resolve_target(source, &relation.target) {
                            modules.connect(source, &target);
                        }
                    }
                }
                _ => {}
            }
        }

        modules
    }

    fn connect(&mut self, from: &str, to: &str) {
        if let (Some(&a), Some(&b)) = (self.nodes.get(from), self.nodes.get(to)) {
            self.graph.update_edge(a, b, ());
        }
    }

    fn finding(&self, members: Vec<String>) -> CycleFinding {
        let member_set: HashSet<&str> = members.iter().map(String::as_str).collect();
        let evidence = members
            .iter()
            .map(|member| {
                let imported = self.imports_within(member, &member_set);
                let (file, line) = self
                    .declared
                    .get(member.as_str())
                    .map(|fact| (fact.file.clone(), fact.line))
                    .unwrap_or_default();
                Evidence {
                    module: member.clone(),
                    file,
                    line,
                    detail: format!("imports {}", imported.join(", ")),
                }
            })
            .collect();

        let mut path = members.clone();
        if let Some(first) = members.first() {
            path.push(first.clone());
        }

        CycleFinding {
            title: format!("Import cycle between {} modules", members.len()),
            description: format!("Modules import each other in a loop: {}", path.join(" -> ")),
            modules: members,
            path,
            evidence,
            confidence: 1.0,
        }
    }

    /// Other cycle members `module` imports, in edge insertion order.
    fn imports_within(&self, module: &str, members: &HashSet<&str>) -> Vec<&str> {
        let Some(&node) = self.nodes.get(module) else {
            return Vec::new();
        };
        let mut imported: Vec<&str> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n].as_str())
            .filter(|name| *name != module && members.contains(name))
            .collect();
        imported.reverse();
        imported
    }
}
