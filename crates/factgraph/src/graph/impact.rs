//! Reverse impact analysis.

use super::GraphIndex;
use super::types::{
    DEFAULT_IMPACT_DEPTH, DEFAULT_IMPACT_NODES, Direction, ImpactOptions, ImpactResult,
    MAX_IMPACT_DEPTH, MAX_IMPACT_NODES, TraversalNode, TraversalOptions, normalize,
};
use std::collections::BTreeMap;

impl GraphIndex {
    /// Everything that transitively depends on `target`, grouped by distance.
    ///
    /// Runs a reverse traversal; the target itself (depth 0) is left out of
    /// the buckets and the total. With `include_forward`, a forward
    /// traversal using the same ceilings is attached as well.
    #[must_use]
    pub fn impact(&self, target: &str, options: &ImpactOptions) -> ImpactResult {
        let traversal = TraversalOptions {
            max_depth: normalize(options.max_depth, DEFAULT_IMPACT_DEPTH, MAX_IMPACT_DEPTH),
            max_nodes: normalize(options.max_nodes, DEFAULT_IMPACT_NODES, MAX_IMPACT_NODES),
            ..TraversalOptions::default()
        };

        let dependents = self.traverse(
            target,
            &TraversalOptions {
                direction: Direction::Reverse,
                ..traversal.clone()
            },
        );

        let mut by_depth: BTreeMap<usize, Vec<TraversalNode>> = BTreeMap::new();
        for node in dependents.nodes.iter().filter(|n| n.depth > 0) {
            by_depth.entry(node.depth).or_default().push(node.clone());
        }
        let total = by_depth.values().map(Vec::len).sum();
        let summary = summarize(total, &by_depth);

        let forward = options
            .include_forward
            .then(|| self.traverse(target, &traversal));

        tracing::debug!(target, total, "Computed impact set");
        ImpactResult {
            target: target.to_string(),
            total,
            by_depth,
            summary,
            dependents,
            forward,
        }
    }
}

/// One-line description such as
/// `3 dependents: depth 1: 2 modules, 1 symbol; depth 2: 1 route`.
fn summarize(total: usize, by_depth: &BTreeMap<usize, Vec<TraversalNode>>) -> String {
    if total == 0 {
        return "no dependents".to_string();
    }

    let depths: Vec<String> = by_depth
        .iter()
        .map(|(depth, nodes)| format!("depth {depth}: {}", count_kinds(nodes)))
        .collect();
    format!(
        "{total} {}: {}",
        plural("dependent", total),
        depths.join("; ")
    )
}

/// `2 modules, 1 symbol`, kinds in first-seen order.
fn count_kinds(nodes: &[TraversalNode]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for node in nodes {
        let label = node.kind_label();
        if let Some((_, count)) = counts.iter_mut().find(|(kind, _)| *kind == label) {
            *count += 1;
        } else {
            counts.push((label, 1));
        }
    }
    counts
        .iter()
        .map(|(kind, count)| format!("{count} {}", plural(kind, *count)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}
