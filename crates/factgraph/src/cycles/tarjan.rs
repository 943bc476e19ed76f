//! Tarjan's strongly connected components, without recursion.
//!
//! `petgraph::algo::tarjan_scc` is not used here: it makes no promise about
//! member order inside a component, while cycle findings list members in
//! discovery order and components in completion order, with roots and
//! neighbours tried in insertion order.

use petgraph::graph::{DiGraph, NodeIndex};

/// A node whose neighbours are still being explored.
struct Frame {
    node: NodeIndex,
    neighbours: Vec<NodeIndex>,
    next: usize,
}

/// Per-node bookkeeping. `index` is `None` until the node is first visited.
struct Visit {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeIndex>,
    counter: usize,
}

impl Visit {
    fn enter(&mut self, graph: &DiGraph<String, ()>, node: NodeIndex) -> Frame {
        let slot = node.index();
        self.index[slot] = Some(self.counter);
        self.lowlink[slot] = self.counter;
        self.counter += 1;
        self.stack.push(node);
        self.on_stack[slot] = true;

        // petgraph yields neighbours newest-first
        let mut neighbours: Vec<NodeIndex> = graph.neighbors(node).collect();
        neighbours.reverse();
        Frame {
            node,
            neighbours,
            next: 0,
        }
    }

    fn pop_component(&mut self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member.index()] = false;
            component.push(member);
            if member == root {
                break;
            }
        }
        component.reverse();
        component
    }
}

/// Every strongly connected component of `graph`, singletons included.
///
/// Components are returned in the order they are completed. Members of a
/// component are listed in the order the search discovered them, so the
/// first member is the one the search entered the component through.
/// Roots are tried in node insertion order, and each node's edges in edge
/// insertion order, which makes the output deterministic for a given graph.
#[must_use]
pub fn strongly_connected_components(graph: &DiGraph<String, ()>) -> Vec<Vec<String>> {
    let size = graph.node_count();
    let mut visit = Visit {
        index: vec![None; size],
        lowlink: vec![0; size],
        on_stack: vec![false; size],
        stack: Vec::new(),
        counter: 0,
    };
    let mut components = Vec::new();

    for root in graph.node_indices() {
        if visit.index[root.index()].is_some() {
            continue;
        }

        let mut calls = vec![visit.enter(graph, root)];
        while let Some(frame) = calls.last_mut() {
            let node = frame.node;
            if let Some(&next) = frame.neighbours.get(frame.next) {
                frame.next += 1;
                match visit.index[next.index()] {
                    None => {
                        let child = visit.enter(graph, next);
                        calls.push(child);
                    }
                    Some(next_index) if visit.on_stack[next.index()] => {
                        let low = &mut visit.lowlink[node.index()];
                        *low = (*low).min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            calls.pop();
            let low = visit.lowlink[node.index()];
            if let Some(parent) = calls.last() {
                let parent_low = &mut visit.lowlink[parent.node.index()];
                *parent_low = (*parent_low).min(low);
            }
            if Some(low) == visit.index[node.index()] {
                let members = visit.pop_component(node);
                components.push(members.into_iter().map(|n| graph[n].clone()).collect());
            }
        }
    }

    components
}
