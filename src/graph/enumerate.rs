use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::model::{Node, Route, RouteSegment, SegmentClass};

use super::builder::CorridorGraph;
use super::constraints::GraphConstraints;

/// Enumerate every simple path (no repeated node) from `source` to `target`
/// with at most `constraints.max_hops` edges, §4.3. Walks edges rather than
/// `petgraph::algo::all_simple_paths`'s node sequences, because two
/// providers quoting the same node pair are two distinct paths here, not
/// one — a plain node-path walk would silently collapse them to whichever
/// parallel edge petgraph visits first.
pub fn enumerate_routes(graph: &CorridorGraph, source: &Node, target: &Node, constraints: &GraphConstraints) -> Vec<Route> {
    let (Some(&source_idx), Some(&target_idx)) = (graph.index.get(source), graph.index.get(target)) else {
        return Vec::new();
    };

    if constraints.max_hops == 0 {
        return Vec::new();
    }

    let mut routes = Vec::new();
    let mut visited = vec![source_idx];
    let mut path = Vec::new();
    let mut class_counts: HashMap<SegmentClass, usize> = HashMap::new();

    walk(
        graph,
        source_idx,
        target_idx,
        constraints,
        &mut visited,
        &mut path,
        &mut class_counts,
        &mut routes,
    );

    routes
}

#[allow(clippy::too_many_arguments)]
fn walk(
    graph: &CorridorGraph,
    current: NodeIndex,
    target: NodeIndex,
    constraints: &GraphConstraints,
    visited: &mut Vec<NodeIndex>,
    path: &mut Vec<RouteSegment>,
    class_counts: &mut HashMap<SegmentClass, usize>,
    routes: &mut Vec<Route>,
) {
    if path.len() as u32 >= constraints.max_hops as u32 {
        return;
    }

    for edge_ref in graph.graph.edges_directed(current, Direction::Outgoing) {
        let segment = edge_ref.weight();
        let next = edge_ref.target();

        if visited.contains(&next) {
            continue;
        }
        if let Some(cap) = constraints.class_cap(segment.segment_class) {
            let used = class_counts.get(&segment.segment_class).copied().unwrap_or(0);
            if used >= cap {
                continue;
            }
        }

        path.push(segment.clone());
        visited.push(next);
        *class_counts.entry(segment.segment_class).or_insert(0) += 1;

        if next == target {
            routes.push(Route::new(path.clone()));
        }
        walk(graph, next, target, constraints, visited, path, class_counts, routes);

        *class_counts.get_mut(&segment.segment_class).unwrap() -= 1;
        visited.pop();
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as Map;
    use std::sync::Arc;

    use crate::collaborators::RegulatoryConstraints;
    use crate::model::{Cost, Latency};

    use super::*;

    fn fx(from: &str, to: &str, provider: &str) -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat(from),
            to: Node::fiat(to),
            provider: provider.into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: 0.95,
            constraints: Map::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn finds_direct_and_two_hop_paths() {
        let constraints = GraphConstraints::new(0.0, 3, Arc::new(RegulatoryConstraints::empty()));
        let edges = vec![fx("USD", "EUR", "a"), fx("USD", "GBP", "b"), fx("GBP", "EUR", "c")];
        let graph = CorridorGraph::build(edges, &constraints);

        let routes = enumerate_routes(&graph, &Node::fiat("USD"), &Node::fiat("EUR"), &constraints);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn parallel_providers_on_same_pair_are_both_enumerated() {
        let constraints = GraphConstraints::new(0.0, 1, Arc::new(RegulatoryConstraints::empty()));
        let edges = vec![fx("USD", "EUR", "a"), fx("USD", "EUR", "b")];
        let graph = CorridorGraph::build(edges, &constraints);

        let routes = enumerate_routes(&graph, &Node::fiat("USD"), &Node::fiat("EUR"), &constraints);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn max_hops_zero_yields_no_routes() {
        let constraints = GraphConstraints::new(0.0, 0, Arc::new(RegulatoryConstraints::empty()));
        let edges = vec![fx("USD", "EUR", "a")];
        let graph = CorridorGraph::build(edges, &constraints);
        assert!(enumerate_routes(&graph, &Node::fiat("USD"), &Node::fiat("EUR"), &constraints).is_empty());
    }

    #[test]
    fn unknown_node_yields_no_routes() {
        let constraints = GraphConstraints::new(0.0, 3, Arc::new(RegulatoryConstraints::empty()));
        let graph = CorridorGraph::build(vec![fx("USD", "EUR", "a")], &constraints);
        assert!(enumerate_routes(&graph, &Node::fiat("USD"), &Node::fiat("JPY"), &constraints).is_empty());
    }
}
