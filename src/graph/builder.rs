use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::{Node, RouteSegment};

use super::constraints::GraphConstraints;

/// A directed multigraph of corridors: nodes are (asset, network) pairs,
/// edges are admissible `RouteSegment`s. Parallel edges between the same
/// node pair (two providers quoting the same corridor) are both kept —
/// `petgraph::graph::DiGraph` supports multi-edges natively, the same way
/// the teacher's `engine::topo` builds one `DiGraph` per deploy pass
/// rather than collapsing parallel dependencies.
pub struct CorridorGraph {
    pub(crate) graph: DiGraph<Node, RouteSegment>,
    pub(crate) index: HashMap<Node, NodeIndex>,
}

impl CorridorGraph {
    /// Filters `edges` through `constraints` and builds the graph from
    /// what survives. Nodes are created lazily as their first incident
    /// edge is added.
    pub fn build(edges: Vec<RouteSegment>, constraints: &GraphConstraints) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<Node, NodeIndex> = HashMap::new();

        let mut get_or_insert = |graph: &mut DiGraph<Node, RouteSegment>, index: &mut HashMap<Node, NodeIndex>, node: &Node| -> NodeIndex {
            if let Some(&idx) = index.get(node) {
                return idx;
            }
            let idx = graph.add_node(node.clone());
            index.insert(node.clone(), idx);
            idx
        };

        for edge in edges {
            if !constraints.admits_edge(&edge) {
                continue;
            }
            let from_idx = get_or_insert(&mut graph, &mut index, &edge.from);
            let to_idx = get_or_insert(&mut graph, &mut index, &edge.to);
            graph.add_edge(from_idx, to_idx, edge);
        }

        CorridorGraph { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.index.contains_key(node)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as Map;
    use std::sync::Arc;

    use crate::collaborators::RegulatoryConstraints;
    use crate::model::{Cost, Latency, SegmentClass};

    use super::*;

    fn fx(from: &str, to: &str) -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat(from),
            to: Node::fiat(to),
            provider: "p".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: 0.95,
            constraints: Map::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn builds_nodes_and_edges_from_admissible_segments() {
        let constraints = GraphConstraints::new(0.0, 4, Arc::new(RegulatoryConstraints::empty()));
        let graph = CorridorGraph::build(vec![fx("USD", "EUR"), fx("EUR", "GBP")], &constraints);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn inadmissible_edge_is_excluded_from_the_graph() {
        let constraints = GraphConstraints::new(0.99, 4, Arc::new(RegulatoryConstraints::empty()));
        let graph = CorridorGraph::build(vec![fx("USD", "EUR")], &constraints);
        assert_eq!(graph.edge_count(), 0);
    }
}
