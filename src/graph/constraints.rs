use std::collections::HashMap;
use std::sync::Arc;

use crate::collaborators::RegulatoryConstraints;
use crate::model::{RouteSegment, SegmentClass};

/// Admissibility gate applied before an edge is allowed into the routing
/// graph, §4.3.1. Pruning happens here rather than after enumeration —
/// an inadmissible edge should never even be considered for a path, both
/// for correctness and so the hop budget isn't wasted walking dead ends.
#[derive(Clone)]
pub struct GraphConstraints {
    pub reliability_floor: f64,
    pub max_hops: usize,
    pub max_segments_per_class: Option<HashMap<SegmentClass, usize>>,
    pub regulatory: Arc<RegulatoryConstraints>,
}

impl GraphConstraints {
    pub fn new(reliability_floor: f64, max_hops: usize, regulatory: Arc<RegulatoryConstraints>) -> Self {
        GraphConstraints { reliability_floor, max_hops, max_segments_per_class: None, regulatory }
    }

    pub fn with_class_cap(mut self, class: SegmentClass, cap: usize) -> Self {
        self.max_segments_per_class.get_or_insert_with(HashMap::new).insert(class, cap);
        self
    }

    /// Reliability floor + regulatory check. Segment-class caps are a
    /// path-level property (how many segments of one class a single route
    /// may contain) and are enforced during enumeration instead, since they
    /// depend on what's already been walked.
    pub fn admits_edge(&self, segment: &RouteSegment) -> bool {
        if segment.reliability_score < self.reliability_floor {
            return false;
        }
        if let Some((from_j, to_j)) = segment.jurisdiction_pair() {
            if !self.regulatory.is_allowed(&from_j, &to_j, segment.segment_class) {
                return false;
            }
        }
        true
    }

    pub fn class_cap(&self, class: SegmentClass) -> Option<usize> {
        self.max_segments_per_class.as_ref().and_then(|m| m.get(&class).copied())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as Map;

    use crate::model::{Cost, Latency, Node};

    use super::*;

    fn segment(reliability: f64) -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "p".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: reliability,
            constraints: Map::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn below_floor_is_excluded() {
        let constraints = GraphConstraints::new(0.9, 4, Arc::new(RegulatoryConstraints::empty()));
        assert!(!constraints.admits_edge(&segment(0.8)));
        assert!(constraints.admits_edge(&segment(0.95)));
    }
}
