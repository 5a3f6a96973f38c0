use crate::model::{Node, RouteSegment};

/// Applied to every raw segment before it enters the cache (§3, §8:
/// "normalization is idempotent — normalizing an already-normalized edge
/// is a no-op"). Fills in a default reliability when the provider didn't
/// report one, normalizes asset/network spelling via `Node::new`, and
/// drops the segment entirely if it fails `RouteSegment::is_valid`.
pub fn normalize(mut segment: RouteSegment) -> Option<RouteSegment> {
    segment.from = Node::new(&segment.from.asset, segment.from.network.clone());
    segment.to = Node::new(&segment.to.asset, segment.to.network.clone());

    if segment.reliability_score <= 0.0 {
        segment.reliability_score = segment.segment_class.default_reliability();
    }

    if segment.is_valid() {
        Some(segment)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{Cost, Latency, SegmentClass};

    use super::*;

    fn raw() -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("usd"),
            to: Node::fiat("eur"),
            provider: "frankfurter".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 5.0, max_minutes: 10.0 },
            reliability_score: 0.0,
            constraints: HashMap::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn fills_in_default_reliability() {
        let normalized = normalize(raw()).unwrap();
        assert_eq!(normalized.reliability_score, SegmentClass::Fx.default_reliability());
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize(raw()).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_edge_is_dropped() {
        let mut edge = raw();
        edge.cost.effective_rate = 0.0;
        assert!(normalize(edge).is_none());
    }
}
