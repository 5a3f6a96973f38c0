use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::model::{Node, RouteSegment};

type EdgeKey = (String, Node, Node);

/// The hot-path read side of §4.2: the most-recently-observed `RouteSegment`
/// per (provider, from, to) key. Newer `observed_at` always wins — a
/// provider's stale response arriving after a fresher one (out-of-order
/// completion under concurrent fan-out) must never regress the book.
#[derive(Default)]
pub struct EdgeBook {
    edges: RwLock<HashMap<EdgeKey, RouteSegment>>,
}

impl EdgeBook {
    pub fn new() -> Self {
        EdgeBook { edges: RwLock::new(HashMap::new()) }
    }

    /// Applies the segment if it is newer than whatever is currently keyed
    /// under its (provider, from, to). Returns `true` if applied.
    pub async fn upsert(&self, segment: RouteSegment) -> bool {
        let key = segment.key();
        let mut edges = self.edges.write().await;
        match edges.get(&key) {
            Some(existing) if existing.observed_at >= segment.observed_at => false,
            _ => {
                edges.insert(key, segment);
                true
            }
        }
    }

    /// All currently held edges, a point-in-time clone suitable for the
    /// graph builder to consume without holding the lock across `.await`.
    pub async fn snapshot(&self) -> Vec<RouteSegment> {
        self.edges.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.edges.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as Map;

    use crate::model::{Cost, Latency, SegmentClass};

    use super::*;

    fn seg(rate: f64, observed_at: chrono::DateTime<chrono::Utc>) -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "frankfurter".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: rate },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: 0.95,
            constraints: Map::new(),
            observed_at,
        }
    }

    #[tokio::test]
    async fn newer_observation_replaces_older() {
        let book = EdgeBook::new();
        let t0 = chrono::Utc::now();
        let t1 = t0 + chrono::Duration::seconds(10);

        assert!(book.upsert(seg(0.85, t0)).await);
        assert!(book.upsert(seg(0.90, t1)).await);

        let snapshot = book.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].cost.effective_rate, 0.90);
    }

    #[tokio::test]
    async fn out_of_order_stale_observation_is_rejected() {
        let book = EdgeBook::new();
        let t0 = chrono::Utc::now();
        let t1 = t0 + chrono::Duration::seconds(10);

        assert!(book.upsert(seg(0.90, t1)).await);
        assert!(!book.upsert(seg(0.85, t0)).await);

        let snapshot = book.snapshot().await;
        assert_eq!(snapshot[0].cost.effective_rate, 0.90);
    }
}
