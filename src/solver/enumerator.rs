use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::aggregator::EdgeBook;
use crate::collaborators::Cache;
use crate::error::{CoreError, CoreResult};
use crate::graph::{enumerate_routes, CorridorGraph, GraphConstraints};
use crate::model::{Node, Route};

use super::argmax::{select_top_k, ScoredRoute};
use super::weights::ObjectiveWeights;
use super::RouteSolver;

const SOLVE_CACHE_TTL: Duration = Duration::from_secs(5);

/// Implementation A, §4.4: enumerate every admissible simple path up to
/// the configured hop budget, score each with the ArgMax selector, return
/// the winner. Always available — the fallback every deployment ships
/// with, the counterpart of the teacher's `engine::optimizer` always
/// running even when a more sophisticated allocator might exist elsewhere.
pub struct EnumeratingSolver {
    book: Arc<EdgeBook>,
    constraints: GraphConstraints,
    cache: Arc<dyn Cache>,
}

impl EnumeratingSolver {
    pub fn new(book: Arc<EdgeBook>, constraints: GraphConstraints, cache: Arc<dyn Cache>) -> Self {
        EnumeratingSolver { book, constraints, cache }
    }

    fn cache_key(from: &Node, to: &Node, notional: f64, k: usize, weights: &ObjectiveWeights) -> String {
        format!(
            "{}|{}|{:.4}|{}|{:.3}|{:.3}|{:.3}",
            from, to, notional, k, weights.cost_weight, weights.eta_weight, weights.reliability_weight
        )
    }

    /// When enumeration comes back empty, §8 scenario 4 asks for a
    /// specific `below_reliability_floor` reason rather than a generic
    /// one — distinguish it by re-enumerating with the floor relaxed to
    /// zero and checking whether that alone would have produced a path.
    fn diagnose_empty_result(&self, edges: Vec<crate::model::RouteSegment>, from: &Node, to: &Node) -> String {
        if self.constraints.reliability_floor > 0.0 {
            let relaxed = GraphConstraints { reliability_floor: 0.0, ..self.constraints.clone() };
            let relaxed_graph = CorridorGraph::build(edges, &relaxed);
            if !enumerate_routes(&relaxed_graph, from, to, &relaxed).is_empty() {
                return "below_reliability_floor".into();
            }
        }
        "no admissible path within the hop budget".into()
    }
}

#[async_trait]
impl RouteSolver for EnumeratingSolver {
    async fn solve_top_k(
        &self,
        from: &Node,
        to: &Node,
        notional: f64,
        k: usize,
        weights: &ObjectiveWeights,
    ) -> CoreResult<Vec<ScoredRoute>> {
        if notional <= 0.0 {
            return Err(CoreError::Validation("notional must be positive".into()));
        }

        let cache_key = Self::cache_key(from, to, notional, k, weights);
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(scored) = serde_json::from_slice::<Vec<(Route, f64)>>(&cached) {
                return Ok(scored
                    .into_iter()
                    .filter_map(|(route, score)| {
                        let metrics = route.metrics(notional)?;
                        Some(ScoredRoute { route, metrics, score })
                    })
                    .collect());
            }
        }

        let edges = self.book.snapshot().await;
        let graph = CorridorGraph::build(edges.clone(), &self.constraints);
        let candidates = enumerate_routes(&graph, from, to, &self.constraints);

        let scored_candidates: Vec<_> = candidates
            .into_iter()
            .filter_map(|route| {
                let metrics = route.metrics(notional)?;
                Some((route, metrics))
            })
            .collect();

        let top = select_top_k(scored_candidates, weights, k);
        if top.is_empty() {
            let reason = self.diagnose_empty_result(edges, from, to);
            return Err(CoreError::NoRouteFound { from: from.to_string(), to: to.to_string(), reason });
        }

        let to_cache: Vec<(&Route, f64)> = top.iter().map(|s| (&s.route, s.score)).collect();
        if let Ok(bytes) = serde_json::to_vec(&to_cache) {
            self.cache.set(cache_key, bytes, SOLVE_CACHE_TTL).await;
        }

        Ok(top)
    }
}
