use crate::model::{PathMetrics, Route};

use super::weights::ObjectiveWeights;

const TIE_EPSILON: f64 = 1e-9;

/// A candidate route together with its computed metrics and composite
/// score. Scores are only meaningful relative to the other candidates
/// passed to the same [`select_best`] call — they are not calibrated
/// across calls.
#[derive(Debug, Clone)]
pub struct ScoredRoute {
    pub route: Route,
    pub metrics: PathMetrics,
    pub score: f64,
}

/// Min-max normalize `values` so the best value maps to 1.0 and the worst
/// to 0.0. `lower_is_better` selects the direction. A degenerate set
/// (every candidate tied) normalizes every entry to 1.0 — in that case no
/// candidate is actually penalized by this dimension.
fn normalize(values: &[f64], lower_is_better: bool) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < TIE_EPSILON {
        return vec![1.0; values.len()];
    }
    values
        .iter()
        .map(|&v| if lower_is_better { (max - v) / (max - min) } else { (v - min) / (max - min) })
        .collect()
}

/// Score and rank every (route, metrics) candidate against the notional
/// it was computed for, per §4.5's normalization + weighted-sum formula.
/// Returns `None` for an empty candidate set — the caller turns that into
/// `CoreError::NoRouteFound`.
pub fn select_best(candidates: Vec<(Route, PathMetrics)>, weights: &ObjectiveWeights) -> Option<ScoredRoute> {
    rank(candidates, weights).into_iter().next()
}

/// Full top-K selection, §4.4-§4.5: normalize every candidate's metrics
/// against the candidate set, score, sort best-first, and keep the first
/// `k`. `k = 0` is nonsensical for a caller but handled as "no candidates
/// wanted" rather than panicking.
pub fn select_top_k(candidates: Vec<(Route, PathMetrics)>, weights: &ObjectiveWeights, k: usize) -> Vec<ScoredRoute> {
    let mut ranked = rank(candidates, weights);
    ranked.truncate(k);
    ranked
}

/// Score every candidate and sort best-first; shared by [`select_best`]
/// and [`select_top_k`] so both apply the identical normalization pass
/// over the same candidate set rather than normalizing twice
/// inconsistently (e.g. against a single-candidate slice).
fn rank(candidates: Vec<(Route, PathMetrics)>, weights: &ObjectiveWeights) -> Vec<ScoredRoute> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let cost_values: Vec<f64> = candidates.iter().map(|(_, m)| m.cost_percent).collect();
    let eta_values: Vec<f64> = candidates.iter().map(|(_, m)| m.eta_hours).collect();
    let reliability_values: Vec<f64> = candidates.iter().map(|(_, m)| m.reliability).collect();

    let cost_norm = normalize(&cost_values, true);
    let eta_norm = normalize(&eta_values, true);
    let reliability_norm = normalize(&reliability_values, false);

    let mut scored: Vec<ScoredRoute> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, (route, metrics))| {
            let score = weights.cost_weight * cost_norm[i]
                + weights.eta_weight * eta_norm[i]
                + weights.reliability_weight * reliability_norm[i];
            ScoredRoute { route, metrics, score }
        })
        .collect();

    scored.sort_by(cmp_candidates);
    scored
}

/// Best-first ordering with the §4.3/§4.5 tie-break chain: scores within
/// `TIE_EPSILON` are broken by fewer hops, then higher reliability, then
/// lexicographic provider chain — the last step exists purely so repeated
/// solves over identical input are deterministic, never to express a real
/// preference.
fn cmp_candidates(a: &ScoredRoute, b: &ScoredRoute) -> std::cmp::Ordering {
    if (a.score - b.score).abs() >= TIE_EPSILON {
        return b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal);
    }
    if a.route.len() != b.route.len() {
        return a.route.len().cmp(&b.route.len());
    }
    if (a.metrics.reliability - b.metrics.reliability).abs() >= TIE_EPSILON {
        return b.metrics.reliability.partial_cmp(&a.metrics.reliability).unwrap_or(std::cmp::Ordering::Equal);
    }
    a.route.providers().join(">").cmp(&b.route.providers().join(">"))
}

#[cfg(test)]
mod tests {
    use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

    use super::*;

    fn route_with(cost_percent: f64, eta_hours: f64, reliability: f64) -> (Route, PathMetrics) {
        let segment = RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "p".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 0.0, max_minutes: 0.0 },
            reliability_score: 0.95,
            constraints: Default::default(),
            observed_at: chrono::Utc::now(),
        };
        (Route::new(vec![segment]), PathMetrics { final_amount: 850.0, cost_percent, eta_hours, reliability })
    }

    #[test]
    fn prefers_the_cheaper_route_under_cost_first_weights() {
        let candidates = vec![route_with(0.5, 1.0, 0.9), route_with(2.0, 1.0, 0.9)];
        let best = select_best(candidates, &ObjectiveWeights::cost_first()).unwrap();
        assert!((best.metrics.cost_percent - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ties_break_on_reliability_when_hop_counts_match() {
        let weights = ObjectiveWeights::new(1.0, 0.0, 0.0);
        let candidates = vec![route_with(1.0, 1.0, 0.80), route_with(1.0, 1.0, 0.95)];
        let best = select_best(candidates, &weights).unwrap();
        assert!((best.metrics.reliability - 0.95).abs() < 1e-9);
    }

    #[test]
    fn fewer_hops_beats_higher_reliability_on_a_tied_score() {
        let weights = ObjectiveWeights::new(1.0, 0.0, 0.0);
        let one_hop = route_with(1.0, 1.0, 0.80);
        let mut two_hop = route_with(1.0, 1.0, 0.90);
        two_hop.0.segments.push(two_hop.0.segments[0].clone());

        let best = select_best(vec![one_hop, two_hop], &weights).unwrap();
        assert_eq!(best.route.len(), 1, "the fewer-hop route must win a score tie even at lower reliability");
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        assert!(select_best(vec![], &ObjectiveWeights::cost_first()).is_none());
    }
}
