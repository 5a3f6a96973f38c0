use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::edge::RouteSegment;
use super::node::Node;

/// An ordered sequence of edges e1..en such that to(ei) = from(ei+1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    pub segments: Vec<RouteSegment>,
}

impl Route {
    pub fn new(segments: Vec<RouteSegment>) -> Self {
        Route { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn source(&self) -> Option<&Node> {
        self.segments.first().map(|s| &s.from)
    }

    pub fn target(&self) -> Option<&Node> {
        self.segments.last().map(|s| &s.to)
    }

    pub fn providers(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.provider.as_str()).collect()
    }

    /// Walk the notional trajectory of §4.3 starting from `initial_notional`
    /// in the source asset. Returns `None` if any segment's input can't even
    /// cover its fixed fee (the path is infeasible and must be discarded).
    pub fn notional_trajectory(&self, initial_notional: f64) -> Option<Vec<f64>> {
        let mut amounts = Vec::with_capacity(self.segments.len());
        let mut current = initial_notional;
        for seg in &self.segments {
            if current <= seg.cost.fixed_fee {
                return None;
            }
            current = (current - seg.cost.fixed_fee)
                * (1.0 - seg.cost.fee_percent / 100.0)
                * seg.cost.effective_rate;
            amounts.push(current);
        }
        Some(amounts)
    }

    /// Aggregate metrics for this path applied to `initial_notional`, or
    /// `None` if the path is infeasible (§4.3).
    pub fn metrics(&self, initial_notional: f64) -> Option<PathMetrics> {
        if self.segments.is_empty() {
            return Some(PathMetrics {
                final_amount: initial_notional,
                cost_percent: 0.0,
                eta_hours: 0.0,
                reliability: 1.0,
            });
        }

        let trajectory = self.notional_trajectory(initial_notional)?;
        let final_amount = *trajectory.last().unwrap();

        let rate_product: f64 = self.segments.iter().map(|s| s.cost.effective_rate).product();
        let potential_output = initial_notional * rate_product;
        let cost_percent = if potential_output > 0.0 {
            100.0 * (1.0 - final_amount / potential_output)
        } else {
            0.0
        };

        let eta_hours: f64 = self
            .segments
            .iter()
            .map(|s| s.latency.mean_minutes() / 60.0)
            .sum();

        let reliability: f64 = self.segments.iter().map(|s| s.reliability_score).product();

        Some(PathMetrics { final_amount, cost_percent, eta_hours, reliability })
    }
}

/// Aggregate metrics for a route applied to a given initial notional (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathMetrics {
    pub final_amount: f64,
    pub cost_percent: f64,
    pub eta_hours: f64,
    pub reliability: f64,
}
