use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::node::Node;

/// The rail family a [`RouteSegment`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentClass {
    Fx,
    Crypto,
    Bridge,
    OnRamp,
    OffRamp,
    BankRail,
}

impl SegmentClass {
    /// Per-class default reliability when a provider does not report one (§4.1).
    pub fn default_reliability(self) -> f64 {
        match self {
            SegmentClass::Fx => 0.95,
            SegmentClass::BankRail => 0.98,
            SegmentClass::Crypto => 0.9,
            SegmentClass::Bridge => 0.88,
            SegmentClass::OnRamp | SegmentClass::OffRamp => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentClass::Fx => "fx",
            SegmentClass::Crypto => "crypto",
            SegmentClass::Bridge => "bridge",
            SegmentClass::OnRamp => "on_ramp",
            SegmentClass::OffRamp => "off_ramp",
            SegmentClass::BankRail => "bank_rail",
        }
    }
}

/// Proportional and fixed fee plus the multiplicative conversion rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cost {
    /// Percent of source notional, 0..=100.
    pub fee_percent: f64,
    /// Fixed fee in source-asset units, >= 0.
    pub fixed_fee: f64,
    /// Multiplicative conversion from 1 unit source to target, > 0.
    pub effective_rate: f64,
}

impl Cost {
    /// True iff fields satisfy the edge invariants of §3 (before a `RouteSegment`
    /// may enter the graph — see §8 boundary behaviors).
    pub fn is_valid(&self) -> bool {
        (0.0..=100.0).contains(&self.fee_percent)
            && self.fixed_fee >= 0.0
            && self.effective_rate > 0.0
    }
}

/// Inclusive settlement-time bounds, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Latency {
    pub min_minutes: f64,
    pub max_minutes: f64,
}

impl Latency {
    pub fn is_valid(&self) -> bool {
        0.0 <= self.min_minutes && self.min_minutes <= self.max_minutes
    }

    pub fn mean_minutes(&self) -> f64 {
        (self.min_minutes + self.max_minutes) / 2.0
    }
}

/// Provider-scoped constraint flags. Treated as an opaque map by routing
/// except for keys documented in §4.3.1 (regulatory jurisdiction tagging).
pub type Constraints = HashMap<String, serde_json::Value>;

/// The atomic unit of routing: one rail, one provider, one pair of nodes.
///
/// Edges are immutable once observed (§3) — updates are modeled by emitting
/// a new `RouteSegment` with a newer `observed_at`, never by mutating one
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteSegment {
    pub segment_class: SegmentClass,
    pub from: Node,
    pub to: Node,
    /// Opaque string identifying the data source, e.g. "frankfurter", "kraken".
    pub provider: String,
    pub cost: Cost,
    pub latency: Latency,
    /// Empirical success probability, 0..=1.
    pub reliability_score: f64,
    #[serde(default)]
    pub constraints: Constraints,
    /// Wall-clock timestamp from the clock collaborator, monotonic per
    /// (provider, from, to) — see the cache ordering guarantee in §4.2.
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

impl RouteSegment {
    /// The cache/edge-store key: (provider, from, to). At most one *current*
    /// edge exists per key (§3) — newer `observed_at` supersedes older.
    pub fn key(&self) -> (String, Node, Node) {
        (self.provider.clone(), self.from.clone(), self.to.clone())
    }

    /// Validity gate applied at normalization time (§8: "An edge with
    /// effective_rate <= 0 or fee_percent > 100 is rejected at normalization,
    /// never enters the graph").
    pub fn is_valid(&self) -> bool {
        self.cost.is_valid()
            && self.latency.is_valid()
            && (0.0..=1.0).contains(&self.reliability_score)
    }

    /// Jurisdiction tag read by the regulatory filter, if the provider
    /// attached one under the documented `jurisdiction_pair` constraint key.
    pub fn jurisdiction_pair(&self) -> Option<(String, String)> {
        let v = self.constraints.get("jurisdiction_pair")?;
        let arr = v.as_array()?;
        if arr.len() != 2 {
            return None;
        }
        Some((arr[0].as_str()?.to_string(), arr[1].as_str()?.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edge() -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "frankfurter".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 5.0, max_minutes: 10.0 },
            reliability_score: 0.95,
            constraints: Constraints::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn valid_edge_passes() {
        assert!(sample_edge().is_valid());
    }

    #[test]
    fn zero_or_negative_rate_is_rejected() {
        let mut e = sample_edge();
        e.cost.effective_rate = 0.0;
        assert!(!e.is_valid());
    }

    #[test]
    fn fee_percent_over_100_is_rejected() {
        let mut e = sample_edge();
        e.cost.fee_percent = 101.0;
        assert!(!e.is_valid());
    }
}
