/// Multi-objective weights for the ArgMax scorer, §4.5. Callers are not
/// required to normalize these to sum to 1 — the scorer only compares
/// scores against each other within one solve call, so a consistent scale
/// is all that matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    pub cost_weight: f64,
    pub eta_weight: f64,
    pub reliability_weight: f64,
}

impl ObjectiveWeights {
    pub fn new(cost_weight: f64, eta_weight: f64, reliability_weight: f64) -> Self {
        ObjectiveWeights { cost_weight, eta_weight, reliability_weight }
    }

    /// The §4.4 default triple (α=0.5, β=0.3, γ=0.2): cost matters most,
    /// then speed, then reliability.
    pub fn cost_first() -> Self {
        ObjectiveWeights { cost_weight: 0.5, eta_weight: 0.3, reliability_weight: 0.2 }
    }
}
