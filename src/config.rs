use std::collections::HashMap;
use std::time::Duration;

use crate::model::SegmentClass;
use crate::solver::ObjectiveWeights;

/// Whether segment execution hits real provider endpoints or runs the
/// deterministic in-process simulation. Grounded on the teacher's
/// `RuntimeConfig`, which gates live on-chain execution behind an
/// explicit flag rather than inferring it from environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Simulated,
    Live,
}

/// Top-level tunables for a running instance, §6. Everything here has a
/// sane default so a caller can start from `RuntimeConfig::default()` and
/// override only what they need, the same shape as the teacher's
/// `RuntimeConfig::from_cli`.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub execution_mode: ExecutionMode,
    pub objective_weights: ObjectiveWeights,
    pub max_hops: usize,
    pub reliability_floor: f64,
    pub execution_history_cap: usize,
    pub per_provider_timeout: HashMap<String, Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            execution_mode: ExecutionMode::Simulated,
            objective_weights: ObjectiveWeights::cost_first(),
            max_hops: 5,
            reliability_floor: 0.5,
            execution_history_cap: 256,
            per_provider_timeout: HashMap::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn provider_timeout(&self, provider: &str, default: Duration) -> Duration {
        self.per_provider_timeout.get(provider).copied().unwrap_or(default)
    }

    pub fn enabled_segment_classes() -> [SegmentClass; 6] {
        [
            SegmentClass::Fx,
            SegmentClass::Crypto,
            SegmentClass::Bridge,
            SegmentClass::OnRamp,
            SegmentClass::OffRamp,
            SegmentClass::BankRail,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_simulated_and_cost_first() {
        let config = RuntimeConfig::default();
        assert_eq!(config.execution_mode, ExecutionMode::Simulated);
        assert_eq!(config.objective_weights, ObjectiveWeights::cost_first());
    }

    #[test]
    fn per_provider_timeout_falls_back_to_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.provider_timeout("kraken", Duration::from_secs(2)), Duration::from_secs(2));
    }
}
