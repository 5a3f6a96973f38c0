use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::{RouteSegment, SegmentClass, SegmentOutcome, SegmentStatus};

use super::profile::{profile_for, ExecutionProfile};
use super::SegmentExecutor;

/// Deterministic, no-network executor for local runs and tests: applies
/// the segment's own cost model to compute `amount_out` and confirms
/// immediately. This is what the CLI's default (non-`--live`) mode runs,
/// mirroring the teacher's `run::executor::stub::StubExecutor`.
pub struct SimulatedExecutor {
    profile: ExecutionProfile,
}

impl SimulatedExecutor {
    pub fn new(segment_class: SegmentClass) -> Self {
        SimulatedExecutor { profile: profile_for(segment_class) }
    }
}

#[async_trait]
impl SegmentExecutor for SimulatedExecutor {
    async fn execute(&self, segment: &RouteSegment, amount_in: f64) -> CoreResult<SegmentOutcome> {
        if amount_in <= segment.cost.fixed_fee {
            return Ok(SegmentOutcome {
                provider_txn_id: None,
                status: SegmentStatus::Failed,
                amount_in,
                amount_out: 0.0,
                fees_paid: 0.0,
                attempts: 1,
                error: Some("input amount does not cover the fixed fee".into()),
                confirmed_at: None,
            });
        }

        let after_fixed = amount_in - segment.cost.fixed_fee;
        let after_percent = after_fixed * (1.0 - segment.cost.fee_percent / 100.0);
        let amount_out = after_percent * segment.cost.effective_rate;
        let fees_paid = amount_in - after_percent;

        Ok(SegmentOutcome {
            provider_txn_id: Some(format!("sim-{}-{}", segment.provider, uuid::Uuid::new_v4())),
            status: SegmentStatus::Succeeded,
            amount_in,
            amount_out,
            fees_paid,
            attempts: 1,
            error: None,
            confirmed_at: Some(chrono::Utc::now()),
        })
    }

    async fn cancel(&self, segment: &RouteSegment, outcome: &SegmentOutcome) -> CoreResult<SegmentOutcome> {
        if !self.profile.supports_cancel {
            return Err(crate::error::CoreError::PreconditionFailed(format!(
                "{:?} segments cannot be cancelled once submitted",
                segment.segment_class
            )));
        }
        Ok(SegmentOutcome {
            provider_txn_id: outcome.provider_txn_id.clone(),
            status: SegmentStatus::Cancelled,
            amount_in: outcome.amount_in,
            amount_out: 0.0,
            fees_paid: 0.0,
            attempts: outcome.attempts,
            error: None,
            confirmed_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{Cost, Latency, Node};

    use super::*;

    fn segment() -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "frankfurter".into(),
            cost: Cost { fee_percent: 1.0, fixed_fee: 1.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: 0.95,
            constraints: HashMap::new(),
            observed_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn succeeds_and_applies_the_cost_model() {
        let executor = SimulatedExecutor::new(SegmentClass::Fx);
        let outcome = executor.execute(&segment(), 100.0).await.unwrap();
        assert_eq!(outcome.status, SegmentStatus::Succeeded);
        let expected = (100.0 - 1.0) * 0.99 * 0.85;
        assert!((outcome.amount_out - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn insufficient_amount_fails_without_an_error_propagating() {
        let executor = SimulatedExecutor::new(SegmentClass::Fx);
        let outcome = executor.execute(&segment(), 0.5).await.unwrap();
        assert_eq!(outcome.status, SegmentStatus::Failed);
    }
}
