pub mod profile;
pub mod retrying;
pub mod simulated;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::model::{RouteSegment, SegmentClass, SegmentOutcome};

pub use profile::{profile_for, ExecutionProfile};
pub use retrying::RetryingExecutor;
pub use simulated::SimulatedExecutor;

/// The capability-trait seam of §4.7: one object per segment class,
/// looked up from a dispatch table built once at orchestrator
/// construction — grounded on the teacher's `build_executors`, which
/// builds a `HashMap<NodeId, Box<dyn VenueExecutor>>` once per run rather
/// than constructing an executor per call.
#[async_trait]
pub trait SegmentExecutor: Send + Sync {
    /// Create, fund, and confirm one segment. Never returns `Err` for a
    /// segment-level failure — a failed segment is a `SegmentOutcome` with
    /// `status: Failed`, not a propagated error. `Err` is reserved for
    /// preconditions the orchestrator itself violated (e.g. calling
    /// execute twice on an already-terminal outcome).
    async fn execute(&self, segment: &RouteSegment, amount_in: f64) -> CoreResult<SegmentOutcome>;

    /// Cancel an in-flight (unconfirmed) transfer. Segment classes that
    /// cannot be cancelled once submitted return `PreconditionFailed`.
    async fn cancel(&self, segment: &RouteSegment, outcome: &SegmentOutcome) -> CoreResult<SegmentOutcome> {
        let _ = (segment, outcome);
        Err(CoreError::PreconditionFailed(format!(
            "{:?} segments cannot be cancelled once submitted",
            segment.segment_class
        )))
    }

    /// Change the amount of an in-flight transfer. The default is
    /// cancel-then-recreate (§4.7); classes that support an in-place
    /// amend override this.
    async fn modify(&self, segment: &RouteSegment, outcome: &SegmentOutcome, new_amount: f64) -> CoreResult<SegmentOutcome> {
        let cancelled = self.cancel(segment, outcome).await?;
        let _ = cancelled;
        self.execute(segment, new_amount).await
    }
}

/// Build one executor per segment class present in `classes`, all backed
/// by live `transport` calls.
pub fn build_live_executors(
    classes: &[SegmentClass],
    transport: Arc<dyn crate::collaborators::Transport>,
    credentials: Arc<dyn crate::collaborators::Credentials>,
) -> HashMap<SegmentClass, Arc<dyn SegmentExecutor>> {
    classes
        .iter()
        .map(|&class| {
            let executor: Arc<dyn SegmentExecutor> =
                Arc::new(RetryingExecutor::new(class, Arc::clone(&transport), Arc::clone(&credentials)));
            (class, executor)
        })
        .collect()
}

/// Build one simulated executor per segment class, for local runs and
/// tests where no real provider endpoint is reachable.
pub fn build_simulated_executors(classes: &[SegmentClass]) -> HashMap<SegmentClass, Arc<dyn SegmentExecutor>> {
    classes
        .iter()
        .map(|&class| {
            let executor: Arc<dyn SegmentExecutor> = Arc::new(SimulatedExecutor::new(class));
            (class, executor)
        })
        .collect()
}
