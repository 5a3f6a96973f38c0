//! The routing/optimization core, §4.4–§4.5. `RouteSolver` is the seam a
//! second implementation (a proper multi-objective solver, Implementation
//! B) would plug into; only the always-available enumerating solver
//! (Implementation A) ships here, grounded on the teacher's Kelly
//! allocator's own three-stage shape — compute raw scores, clamp/normalize,
//! pick — generalized from a single-asset allocation to a path selection.

pub mod argmax;
pub mod enumerator;
pub mod weights;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::{Node, Route};

pub use argmax::{select_best, select_top_k, ScoredRoute};
pub use enumerator::EnumeratingSolver;
pub use weights::ObjectiveWeights;

/// A pluggable path-selection strategy over a fixed (from, to, notional)
/// query. Implementations read whatever graph state they need through
/// their own constructor-injected collaborators — the trait itself is
/// stateless about *how* candidates are produced.
#[async_trait]
pub trait RouteSolver: Send + Sync {
    /// Ranked top-K admissible paths, §4.4–§4.5. `k = 0` yielding an empty
    /// `Vec` is the caller's mistake to make, not this trait's to guard.
    async fn solve_top_k(
        &self,
        from: &Node,
        to: &Node,
        notional: f64,
        k: usize,
        weights: &ObjectiveWeights,
    ) -> CoreResult<Vec<ScoredRoute>>;

    /// Convenience wrapper over [`solve_top_k`](RouteSolver::solve_top_k)
    /// for callers that only need the single best route (e.g. the
    /// orchestrator's auto-reroute check).
    async fn solve(&self, from: &Node, to: &Node, notional: f64, weights: &ObjectiveWeights) -> CoreResult<Route> {
        let mut top = self.solve_top_k(from, to, notional, 1, weights).await?;
        Ok(top.remove(0).route)
    }
}
