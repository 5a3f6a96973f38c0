//! The logical facade of §6: plain Rust functions over an
//! [`ExecutionOrchestrator`]/[`RouteSolver`] pair, with no wire encoding of
//! their own. A CLI or an RPC layer built on top of this crate would call
//! these directly and handle serialization itself — staying out of scope
//! here the same way the teacher keeps `engine`/`run` free of any
//! knowledge that `api::mod` will eventually wrap them in axum handlers.

use std::sync::Arc;

use crate::aggregator::EdgeBook;
use crate::error::CoreResult;
use crate::execution::ExecutionOrchestrator;
use crate::model::{Asset, ExecutionRecord, Node, RouteSegment};
use crate::solver::{ObjectiveWeights, RouteSolver, ScoredRoute};

/// All currently admissible edges, for callers inspecting the live book
/// directly (e.g. a debug endpoint).
pub async fn get_edges(book: &EdgeBook) -> Vec<RouteSegment> {
    book.snapshot().await
}

/// Ranked top-K admissible routes between two nodes at a given notional,
/// best first. `Err(CoreError::NoRouteFound)` when nothing admissible
/// exists within the hop budget.
pub async fn optimize_route(
    solver: &dyn RouteSolver,
    from: &Node,
    to: &Node,
    notional: f64,
    k: usize,
    weights: &ObjectiveWeights,
) -> CoreResult<Vec<ScoredRoute>> {
    solver.solve_top_k(from, to, notional, k, weights).await
}

/// Start executing a route, returning its execution id.
pub async fn execute_route(
    orchestrator: &Arc<ExecutionOrchestrator>,
    route: crate::model::Route,
    initial_amount: f64,
    from_asset: Asset,
    to_asset: Asset,
) -> String {
    orchestrator.execute_route(route, initial_amount, from_asset, to_asset).await
}

pub async fn get_execution_status(orchestrator: &ExecutionOrchestrator, execution_id: &str) -> CoreResult<ExecutionRecord> {
    orchestrator.get_status(execution_id).await
}

pub async fn pause_execution(orchestrator: &ExecutionOrchestrator, execution_id: &str) -> CoreResult<()> {
    orchestrator.pause(execution_id).await
}

pub async fn resume_execution(orchestrator: &Arc<ExecutionOrchestrator>, execution_id: &str) -> CoreResult<()> {
    orchestrator.resume(execution_id).await
}

pub async fn cancel_execution(orchestrator: &ExecutionOrchestrator, execution_id: &str) -> CoreResult<()> {
    orchestrator.cancel(execution_id).await
}

pub async fn reroute_execution(
    orchestrator: &ExecutionOrchestrator,
    execution_id: &str,
    new_route: crate::model::Route,
) -> CoreResult<()> {
    orchestrator.reroute(execution_id, new_route).await
}

pub async fn modify_transaction(
    orchestrator: &ExecutionOrchestrator,
    execution_id: &str,
    segment_index: usize,
    new_amount: f64,
) -> CoreResult<()> {
    orchestrator.modify_current_segment(execution_id, segment_index, new_amount).await
}
