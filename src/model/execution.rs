use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::node::Asset;
use super::route::Route;

/// Execution states and legal transitions, §4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Pending,
    Running,
    Paused,
    Cancelling,
    Rerouting,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Terminal states never accept further transitions (§8, invariant 3).
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionState::Completed | ExecutionState::Failed | ExecutionState::Cancelled)
    }
}

/// Per-segment terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    Skipped,
    Succeeded,
    Failed,
    Cancelled,
}

/// Per-segment outcome record, one entry per route segment index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentOutcome {
    pub provider_txn_id: Option<String>,
    pub status: SegmentStatus,
    pub amount_in: f64,
    pub amount_out: f64,
    pub fees_paid: f64,
    pub attempts: u32,
    pub error: Option<String>,
    pub confirmed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SegmentOutcome {
    pub fn pending(amount_in: f64) -> Self {
        SegmentOutcome {
            provider_txn_id: None,
            status: SegmentStatus::Skipped,
            amount_in,
            amount_out: 0.0,
            fees_paid: 0.0,
            attempts: 0,
            error: None,
            confirmed_at: None,
        }
    }
}

/// Created per `execute()` call; owned exclusively by the orchestrator (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub route: Route,
    /// Index of the next segment to execute; strictly non-decreasing except
    /// at reroute, which may reset it to the new route's current position.
    pub current_index: usize,
    pub state: ExecutionState,
    pub segment_outcomes: Vec<SegmentOutcome>,
    pub final_amount: f64,
    pub from_asset: Asset,
    pub to_asset: Asset,
}

impl ExecutionRecord {
    pub fn new(execution_id: String, route: Route, initial_amount: f64, from_asset: Asset, to_asset: Asset) -> Self {
        let segment_outcomes = route
            .segments
            .iter()
            .map(|_| SegmentOutcome::pending(initial_amount))
            .collect();
        ExecutionRecord {
            execution_id,
            route,
            current_index: 0,
            state: ExecutionState::Pending,
            segment_outcomes,
            final_amount: initial_amount,
            from_asset,
            to_asset,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
