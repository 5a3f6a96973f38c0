use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::model::node::Asset;
use crate::model::{ExecutionRecord, ExecutionState, Route, SegmentStatus};
use crate::solver::{ObjectiveWeights, RouteSolver};

use super::executors::SegmentExecutor;
use super::history::ExecutionHistory;

/// §4.6.1 reroute thresholds: a fraction improvement on any one of these
/// clears the bar to swap a running execution onto a re-solved route.
/// Flat, deterministic comparisons rather than a learned model — see
/// DESIGN.md for why this repo doesn't ship an ML-backed reroute check.
const REROUTE_COST_DROP_THRESHOLD: f64 = 0.05;
const REROUTE_ETA_DROP_THRESHOLD: f64 = 0.20;
const REROUTE_RELIABILITY_RISE_THRESHOLD: f64 = 0.1;

/// Drives every `ExecutionRecord` through the §4.6 state machine. One
/// record is locked independently of every other (`Arc<Mutex<..>>` per
/// id, under a `RwLock` map for the add/remove path) so that two unrelated
/// executions never contend, the same per-entity locking granularity the
/// teacher's `engine::state::NodeBalances` uses for per-node balances
/// rather than one mutex for the whole ledger.
///
/// `execute_route` and `resume` spawn a background task that drains
/// segments one at a time; every other method (`pause`, `cancel`,
/// `reroute`, `modify_current_segment`) only mutates the shared record —
/// the running task observes the mutation at its next segment-boundary
/// checkpoint. This is why those methods return as soon as the mutation
/// is applied rather than waiting for the execution to reach a new state.
pub struct ExecutionOrchestrator {
    records: RwLock<HashMap<String, Arc<Mutex<ExecutionRecord>>>>,
    executors: HashMap<crate::model::SegmentClass, Arc<dyn SegmentExecutor>>,
    solver: Arc<dyn RouteSolver>,
    store: Arc<dyn crate::collaborators::DurableStore>,
    history: ExecutionHistory,
    /// Weights the automatic §4.6.1 reroute check re-solves with between
    /// segments. Defaults to the §4.4 cost-first triple; override with
    /// [`with_auto_reroute_weights`](Self::with_auto_reroute_weights).
    auto_reroute_weights: ObjectiveWeights,
}

impl ExecutionOrchestrator {
    pub fn new(
        executors: HashMap<crate::model::SegmentClass, Arc<dyn SegmentExecutor>>,
        solver: Arc<dyn RouteSolver>,
        store: Arc<dyn crate::collaborators::DurableStore>,
        history_cap: usize,
    ) -> Self {
        ExecutionOrchestrator {
            records: RwLock::new(HashMap::new()),
            executors,
            solver,
            store,
            history: ExecutionHistory::new(history_cap),
            auto_reroute_weights: ObjectiveWeights::cost_first(),
        }
    }

    /// Override the objective weights used by the automatic between-segment
    /// reroute check (§4.6.1). Chainable at construction time.
    pub fn with_auto_reroute_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.auto_reroute_weights = weights;
        self
    }

    /// Begin executing `route` in the background. Returns the new
    /// execution id immediately — the record starts `Pending` and
    /// transitions to `Running` as the spawned task takes its first
    /// checkpoint. Segments run sequentially; §9 resolves parallel
    /// independent-segment execution as out of scope for this
    /// implementation, conservative until a dependency analysis between
    /// segments exists.
    pub async fn execute_route(
        self: &Arc<Self>,
        route: Route,
        initial_amount: f64,
        from_asset: Asset,
        to_asset: Asset,
    ) -> String {
        let execution_id = Uuid::new_v4().to_string();
        let record = ExecutionRecord::new(execution_id.clone(), route, initial_amount, from_asset, to_asset);
        let handle = Arc::new(Mutex::new(record));

        self.records.write().await.insert(execution_id.clone(), Arc::clone(&handle));

        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.drive(handle).await });

        execution_id
    }

    pub async fn get_status(&self, execution_id: &str) -> CoreResult<ExecutionRecord> {
        let handle = self.handle_for(execution_id).await?;
        Ok(handle.lock().await.clone())
    }

    pub async fn pause(&self, execution_id: &str) -> CoreResult<()> {
        let handle = self.handle_for(execution_id).await?;
        let mut record = handle.lock().await;
        if record.state != ExecutionState::Running {
            return Err(CoreError::PreconditionFailed(format!("cannot pause execution in state {:?}", record.state)));
        }
        record.state = ExecutionState::Paused;
        Ok(())
    }

    /// Resumes a paused execution. The original background task already
    /// exited when it observed `Paused`, so this spawns a fresh one.
    pub async fn resume(self: &Arc<Self>, execution_id: &str) -> CoreResult<()> {
        let handle = self.handle_for(execution_id).await?;
        {
            let mut record = handle.lock().await;
            if record.state != ExecutionState::Paused {
                return Err(CoreError::PreconditionFailed(format!("cannot resume execution in state {:?}", record.state)));
            }
            record.state = ExecutionState::Running;
        }

        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.drive(handle).await });
        Ok(())
    }

    /// Requests cancellation. A `Running` execution's background task
    /// notices `Cancelling` at its next segment boundary and finalizes it
    /// — the segment already in flight is allowed to settle first (§8).
    /// A `Paused` execution has no running task to notice anything, so
    /// this finalizes it immediately instead.
    pub async fn cancel(&self, execution_id: &str) -> CoreResult<()> {
        let handle = self.handle_for(execution_id).await?;
        let was_paused = {
            let mut record = handle.lock().await;
            if record.is_terminal() {
                return Err(CoreError::PreconditionFailed("execution already terminal".into()));
            }
            let was_paused = record.state == ExecutionState::Paused;
            record.state = ExecutionState::Cancelling;
            was_paused
        };
        if was_paused {
            self.finish_cancel(&handle).await;
        }
        Ok(())
    }

    /// Replace the remaining (unexecuted) segments of a running or paused
    /// execution with `new_route`. The already-settled prefix is left
    /// untouched; `new_route` is expected to start where the old one left
    /// off (same source node as the current segment). A `Running`
    /// execution's background task picks up the new route on its next
    /// checkpoint without any extra signal.
    pub async fn reroute(&self, execution_id: &str, new_route: Route) -> CoreResult<()> {
        let handle = self.handle_for(execution_id).await?;
        let mut record = handle.lock().await;
        if !matches!(record.state, ExecutionState::Running | ExecutionState::Paused) {
            return Err(CoreError::PreconditionFailed(format!("cannot reroute execution in state {:?}", record.state)));
        }

        let remaining_amount = record
            .segment_outcomes
            .get(record.current_index)
            .map(|o| o.amount_in)
            .unwrap_or(record.final_amount);

        record.route = new_route;
        record.current_index = 0;
        record.segment_outcomes =
            record.route.segments.iter().map(|_| crate::model::SegmentOutcome::pending(remaining_amount)).collect();
        Ok(())
    }

    /// Change the planned amount of segment `segment_index`. Legal only
    /// when that segment is still `pending` — strictly ahead of
    /// `current_index`, the segment currently in flight (or already
    /// settled). A started/completed segment is rejected with
    /// `PreconditionFailed` (§4.6, §7) rather than touched: nothing has
    /// been created with a provider for it yet, so there is nothing to
    /// call an executor about — this only rewrites the planned input
    /// amount that segment will see once its turn comes.
    pub async fn modify_current_segment(&self, execution_id: &str, segment_index: usize, new_amount: f64) -> CoreResult<()> {
        let handle = self.handle_for(execution_id).await?;
        let mut record = handle.lock().await;
        if record.state != ExecutionState::Running && record.state != ExecutionState::Paused {
            return Err(CoreError::PreconditionFailed(format!("cannot modify execution in state {:?}", record.state)));
        }
        if segment_index <= record.current_index {
            return Err(CoreError::PreconditionFailed(format!(
                "segment {segment_index} has already started or completed (current_index {})",
                record.current_index
            )));
        }
        let Some(outcome) = record.segment_outcomes.get_mut(segment_index) else {
            return Err(CoreError::PreconditionFailed(format!("segment {segment_index} does not exist")));
        };
        outcome.amount_in = new_amount;
        Ok(())
    }

    /// Re-solves the (current node → destination) corridor at the live
    /// notional and swaps onto the new route if any §4.6.1 criterion
    /// clears its threshold. Exposed for callers that want to force a
    /// reassessment on demand (e.g. right after an aggregator tick); the
    /// orchestrator also runs this automatically at every segment
    /// boundary inside `drive` using `auto_reroute_weights`.
    pub async fn maybe_auto_reroute(&self, execution_id: &str, weights: &ObjectiveWeights) -> CoreResult<bool> {
        let handle = self.handle_for(execution_id).await?;
        self.try_auto_reroute(&handle, weights).await
    }

    /// Core §4.6.1 check: compare the remaining route's metrics against a
    /// fresh re-solve from the current node, and swap onto the candidate
    /// if it clears any one of the three thresholds ("any of the
    /// following" — cost, eta, or reliability, not all three).
    async fn try_auto_reroute(&self, handle: &Arc<Mutex<ExecutionRecord>>, weights: &ObjectiveWeights) -> CoreResult<bool> {
        let (execution_id, from, to, notional, current_metrics) = {
            let record = handle.lock().await;
            if record.state != ExecutionState::Running {
                return Ok(false);
            }
            if record.current_index >= record.route.segments.len() {
                return Ok(false);
            }
            let remaining = Route::new(record.route.segments[record.current_index..].to_vec());
            let notional = record.segment_outcomes[record.current_index].amount_in;
            let Some(metrics) = remaining.metrics(notional) else { return Ok(false) };
            let (Some(from), Some(to)) = (remaining.source().cloned(), remaining.target().cloned()) else {
                return Ok(false);
            };
            (record.execution_id.clone(), from, to, notional, metrics)
        };

        let Ok(candidate) = self.solver.solve(&from, &to, notional, weights).await else { return Ok(false) };
        let Some(candidate_metrics) = candidate.metrics(notional) else { return Ok(false) };

        let cost_drop = (current_metrics.cost_percent - candidate_metrics.cost_percent) / current_metrics.cost_percent.max(f64::EPSILON);
        let eta_drop = (current_metrics.eta_hours - candidate_metrics.eta_hours) / current_metrics.eta_hours.max(f64::EPSILON);
        let reliability_rise = candidate_metrics.reliability - current_metrics.reliability;

        let should_reroute = cost_drop > REROUTE_COST_DROP_THRESHOLD
            || eta_drop > REROUTE_ETA_DROP_THRESHOLD
            || reliability_rise >= REROUTE_RELIABILITY_RISE_THRESHOLD;

        if should_reroute {
            self.reroute(&execution_id, candidate).await?;
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn recent_history(&self) -> Vec<ExecutionRecord> {
        self.history.recent().await
    }

    async fn handle_for(&self, execution_id: &str) -> CoreResult<Arc<Mutex<ExecutionRecord>>> {
        let records = self.records.read().await;
        records.get(execution_id).cloned().ok_or_else(|| unknown_execution(execution_id))
    }

    fn executor_for(&self, class: crate::model::SegmentClass) -> CoreResult<Arc<dyn SegmentExecutor>> {
        self.executors.get(&class).cloned().ok_or_else(|| CoreError::NotConfigured { provider: class.as_str().to_string() })
    }

    /// Runs segments sequentially from `current_index` while the record
    /// stays `Running`, re-reading state fresh from the lock at every
    /// checkpoint so a concurrent `pause`/`cancel`/`reroute` call takes
    /// effect on the very next iteration.
    async fn drive(&self, handle: Arc<Mutex<ExecutionRecord>>) {
        {
            let mut record = handle.lock().await;
            if record.state == ExecutionState::Pending {
                record.state = ExecutionState::Running;
            }
        }

        loop {
            let (state, index, segment, amount_in) = {
                let record = handle.lock().await;
                let segment = record.route.segments.get(record.current_index).cloned();
                let amount_in = record.segment_outcomes.get(record.current_index).map(|o| o.amount_in).unwrap_or(0.0);
                (record.state, record.current_index, segment, amount_in)
            };

            match state {
                ExecutionState::Running => {}
                ExecutionState::Cancelling => {
                    self.finish_cancel(&handle).await;
                    break;
                }
                _ => break,
            }

            let Some(segment) = segment else {
                self.finish_completed(&handle).await;
                break;
            };

            let executor = match self.executor_for(segment.segment_class) {
                Ok(e) => e,
                Err(e) => {
                    self.finish_failed(&handle, index, &e.to_string()).await;
                    break;
                }
            };

            let outcome = match executor.execute(&segment, amount_in).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.finish_failed(&handle, index, &e.to_string()).await;
                    break;
                }
            };

            let succeeded = outcome.status == SegmentStatus::Succeeded;
            let amount_out = outcome.amount_out;
            let mut record = handle.lock().await;
            // A reroute may have landed while this segment was in flight —
            // only advance the index that matches what we just executed.
            if record.current_index != index {
                continue;
            }
            record.segment_outcomes[index] = outcome;
            if !succeeded {
                record.state = ExecutionState::Failed;
                drop(record);
                self.append_history(&handle).await;
                break;
            }
            record.current_index += 1;
            record.final_amount = amount_out;
            if let Some(next) = record.segment_outcomes.get_mut(record.current_index) {
                next.amount_in = amount_out;
            }
            if record.current_index >= record.route.segments.len() {
                record.state = ExecutionState::Completed;
                drop(record);
                self.append_history(&handle).await;
                break;
            }
            drop(record);

            // §4.6 step 5: between this segment and the next, check
            // whether a strictly better path has appeared from here on.
            let weights = self.auto_reroute_weights;
            let _ = self.try_auto_reroute(&handle, &weights).await;
        }
    }

    async fn finish_completed(&self, handle: &Arc<Mutex<ExecutionRecord>>) {
        let mut record = handle.lock().await;
        record.state = ExecutionState::Completed;
        drop(record);
        self.append_history(handle).await;
    }

    async fn finish_failed(&self, handle: &Arc<Mutex<ExecutionRecord>>, index: usize, message: &str) {
        let mut record = handle.lock().await;
        record.state = ExecutionState::Failed;
        if let Some(outcome) = record.segment_outcomes.get_mut(index) {
            outcome.status = SegmentStatus::Failed;
            outcome.error = Some(message.to_string());
        }
        drop(record);
        self.append_history(handle).await;
    }

    async fn finish_cancel(&self, handle: &Arc<Mutex<ExecutionRecord>>) {
        let mut record = handle.lock().await;
        let index = record.current_index;
        if let Some(outcome) = record.segment_outcomes.get_mut(index) {
            if outcome.status != SegmentStatus::Succeeded {
                outcome.status = SegmentStatus::Cancelled;
            }
        }
        record.state = ExecutionState::Cancelled;
        drop(record);
        self.append_history(handle).await;
    }

    async fn append_history(&self, handle: &Arc<Mutex<ExecutionRecord>>) {
        let snapshot = handle.lock().await.clone();
        let _ = self
            .store
            .append("execution_history", serde_json::to_value(&snapshot).unwrap_or(serde_json::Value::Null))
            .await;
        self.history.record_terminal(snapshot).await;
    }
}

fn unknown_execution(execution_id: &str) -> CoreError {
    CoreError::Validation(format!("unknown execution id `{execution_id}`"))
}
