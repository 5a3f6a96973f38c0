//! The execution orchestrator, §4.6–§4.7: the state machine that carries a
//! chosen route from `Pending` to a terminal state, dispatching each
//! segment to a capability-trait executor keyed by segment class.

pub mod executors;
pub mod history;
pub mod orchestrator;

pub use orchestrator::ExecutionOrchestrator;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::collaborators::InMemoryStore;
    use crate::model::{Cost, ExecutionState, Latency, Node, Route, RouteSegment, SegmentClass};
    use crate::solver::{EnumeratingSolver, ObjectiveWeights};

    use super::executors::{build_simulated_executors, SegmentExecutor};
    use super::ExecutionOrchestrator;

    fn fx_segment(from: &str, to: &str, rate: f64) -> RouteSegment {
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat(from),
            to: Node::fiat(to),
            provider: "p".into(),
            cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: rate },
            latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
            reliability_score: 0.95,
            constraints: Default::default(),
            observed_at: chrono::Utc::now(),
        }
    }

    fn test_solver() -> Arc<EnumeratingSolver> {
        use crate::aggregator::EdgeBook;
        use crate::collaborators::{InMemoryCache, RegulatoryConstraints};
        use crate::graph::GraphConstraints;

        let book = Arc::new(EdgeBook::new());
        let constraints = GraphConstraints::new(0.0, 4, Arc::new(RegulatoryConstraints::empty()));
        Arc::new(EnumeratingSolver::new(book, constraints, Arc::new(InMemoryCache::new())))
    }

    fn orchestrator() -> Arc<ExecutionOrchestrator> {
        let classes = [SegmentClass::Fx, SegmentClass::Crypto, SegmentClass::Bridge];
        let executors: HashMap<SegmentClass, Arc<dyn SegmentExecutor>> = build_simulated_executors(&classes);
        let store = Arc::new(InMemoryStore::new());
        Arc::new(ExecutionOrchestrator::new(executors, test_solver(), store, 16))
    }

    #[tokio::test]
    async fn single_hop_execution_completes() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![fx_segment("USD", "EUR", 0.85)]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "EUR".into()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;

        let status = orchestrator.get_status(&id).await.unwrap();
        assert_eq!(status.state, ExecutionState::Completed);
        assert!((status.final_amount - 850.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn pause_then_resume_still_completes() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![fx_segment("USD", "EUR", 0.85), fx_segment("EUR", "GBP", 0.9)]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "GBP".into()).await;

        orchestrator.pause(&id).await.ok();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let status = orchestrator.get_status(&id).await.unwrap();
        assert!(status.state == ExecutionState::Paused || status.state == ExecutionState::Completed);

        if status.state == ExecutionState::Paused {
            orchestrator.resume(&id).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        let status = orchestrator.get_status(&id).await.unwrap();
        assert_eq!(status.state, ExecutionState::Completed);
    }

    #[tokio::test]
    async fn cancel_on_paused_execution_finalizes_immediately() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![fx_segment("USD", "EUR", 0.85), fx_segment("EUR", "GBP", 0.9)]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "GBP".into()).await;

        orchestrator.pause(&id).await.ok();
        tokio::time::sleep(Duration::from_millis(5)).await;

        if orchestrator.get_status(&id).await.unwrap().state == ExecutionState::Paused {
            orchestrator.cancel(&id).await.unwrap();
            let status = orchestrator.get_status(&id).await.unwrap();
            assert_eq!(status.state, ExecutionState::Cancelled);
        }
    }

    #[tokio::test]
    async fn reroute_mid_execution_replaces_remaining_segments() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![fx_segment("USD", "EUR", 0.85)]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "EUR".into()).await;

        let new_route = Route::new(vec![fx_segment("USD", "EUR", 0.90)]);
        let _ = orchestrator.reroute(&id, new_route).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = orchestrator.get_status(&id).await.unwrap();
        assert!(status.state == ExecutionState::Completed);
    }

    #[tokio::test]
    async fn unknown_execution_id_is_rejected() {
        let orchestrator = orchestrator();
        assert!(orchestrator.get_status("does-not-exist").await.is_err());
    }

    #[tokio::test]
    async fn modify_rejects_the_in_flight_segment_but_allows_a_later_pending_one() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![
            fx_segment("USD", "EUR", 0.85),
            fx_segment("EUR", "GBP", 0.9),
            fx_segment("GBP", "JPY", 150.0),
        ]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "JPY".into()).await;
        orchestrator.pause(&id).await.ok();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let status = orchestrator.get_status(&id).await.unwrap();
        if status.state != ExecutionState::Paused {
            // The execution outran the pause; nothing left to exercise.
            return;
        }

        let current = status.current_index;
        let in_flight = orchestrator.modify_current_segment(&id, current, 111.0).await;
        assert!(in_flight.is_err(), "the segment at current_index must not be modifiable");

        if let Some(pending_index) = (current + 1..status.segment_outcomes.len()).next() {
            orchestrator.modify_current_segment(&id, pending_index, 222.0).await.unwrap();
            let after = orchestrator.get_status(&id).await.unwrap();
            assert_eq!(after.segment_outcomes[pending_index].amount_in, 222.0);
        }
    }

    #[tokio::test]
    async fn pausing_an_already_paused_execution_is_rejected() {
        let orchestrator = orchestrator();
        let route = Route::new(vec![fx_segment("USD", "EUR", 0.85), fx_segment("EUR", "GBP", 0.9)]);
        let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "GBP".into()).await;

        orchestrator.pause(&id).await.ok();
        let second_pause = orchestrator.pause(&id).await;
        assert!(second_pause.is_err() || orchestrator.get_status(&id).await.unwrap().state == ExecutionState::Completed);

        let _ = ObjectiveWeights::cost_first();
    }
}
