//! The concrete end-to-end scenarios from §8: full-stack runs through the
//! public API rather than a single module's unit tests. Scenarios 1 and 2
//! (single-hop FX, two-hop with fee) are pure `Route::metrics` arithmetic
//! and live as inline tests next to `Route` itself; these are the four
//! that need a real solver and/or orchestrator wired together.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use corridor_router::aggregator::EdgeBook;
use corridor_router::collaborators::{InMemoryCache, InMemoryStore, RegulatoryConstraints};
use corridor_router::error::CoreError;
use corridor_router::execution::executors::build_simulated_executors;
use corridor_router::execution::ExecutionOrchestrator;
use corridor_router::graph::GraphConstraints;
use corridor_router::model::{Cost, ExecutionState, Latency, Node, Route, RouteSegment, SegmentClass, SegmentStatus};
use corridor_router::solver::{EnumeratingSolver, ObjectiveWeights, RouteSolver};

fn fx(from: &str, to: &str, provider: &str, fee_percent: f64, rate: f64, reliability: f64) -> RouteSegment {
    RouteSegment {
        segment_class: SegmentClass::Fx,
        from: Node::fiat(from),
        to: Node::fiat(to),
        provider: provider.into(),
        cost: Cost { fee_percent, fixed_fee: 0.0, effective_rate: rate },
        latency: Latency { min_minutes: 1.0, max_minutes: 2.0 },
        reliability_score: reliability,
        constraints: HashMap::new(),
        observed_at: chrono::Utc::now(),
    }
}

async fn solver_over(edges: Vec<RouteSegment>, reliability_floor: f64) -> EnumeratingSolver {
    let book = Arc::new(EdgeBook::new());
    for edge in edges {
        book.upsert(edge).await;
    }
    let constraints = GraphConstraints::new(reliability_floor, 4, Arc::new(RegulatoryConstraints::empty()));
    EnumeratingSolver::new(book, constraints, Arc::new(InMemoryCache::new()))
}

/// Scenario 3: a direct USD->EUR fx leg versus a cheaper USD->USDC->EUR
/// two-hop. Default (cost-first) weights must put the two-hop first and
/// return both in the top-2.
#[tokio::test]
async fn scenario_3_cheaper_two_hop_beats_direct_on_cost() {
    let edges = vec![
        fx("USD", "EUR", "direct", 0.3, 0.85, 0.95),
        fx("USD", "USDC", "leg_a", 0.1, 1.0, 0.95),
        fx("USDC", "EUR", "leg_b", 0.15, 0.85, 0.95),
    ];
    let solver = solver_over(edges, 0.0).await;

    let top = solver
        .solve_top_k(&Node::fiat("USD"), &Node::fiat("EUR"), 1000.0, 2, &ObjectiveWeights::cost_first())
        .await
        .unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].route.len(), 2, "the two-hop path should rank first on cost");
    assert_eq!(top[0].route.providers(), vec!["leg_a", "leg_b"]);
    assert_eq!(top[1].route.providers(), vec!["direct"]);
    assert!(top[0].score >= top[1].score);
}

/// Scenario 4: a reliability floor excludes the only available edge.
/// Lowering the floor lets the same corridor resolve again.
#[tokio::test]
async fn scenario_4_reliability_floor_excludes_then_admits() {
    let edges = vec![fx("USD", "INR", "only_option", 0.0, 80.0, 0.3)];

    let strict = solver_over(edges.clone(), 0.5).await;
    let err = strict
        .solve_top_k(&Node::fiat("USD"), &Node::fiat("INR"), 1000.0, 1, &ObjectiveWeights::cost_first())
        .await
        .unwrap_err();
    match err {
        CoreError::NoRouteFound { reason, .. } => assert_eq!(reason, "below_reliability_floor"),
        other => panic!("expected NoRouteFound, got {other:?}"),
    }

    let lenient = solver_over(edges, 0.2).await;
    let routes = lenient
        .solve_top_k(&Node::fiat("USD"), &Node::fiat("INR"), 1000.0, 1, &ObjectiveWeights::cost_first())
        .await
        .unwrap();
    assert_eq!(routes.len(), 1);
}

fn orchestrator_with(edges: &[RouteSegment]) -> (Arc<ExecutionOrchestrator>, Route) {
    let route = Route::new(edges.to_vec());
    let classes = [SegmentClass::Fx];
    let executors = build_simulated_executors(&classes);
    let store = Arc::new(InMemoryStore::new());
    let solver: Arc<dyn RouteSolver> = {
        // Not exercised directly by these scenarios beyond auto-reroute
        // plumbing, but the orchestrator always needs one.
        let book = Arc::new(EdgeBook::new());
        let constraints = GraphConstraints::new(0.0, 4, Arc::new(RegulatoryConstraints::empty()));
        Arc::new(EnumeratingSolver::new(book, constraints, Arc::new(InMemoryCache::new())))
    };
    (Arc::new(ExecutionOrchestrator::new(executors, solver, store, 16)), route)
}

/// Scenario 5: pause after the first segment of a three-segment route,
/// then resume; all three segments end up succeeded.
#[tokio::test]
async fn scenario_5_pause_then_resume_completes_all_segments() {
    let edges = vec![
        fx("USD", "EUR", "a", 0.0, 0.9, 0.95),
        fx("EUR", "GBP", "b", 0.0, 0.85, 0.95),
        fx("GBP", "JPY", "c", 0.0, 150.0, 0.95),
    ];
    let (orchestrator, route) = orchestrator_with(&edges);
    let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "JPY".into()).await;

    // Give the first segment a chance to land, then pause.
    tokio::time::sleep(Duration::from_millis(15)).await;
    let _ = orchestrator.pause(&id).await;

    tokio::time::sleep(Duration::from_millis(15)).await;
    let status = orchestrator.get_status(&id).await.unwrap();
    assert!(matches!(status.state, ExecutionState::Paused | ExecutionState::Completed));

    if status.state == ExecutionState::Paused {
        orchestrator.resume(&id).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = orchestrator.get_status(&id).await.unwrap();
    assert_eq!(status.state, ExecutionState::Completed);
    assert_eq!(status.segment_outcomes.len(), 3);
    assert!(status.segment_outcomes.iter().all(|o| o.status == SegmentStatus::Succeeded));
}

/// Scenario 6: a two-segment route is chosen, then after segment 1 a
/// strictly cheaper direct path from the current node is installed via
/// `reroute`. The execution finishes against the new route's arithmetic,
/// not the original plan.
#[tokio::test]
async fn scenario_6_reroute_mid_execution_uses_the_new_route() {
    let original = vec![fx("USD", "USDC", "a", 0.0, 1.0, 0.95), fx("USDC", "EUR", "b", 0.0, 0.80, 0.95)];
    let (orchestrator, route) = orchestrator_with(&original);
    let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "EUR".into()).await;

    // Let the first segment (USD->USDC) settle before rerouting the rest.
    tokio::time::sleep(Duration::from_millis(15)).await;

    let cheaper = Route::new(vec![fx("USDC", "EUR", "direct_cheap", 0.0, 0.90, 0.95)]);
    let reroute_result = orchestrator.reroute(&id, cheaper).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = orchestrator.get_status(&id).await.unwrap();
    assert_eq!(status.state, ExecutionState::Completed);

    if reroute_result.is_ok() {
        // 1000 settles at 1.0 on the first leg, then 0.90 on the rerouted leg.
        assert!((status.final_amount - 900.0).abs() < 1e-6, "final_amount was {}", status.final_amount);
    }
}
