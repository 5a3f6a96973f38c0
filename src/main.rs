use std::collections::HashMap;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use corridor_router::aggregator::EdgeBook;
use corridor_router::collaborators::{InMemoryCache, InMemoryStore, RegulatoryConstraints};
use corridor_router::config::RuntimeConfig;
use corridor_router::execution::executors::build_simulated_executors;
use corridor_router::execution::ExecutionOrchestrator;
use corridor_router::graph::GraphConstraints;
use corridor_router::model::{Cost, Latency, Node, RouteSegment, SegmentClass};
use corridor_router::solver::{EnumeratingSolver, ObjectiveWeights, RouteSolver};

/// Cross-border payment router — local inspection CLI over the routing and
/// execution core. Production deployments drive the same core from an API
/// layer kept out of this crate; these subcommands exist for schema
/// generation and ad hoc solve/execute runs against seeded sample data.
#[derive(Parser)]
#[command(name = "corridor-router", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the JSON Schema for the wire-visible data types.
    Schema {
        /// Which type to print: route-segment, route, or execution-record.
        #[arg(long, default_value = "route-segment")]
        of: String,
    },

    /// Solve for the best route over a small seeded corridor and print the
    /// ranked candidates (§8, scenario 3: two competing USD->EUR paths).
    Optimize {
        #[arg(long, default_value = "USD")]
        from: String,
        #[arg(long, default_value = "EUR")]
        to: String,
        #[arg(long, default_value = "1000.0")]
        amount: f64,
        #[arg(long, default_value_t = 5)]
        k: usize,
    },

    /// Run a seeded two-hop route end to end in simulation mode, pausing
    /// after the first segment and resuming, to exercise the orchestrator's
    /// control operations from the command line (§8, scenario 5).
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { of } => print_schema(&of),
        Command::Optimize { from, to, amount, k } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(optimize(&from, &to, amount, k))
        }
        Command::Demo => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(demo())
        }
    }
}

fn print_schema(of: &str) -> anyhow::Result<()> {
    let schema = match of {
        "route-segment" => serde_json::to_string_pretty(&schemars::schema_for!(RouteSegment))?,
        "route" => serde_json::to_string_pretty(&schemars::schema_for!(corridor_router::model::Route))?,
        "execution-record" => {
            serde_json::to_string_pretty(&schemars::schema_for!(corridor_router::model::ExecutionRecord))?
        }
        other => anyhow::bail!("unknown schema `{other}` (expected route-segment, route, or execution-record)"),
    };
    println!("{schema}");
    Ok(())
}

/// Two competing USD->EUR corridors: a direct fx leg, and a cheaper
/// USD->USDC->EUR two-hop, matching §8 scenario 3.
async fn seed_book() -> EdgeBook {
    let book = EdgeBook::new();
    let now = chrono::Utc::now();
    let segments = [
        RouteSegment {
            segment_class: SegmentClass::Fx,
            from: Node::fiat("USD"),
            to: Node::fiat("EUR"),
            provider: "frankfurter".into(),
            cost: Cost { fee_percent: 0.3, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 5.0, max_minutes: 10.0 },
            reliability_score: 0.95,
            constraints: HashMap::new(),
            observed_at: now,
        },
        RouteSegment {
            segment_class: SegmentClass::Crypto,
            from: Node::fiat("USD"),
            to: Node::on_network("USDC", "ethereum"),
            provider: "kraken".into(),
            cost: Cost { fee_percent: 0.1, fixed_fee: 0.0, effective_rate: 1.0 },
            latency: Latency { min_minutes: 1.0, max_minutes: 5.0 },
            reliability_score: 0.9,
            constraints: HashMap::new(),
            observed_at: now,
        },
        RouteSegment {
            segment_class: SegmentClass::OffRamp,
            from: Node::on_network("USDC", "ethereum"),
            to: Node::fiat("EUR"),
            provider: "ramp_co".into(),
            cost: Cost { fee_percent: 0.15, fixed_fee: 0.0, effective_rate: 0.85 },
            latency: Latency { min_minutes: 10.0, max_minutes: 60.0 },
            reliability_score: 0.85,
            constraints: HashMap::new(),
            observed_at: now,
        },
    ];
    for segment in segments {
        book.upsert(segment).await;
    }
    book
}

async fn optimize(from: &str, to: &str, amount: f64, k: usize) -> anyhow::Result<()> {
    let config = RuntimeConfig::default();
    let book = Arc::new(seed_book().await);
    let constraints = GraphConstraints::new(config.reliability_floor, config.max_hops, Arc::new(RegulatoryConstraints::empty()));
    let solver = EnumeratingSolver::new(book, constraints, Arc::new(InMemoryCache::new()));

    let weights = ObjectiveWeights::cost_first();
    let from_node = Node::fiat(from);
    let to_node = Node::fiat(to);

    match solver.solve_top_k(&from_node, &to_node, amount, k, &weights).await {
        Ok(ranked) => {
            for (rank, scored) in ranked.iter().enumerate() {
                println!(
                    "#{} score={:.4} ({} hop(s), providers: {}):",
                    rank + 1,
                    scored.score,
                    scored.route.len(),
                    scored.route.providers().join(" -> ")
                );
                println!("  final_amount:  {:.2}", scored.metrics.final_amount);
                println!("  cost_percent:  {:.4}%", scored.metrics.cost_percent);
                println!("  eta_hours:     {:.2}", scored.metrics.eta_hours);
                println!("  reliability:   {:.4}", scored.metrics.reliability);
            }
        }
        Err(e) => println!("no route found: {e}"),
    }
    Ok(())
}

async fn demo() -> anyhow::Result<()> {
    let book = Arc::new(seed_book().await);
    let constraints = GraphConstraints::new(0.5, 5, Arc::new(RegulatoryConstraints::empty()));
    let solver: Arc<dyn RouteSolver> =
        Arc::new(EnumeratingSolver::new(Arc::clone(&book), constraints, Arc::new(InMemoryCache::new())));

    let route = solver.solve(&Node::fiat("USD"), &Node::fiat("EUR"), 1000.0, &ObjectiveWeights::cost_first()).await?;
    println!("selected route: {} hop(s) via {}", route.len(), route.providers().join(" -> "));

    let classes = RuntimeConfig::enabled_segment_classes();
    let executors = build_simulated_executors(&classes);
    let store = Arc::new(InMemoryStore::new());
    let orchestrator = Arc::new(ExecutionOrchestrator::new(executors, solver, store, 64));

    let id = orchestrator.execute_route(route, 1000.0, "USD".into(), "EUR".into()).await;
    println!("execution {id} started");

    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    if orchestrator.pause(&id).await.is_ok() {
        println!("paused after first segment");
    }

    let status = orchestrator.get_status(&id).await?;
    println!("current_index: {}, state: {:?}", status.current_index, status.state);

    if status.state == corridor_router::model::ExecutionState::Paused {
        orchestrator.resume(&id).await?;
        println!("resumed");
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let status = orchestrator.get_status(&id).await?;
    println!("final state: {:?}, final_amount: {:.2}", status.state, status.final_amount);

    Ok(())
}
