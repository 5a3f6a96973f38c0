//! The ingestion/snapshot layer, §4.1–§4.2. One polling loop per segment
//! class, each on its own cadence, feeding a shared [`EdgeBook`]. Grounded
//! on the teacher's `run::scheduler::CronScheduler` (per-trigger interval
//! tracking) generalized from a single cron list to N independent classes,
//! each with its own `tokio::time::interval` rather than one global
//! "next wakeup" computation — classes don't share a refresh cadence here
//! the way the teacher's triggers all feed one `wait_for_next` loop.

pub mod book;
pub mod cadence;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;

use crate::model::SegmentClass;
use crate::providers::{normalize::normalize, ProviderAdapter};

pub use book::EdgeBook;

use self::cadence::{cadence_for, SNAPSHOT_PERIOD};

/// Owns the adapter fan-out and the resulting hot-path book. `run_forever`
/// spawns one task per segment class present in `adapters` and never
/// returns; callers that want a single pass for tests or a `--once` CLI
/// mode should use [`Aggregator::tick_class`] directly instead.
pub struct Aggregator {
    adapters: HashMap<SegmentClass, Vec<Arc<dyn ProviderAdapter>>>,
    book: Arc<EdgeBook>,
    store: Arc<dyn crate::collaborators::DurableStore>,
    in_flight: HashMap<SegmentClass, Arc<AtomicBool>>,
    next_tick_id: AtomicU64,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>, store: Arc<dyn crate::collaborators::DurableStore>) -> Self {
        let mut by_class: HashMap<SegmentClass, Vec<Arc<dyn ProviderAdapter>>> = HashMap::new();
        for adapter in adapters {
            by_class.entry(adapter.segment_class()).or_default().push(adapter);
        }
        let in_flight = by_class.keys().map(|c| (*c, Arc::new(AtomicBool::new(false)))).collect();
        Aggregator { adapters: by_class, book: Arc::new(EdgeBook::new()), store, in_flight, next_tick_id: AtomicU64::new(0) }
    }

    pub fn book(&self) -> Arc<EdgeBook> {
        Arc::clone(&self.book)
    }

    /// Snapshot tick (§4.2 step 5): append the complete current edge set
    /// as a single immutable record to the `edge_snapshots` stream. Runs
    /// on its own cadence, independent of any one segment class's refresh.
    pub async fn snapshot_tick(&self) {
        let tick_id = self.next_tick_id.fetch_add(1, Ordering::SeqCst);
        let edges = self.book.snapshot().await;
        let _ = self
            .store
            .append(
                "edge_snapshots",
                serde_json::json!({
                    "tick_id": tick_id,
                    "timestamp": chrono::Utc::now(),
                    "edges": edges,
                }),
            )
            .await;
    }

    /// Fan out to every adapter of `class` concurrently, each bounded by
    /// the class's call deadline, normalize what comes back, and apply it
    /// to the book. A single adapter failing never aborts the tick for its
    /// siblings — failures are counted and appended to the durable tick
    /// record, never propagated (§4.1: "the adapter never throws out of a
    /// tick").
    pub async fn tick_class(&self, class: SegmentClass) {
        let Some(adapters) = self.adapters.get(&class) else { return };
        let flag = &self.in_flight[&class];
        if flag.swap(true, Ordering::SeqCst) {
            // Previous tick for this class is still running — skip, don't stack.
            return;
        }

        let cadence = cadence_for(class);
        let calls = adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let deadline = cadence.call_deadline;
            async move { (adapter.provider_id(), tokio::time::timeout(deadline, adapter.fetch()).await) }
        });
        let results = join_all(calls).await;

        let mut applied = 0usize;
        let mut failed = 0usize;
        for (provider_id, result) in results {
            match result {
                Ok(Ok(segments)) => {
                    for segment in segments {
                        if let Some(normalized) = normalize(segment) {
                            if self.book.upsert(normalized).await {
                                applied += 1;
                            }
                        }
                    }
                }
                Ok(Err(_)) | Err(_) => {
                    failed += 1;
                    let _ = provider_id;
                }
            }
        }

        let _ = self
            .store
            .append(
                "aggregator_ticks",
                serde_json::json!({
                    "segment_class": class.as_str(),
                    "applied": applied,
                    "failed": failed,
                    "observed_at": chrono::Utc::now(),
                }),
            )
            .await;

        flag.store(false, Ordering::SeqCst);
    }

    /// Spawns one independent polling task per segment class plus the
    /// snapshot task, and blocks forever. Intended for the long-running
    /// server mode; the CLI's one-shot mode calls [`Aggregator::tick_class`]
    /// and [`Aggregator::snapshot_tick`] directly instead.
    pub async fn run_forever(self: Arc<Self>) {
        let classes: Vec<SegmentClass> = self.adapters.keys().copied().collect();
        let mut handles = Vec::new();
        for class in classes {
            let this = Arc::clone(&self);
            let period = cadence_for(class).refresh_period;
            handles.push(tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                loop {
                    interval.tick().await;
                    this.tick_class(class).await;
                }
            }));
        }
        let this = Arc::clone(&self);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(SNAPSHOT_PERIOD);
            loop {
                interval.tick().await;
                this.snapshot_tick().await;
            }
        }));
        join_all(handles).await;
    }
}
