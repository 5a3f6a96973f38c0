use std::collections::VecDeque;

use tokio::sync::Mutex;

use crate::model::ExecutionRecord;

/// A bounded in-memory ring of terminal execution records, for fast local
/// lookups without going back to the durable store. Every transition is
/// still appended to the `DurableStore` regardless of this cap — the ring
/// only bounds what lives in process memory (§6: `execution_history_cap`).
pub struct ExecutionHistory {
    cap: usize,
    ring: Mutex<VecDeque<ExecutionRecord>>,
}

impl ExecutionHistory {
    pub fn new(cap: usize) -> Self {
        ExecutionHistory { cap, ring: Mutex::new(VecDeque::with_capacity(cap)) }
    }

    pub async fn record_terminal(&self, record: ExecutionRecord) {
        let mut ring = self.ring.lock().await;
        if ring.len() >= self.cap {
            ring.pop_front();
        }
        ring.push_back(record);
    }

    pub async fn recent(&self) -> Vec<ExecutionRecord> {
        self.ring.lock().await.iter().cloned().collect()
    }
}
