use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Wall-clock time as a collaborator, so execution/aggregator logic can be
/// tested without real sleeps — the same motivation as the teacher's
/// `CronScheduler`, which takes `Instant::now()` at each loop iteration
/// rather than hardcoding `tokio::time::Instant::now()` inline everywhere.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock tests can advance deterministically. Starts at a fixed instant
/// rather than `Utc::now()` so assertions on elapsed durations are exact.
pub struct SimClock {
    millis_since_epoch: AtomicI64,
}

impl SimClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        SimClock { millis_since_epoch: AtomicI64::new(start.timestamp_millis()) }
    }

    pub fn advance(&self, by: Duration) {
        self.millis_since_epoch.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis_since_epoch.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis).single().expect("valid simulated timestamp")
    }
}
