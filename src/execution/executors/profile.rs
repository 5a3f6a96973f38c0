use std::time::Duration;

use crate::model::SegmentClass;

/// Per-class execution capabilities and timing, §4.7. Replaces an
/// inheritance hierarchy of per-venue executor types with one data table
/// a single executor consults — the dispatch still happens by segment
/// class, the behavior difference is data, not a new `impl` per class.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionProfile {
    /// Whether an in-flight (unconfirmed) transfer can be cancelled outright.
    pub supports_cancel: bool,
    /// Whether an in-flight transfer's amount can be changed without
    /// cancelling it first. When false, "modify" is cancel-then-recreate.
    pub supports_modify_in_place: bool,
    /// Whether this class needs a separate "fund" call after "create"
    /// before the transfer is live (the bank-rail family, §4.7).
    pub requires_funding: bool,
    pub confirmation_polls: u32,
    pub poll_interval: Duration,
    pub retry_backoff: &'static [Duration],
}

pub fn profile_for(class: SegmentClass) -> ExecutionProfile {
    const BACKOFF: &[Duration] = &[Duration::from_secs(1), Duration::from_secs(4)];
    match class {
        SegmentClass::Fx | SegmentClass::BankRail => ExecutionProfile {
            supports_cancel: false,
            supports_modify_in_place: false,
            requires_funding: true,
            confirmation_polls: 30,
            poll_interval: Duration::from_secs(5),
            retry_backoff: BACKOFF,
        },
        SegmentClass::Crypto => ExecutionProfile {
            supports_cancel: true,
            supports_modify_in_place: false,
            requires_funding: false,
            confirmation_polls: 30,
            poll_interval: Duration::from_secs(5),
            retry_backoff: BACKOFF,
        },
        SegmentClass::Bridge | SegmentClass::OnRamp | SegmentClass::OffRamp => ExecutionProfile {
            supports_cancel: false,
            supports_modify_in_place: false,
            requires_funding: false,
            confirmation_polls: 30,
            poll_interval: Duration::from_secs(5),
            retry_backoff: BACKOFF,
        },
    }
}
