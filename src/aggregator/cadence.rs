use std::time::Duration;

use crate::model::SegmentClass;

/// Per-class refresh period and per-adapter-call deadline (§4.1, §4.2).
/// The fast class (crypto, bridge — "gas" has no adapter of its own here)
/// refreshes every 2s with a 2s call deadline; the slow class (fx,
/// bank_rail — "liquidity" likewise has no standalone adapter) refreshes
/// every 30-60s with the spec's 10s-for-slow-class call deadline. The
/// on/off-ramp pair isn't named in either cadence bucket; they settle on
/// bank timescales, so they take the slow-class numbers.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub refresh_period: Duration,
    pub call_deadline: Duration,
}

const FAST: Cadence = Cadence { refresh_period: Duration::from_secs(2), call_deadline: Duration::from_secs(2) };
const SLOW: Cadence = Cadence { refresh_period: Duration::from_secs(45), call_deadline: Duration::from_secs(10) };

pub fn cadence_for(class: SegmentClass) -> Cadence {
    match class {
        SegmentClass::Crypto | SegmentClass::Bridge => FAST,
        SegmentClass::Fx | SegmentClass::BankRail | SegmentClass::OnRamp | SegmentClass::OffRamp => SLOW,
    }
}

/// The snapshot-class cadence (§4.2): a complete-edge-set append to the
/// durable store, independent of any one segment class's refresh period.
pub const SNAPSHOT_PERIOD: Duration = Duration::from_secs(60);
