pub mod edge;
pub mod execution;
pub mod node;
pub mod route;

pub use edge::{Cost, Latency, RouteSegment, SegmentClass};
pub use execution::{ExecutionRecord, ExecutionState, SegmentOutcome, SegmentStatus};
pub use node::{Asset, Node};
pub use route::{PathMetrics, Route};
