//! The routing graph, §4.3. Built fresh from an [`EdgeBook`](crate::aggregator::EdgeBook)
//! snapshot for every `optimize_route` call — the graph itself holds no
//! state between calls, it is a pure view over whatever edges were
//! admissible at the moment the snapshot was taken.

pub mod builder;
pub mod constraints;
pub mod enumerate;

pub use builder::CorridorGraph;
pub use constraints::GraphConstraints;
pub use enumerate::enumerate_routes;
