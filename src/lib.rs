//! A cross-border, multi-rail payment routing and execution engine.
//!
//! The three subsystems where the engineering difficulty lives:
//!
//! - [`aggregator`] + [`providers`] — concurrent ingestion from
//!   heterogeneous sources, normalized into a uniform edge model and kept
//!   in a hot cache plus a durable snapshot log.
//! - [`graph`] + [`solver`] — multi-objective path enumeration over the
//!   edge set, producing a ranked top-K of candidate routes.
//! - [`execution`] — a per-execution state machine that drives a chosen
//!   route segment-by-segment against real provider APIs, with
//!   pause/resume/cancel/modify/reroute control operations.
//!
//! [`model`] is the data model shared by all three; [`collaborators`] are
//! the external interfaces (transport, cache, durable store, credentials,
//! clock, regulatory constraints) this crate consumes rather than owns;
//! [`api`] is the logical facade over the whole thing; [`config`] is the
//! set of runtime tunables; [`error`] is the error taxonomy.

pub mod aggregator;
pub mod api;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod execution;
pub mod graph;
pub mod model;
pub mod providers;
pub mod solver;
