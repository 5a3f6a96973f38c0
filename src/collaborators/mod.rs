//! The consumed interfaces of §6: transport, cache, durable store,
//! credentials, clock, and regulatory constraints. These are the external
//! collaborators the spec places out of scope for this repository — the
//! core only depends on their trait contracts. Each trait ships one
//! dependency-free in-memory implementation suitable for tests and local
//! runs; a production deployment swaps in Redis/Postgres/etc. without the
//! core changing, the same way the teacher treats its SQLite/axum layer as
//! swappable infrastructure external to `engine`/`run`.

pub mod cache;
pub mod clock;
pub mod credentials;
pub mod regulatory;
pub mod store;
pub mod transport;

pub use cache::{Cache, InMemoryCache};
pub use clock::{Clock, SimClock, SystemClock};
pub use credentials::{Credentials, EnvCredentials};
pub use regulatory::RegulatoryConstraints;
pub use store::{DurableStore, InMemoryStore};
pub use transport::{HttpTransport, Transport, TransportError, TransportRequest, TransportResponse};
#[cfg(test)]
pub use transport::FakeTransport;
