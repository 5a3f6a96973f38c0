//! Provider adapters, §4.1. Each adapter owns one external data source and
//! translates its wire shape into `RouteSegment`s; adapters never throw out
//! of a tick — a failed fetch is caught by the aggregator and logged, the
//! same "log and keep going" contract as the teacher's `fetch_data::run`,
//! which counts successes/failures per job rather than aborting the whole
//! run on one bad source.

pub mod bank_rail;
pub mod bridge;
pub mod crypto;
pub mod fx;
pub mod normalize;
pub mod off_ramp;
pub mod on_ramp;

use async_trait::async_trait;

use crate::collaborators::TransportError;
use crate::error::CoreError;
use crate::error::CoreResult;
use crate::model::{RouteSegment, SegmentClass};

/// One external quote/rate source. `provider_id` must be stable across
/// calls — it is part of the edge cache key (§3).
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider_id(&self) -> &'static str;
    fn segment_class(&self) -> SegmentClass;
    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>>;
}

/// Shared classification from a [`TransportError`] into the §7 taxonomy.
/// HTTP 401/403 become auth errors, 429 becomes rate-limited, everything
/// else is treated as transient (the aggregator's retry/backoff is the
/// thing that turns repeated transient failures into a stale-edge
/// exclusion, not the adapter itself).
pub fn classify_transport_error(provider: &str, err: TransportError) -> CoreError {
    match err {
        TransportError::Timeout { .. } => {
            CoreError::ProviderTransient { provider: provider.to_string(), message: "request timed out".into() }
        }
        TransportError::Connection { message, .. } => {
            CoreError::ProviderTransient { provider: provider.to_string(), message }
        }
        TransportError::HttpStatus { status, body, .. } => match status {
            401 | 403 => CoreError::ProviderAuth { provider: provider.to_string(), message: body },
            429 => CoreError::RateLimited { provider: provider.to_string() },
            400..=499 => CoreError::ProviderPermanent { provider: provider.to_string(), message: body },
            _ => CoreError::ProviderTransient { provider: provider.to_string(), message: body },
        },
    }
}
