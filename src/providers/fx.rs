use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// Fiat-to-fiat conversion, shaped after a Frankfurter-style rates API:
/// one request per base currency returns every quoted counter rate.
pub struct FxAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    bases: Vec<String>,
}

impl FxAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, bases: Vec<String>) -> Self {
        FxAdapter { transport, base_url: base_url.into(), bases }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    base: String,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl ProviderAdapter for FxAdapter {
    fn provider_id(&self) -> &'static str {
        "frankfurter"
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::Fx
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for base in &self.bases {
            let url = format!("{}/latest?from={}", self.base_url, base);
            let request = TransportRequest::get(url, Duration::from_secs(2));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: RatesResponse = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            for (quote, rate) in parsed.rates {
                segments.push(RouteSegment {
                    segment_class: SegmentClass::Fx,
                    from: Node::fiat(&parsed.base),
                    to: Node::fiat(&quote),
                    provider: self.provider_id().to_string(),
                    cost: Cost { fee_percent: 0.0, fixed_fee: 0.0, effective_rate: rate },
                    latency: Latency { min_minutes: 1.0, max_minutes: 5.0 },
                    reliability_score: SegmentClass::Fx.default_reliability(),
                    constraints: HashMap::new(),
                    observed_at: now,
                });
            }
        }

        Ok(segments)
    }
}
