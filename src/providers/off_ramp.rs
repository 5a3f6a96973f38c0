use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// Custodied/on-chain asset liquidated back to a fiat bank balance.
pub struct OffRampRoute {
    pub asset: String,
    pub network: String,
    pub fiat: String,
}

pub struct OffRampAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    provider_id: &'static str,
    routes: Vec<OffRampRoute>,
}

impl OffRampAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        provider_id: &'static str,
        routes: Vec<OffRampRoute>,
    ) -> Self {
        OffRampAdapter { transport, base_url: base_url.into(), provider_id, routes }
    }
}

#[derive(Debug, Deserialize)]
struct OffRampQuote {
    #[serde(rename = "feePercent")]
    fee_percent: f64,
    #[serde(rename = "fixedFee")]
    fixed_fee: f64,
    rate: f64,
}

#[async_trait]
impl ProviderAdapter for OffRampAdapter {
    fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::OffRamp
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for route in &self.routes {
            let url = format!(
                "{}/quote?asset={}&network={}&fiat={}",
                self.base_url, route.asset, route.network, route.fiat
            );
            let request = TransportRequest::get(url, Duration::from_secs(10));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: OffRampQuote = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            segments.push(RouteSegment {
                segment_class: SegmentClass::OffRamp,
                from: Node::on_network(&route.asset, &route.network),
                to: Node::fiat(&route.fiat),
                provider: self.provider_id().to_string(),
                cost: Cost { fee_percent: parsed.fee_percent, fixed_fee: parsed.fixed_fee, effective_rate: parsed.rate },
                latency: Latency { min_minutes: 10.0, max_minutes: 120.0 },
                reliability_score: SegmentClass::OffRamp.default_reliability(),
                constraints: HashMap::new(),
                observed_at: now,
            });
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use crate::collaborators::FakeTransport;

    use super::*;

    #[tokio::test]
    async fn emits_an_on_network_to_fiat_segment() {
        let transport = Arc::new(FakeTransport::new().with_response(
            "https://ramp.example/quote?asset=USDC&network=ethereum&fiat=EUR",
            br#"{"feePercent":0.15,"fixedFee":0.0,"rate":0.85}"#.to_vec(),
        ));
        let adapter = OffRampAdapter::new(
            transport,
            "https://ramp.example",
            "ramp_co",
            vec![OffRampRoute { asset: "USDC".into(), network: "ethereum".into(), fiat: "EUR".into() }],
        );

        let segments = adapter.fetch().await.unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from.network.as_deref(), Some("ethereum"));
        assert_eq!(segments[0].to.asset, "EUR");
    }
}
