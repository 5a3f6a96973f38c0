use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// One chain-to-chain route. Bridge quotes are fetched per (asset, source
/// chain, destination chain) triple, LiFi-aggregator-shaped.
pub struct BridgeRoute {
    pub asset: String,
    pub from_chain: String,
    pub to_chain: String,
}

pub struct BridgeAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    routes: Vec<BridgeRoute>,
}

impl BridgeAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, routes: Vec<BridgeRoute>) -> Self {
        BridgeAdapter { transport, base_url: base_url.into(), routes }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "feePercent")]
    fee_percent: f64,
    #[serde(rename = "estimatedSeconds")]
    estimated_seconds: f64,
}

#[async_trait]
impl ProviderAdapter for BridgeAdapter {
    fn provider_id(&self) -> &'static str {
        "lifi"
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::Bridge
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for route in &self.routes {
            let url = format!(
                "{}/quote?token={}&fromChain={}&toChain={}",
                self.base_url, route.asset, route.from_chain, route.to_chain
            );
            let request = TransportRequest::get(url, Duration::from_secs(10));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: QuoteResponse = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            let minutes = parsed.estimated_seconds / 60.0;
            segments.push(RouteSegment {
                segment_class: SegmentClass::Bridge,
                from: Node::on_network(&route.asset, &route.from_chain),
                to: Node::on_network(&route.asset, &route.to_chain),
                provider: self.provider_id().to_string(),
                cost: Cost { fee_percent: parsed.fee_percent, fixed_fee: 0.0, effective_rate: 1.0 },
                latency: Latency { min_minutes: minutes * 0.75, max_minutes: minutes * 1.5 },
                reliability_score: SegmentClass::Bridge.default_reliability(),
                constraints: HashMap::new(),
                observed_at: now,
            });
        }

        Ok(segments)
    }
}
