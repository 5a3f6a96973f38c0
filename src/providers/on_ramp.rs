use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// Fiat bank balance into a custodied/on-chain asset, e.g. card or ACH
/// purchase of a stablecoin.
pub struct OnRampRoute {
    pub fiat: String,
    pub asset: String,
    pub network: String,
}

pub struct OnRampAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    provider_id: &'static str,
    routes: Vec<OnRampRoute>,
}

impl OnRampAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        provider_id: &'static str,
        routes: Vec<OnRampRoute>,
    ) -> Self {
        OnRampAdapter { transport, base_url: base_url.into(), provider_id, routes }
    }
}

#[derive(Debug, Deserialize)]
struct OnRampQuote {
    #[serde(rename = "feePercent")]
    fee_percent: f64,
    #[serde(rename = "fixedFee")]
    fixed_fee: f64,
    rate: f64,
}

#[async_trait]
impl ProviderAdapter for OnRampAdapter {
    fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::OnRamp
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for route in &self.routes {
            let url = format!(
                "{}/quote?fiat={}&asset={}&network={}",
                self.base_url, route.fiat, route.asset, route.network
            );
            let request = TransportRequest::get(url, Duration::from_secs(10));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: OnRampQuote = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            segments.push(RouteSegment {
                segment_class: SegmentClass::OnRamp,
                from: Node::fiat(&route.fiat),
                to: Node::on_network(&route.asset, &route.network),
                provider: self.provider_id().to_string(),
                cost: Cost { fee_percent: parsed.fee_percent, fixed_fee: parsed.fixed_fee, effective_rate: parsed.rate },
                latency: Latency { min_minutes: 10.0, max_minutes: 60.0 },
                reliability_score: SegmentClass::OnRamp.default_reliability(),
                constraints: HashMap::new(),
                observed_at: now,
            });
        }

        Ok(segments)
    }
}
