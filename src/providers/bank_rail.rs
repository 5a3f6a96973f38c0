use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// Bank-to-bank fiat transfer (SWIFT/ACH/SEPA-shaped), same currency on
/// both ends unless the rail itself performs conversion (`fiat_to != fiat_from`).
pub struct BankRailRoute {
    pub fiat_from: String,
    pub fiat_to: String,
    pub rail_name: String,
}

pub struct BankRailAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    provider_id: &'static str,
    routes: Vec<BankRailRoute>,
}

impl BankRailAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        provider_id: &'static str,
        routes: Vec<BankRailRoute>,
    ) -> Self {
        BankRailAdapter { transport, base_url: base_url.into(), provider_id, routes }
    }
}

#[derive(Debug, Deserialize)]
struct RailQuote {
    #[serde(rename = "feePercent")]
    fee_percent: f64,
    #[serde(rename = "fixedFee")]
    fixed_fee: f64,
    rate: f64,
    #[serde(rename = "etaMinutesMin")]
    eta_minutes_min: f64,
    #[serde(rename = "etaMinutesMax")]
    eta_minutes_max: f64,
}

#[async_trait]
impl ProviderAdapter for BankRailAdapter {
    fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::BankRail
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for route in &self.routes {
            let url = format!(
                "{}/quote?rail={}&from={}&to={}",
                self.base_url, route.rail_name, route.fiat_from, route.fiat_to
            );
            let request = TransportRequest::get(url, Duration::from_secs(2));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: RailQuote = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            segments.push(RouteSegment {
                segment_class: SegmentClass::BankRail,
                from: Node::fiat(&route.fiat_from),
                to: Node::fiat(&route.fiat_to),
                provider: self.provider_id().to_string(),
                cost: Cost { fee_percent: parsed.fee_percent, fixed_fee: parsed.fixed_fee, effective_rate: parsed.rate },
                latency: Latency { min_minutes: parsed.eta_minutes_min, max_minutes: parsed.eta_minutes_max },
                reliability_score: SegmentClass::BankRail.default_reliability(),
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
    async fn emits_a_fiat_to_fiat_segment_with_the_quoted_eta() {
        let transport = Arc::new(FakeTransport::new().with_response(
            "https://swift.example/quote?rail=swift&from=USD&to=EUR",
            br#"{"feePercent":0.1,"fixedFee":15.0,"rate":0.92,"etaMinutesMin":60,"etaMinutesMax":1440}"#.to_vec(),
        ));
        let adapter = BankRailAdapter::new(
            transport,
            "https://swift.example",
            "swift_bank",
            vec![BankRailRoute { fiat_from: "USD".into(), fiat_to: "EUR".into(), rail_name: "swift".into() }],
        );

        let segments = adapter.fetch().await.unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].cost.fixed_fee, 15.0);
        assert_eq!(segments[0].latency.max_minutes, 1440.0);
    }
}
