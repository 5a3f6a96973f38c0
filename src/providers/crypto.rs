use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{Cost, Latency, Node, RouteSegment, SegmentClass};

use super::{classify_transport_error, ProviderAdapter};

/// Crypto-to-crypto / crypto-to-stable conversion, shaped after the
/// teacher's `fetch_data::source::hyperliquid` candle fetcher: one request
/// per coin, last close used as the quoted rate.
pub struct CryptoAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    pairs: Vec<(String, String)>,
}

impl CryptoAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, pairs: Vec<(String, String)>) -> Self {
        CryptoAdapter { transport, base_url: base_url.into(), pairs }
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(rename = "lastPrice")]
    last_price: String,
}

#[async_trait]
impl ProviderAdapter for CryptoAdapter {
    fn provider_id(&self) -> &'static str {
        "kraken"
    }

    fn segment_class(&self) -> SegmentClass {
        SegmentClass::Crypto
    }

    async fn fetch(&self) -> CoreResult<Vec<RouteSegment>> {
        let mut segments = Vec::new();
        let now = chrono::Utc::now();

        for (base, quote) in &self.pairs {
            let url = format!("{}/ticker?pair={}{}", self.base_url, base, quote);
            let request = TransportRequest::get(url, Duration::from_secs(10));
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(self.provider_id(), e))?;

            let parsed: TickerResponse = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: self.provider_id().into(), message: e.to_string() })?;

            let rate: f64 = parsed.last_price.parse().map_err(|_| CoreError::ProviderPermanent {
                provider: self.provider_id().into(),
                message: format!("unparseable price `{}`", parsed.last_price),
            })?;

            segments.push(RouteSegment {
                segment_class: SegmentClass::Crypto,
                from: Node::on_network(base, "kraken"),
                to: Node::on_network(quote, "kraken"),
                provider: self.provider_id().to_string(),
                cost: Cost { fee_percent: 0.26, fixed_fee: 0.0, effective_rate: rate },
                latency: Latency { min_minutes: 0.5, max_minutes: 2.0 },
                reliability_score: SegmentClass::Crypto.default_reliability(),
                constraints: HashMap::new(),
                observed_at: now,
            });
        }

        Ok(segments)
    }
}
