use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An opaque asset identifier, always uppercase (e.g. `USD`, `USDC`, `BTC`).
///
/// Assets are not subdivided by network — a stablecoin on two chains is the
/// same `Asset` with two different [`Node`]s (distinguished by `network`).
pub type Asset = String;

/// A settlement medium qualifier, always lowercase (e.g. `ethereum`,
/// `polygon`, `kraken`). `None` denotes a fiat-only rail (bank-side money).
pub type Network = Option<String>;

/// Upper-case an asset symbol and apply the provider alias map.
/// Unknown symbols pass through unchanged (already uppercased).
pub fn normalize_asset(raw: &str) -> Asset {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "XBT" => "BTC".to_string(),
        "WETH" => "ETH".to_string(),
        "USDT0" => "USDT".to_string(),
        other => other.to_string(),
    }
}

/// Lower-case a network identifier.
pub fn normalize_network(raw: Option<&str>) -> Network {
    raw.map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty())
}

/// A graph vertex: the pair (asset, network). `network = None` is a legitimate
/// value — fiat bank-side USD, for instance — distinct from any on-chain asset
/// that happens to share the symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    pub asset: Asset,
    pub network: Network,
}

impl Node {
    pub fn new(asset: impl Into<String>, network: Option<impl Into<String>>) -> Self {
        Node {
            asset: normalize_asset(&asset.into()),
            network: normalize_network(network.map(|n| n.into()).as_deref()),
        }
    }

    /// A fiat node with no network qualifier (e.g. bank-side USD).
    pub fn fiat(asset: impl Into<String>) -> Self {
        Node {
            asset: normalize_asset(&asset.into()),
            network: None,
        }
    }

    /// An on-chain / rail-qualified node.
    pub fn on_network(asset: impl Into<String>, network: impl Into<String>) -> Self {
        Node {
            asset: normalize_asset(&asset.into()),
            network: normalize_network(Some(&network.into())),
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.network {
            Some(net) => write!(f, "{}@{}", self.asset, net),
            None => write!(f, "{}", self.asset),
        }
    }
}
