/// Mining pool statistics provider endpoints
///
/// The provider is unofficial and its response schema shifts between coins;
/// the typed model below keeps every field optional and carries unknown
/// fields through untouched. The proxy itself passes the raw JSON along
/// verbatim, the model is only used for summary logging and by consumers
/// that want the few stable fields.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use super::endpoint_url;
use crate::errors::ProxyError;

/// `GET <base>/api/coin/<slug>`; the slug is percent-encoded into the path
pub fn coin_url(base: &str, slug: &str) -> Result<Url, ProxyError> {
    endpoint_url(base, &["api", "coin", slug], &[])
}

/// One pool entry for a coin
#[derive(Debug, Clone, Deserialize)]
pub struct MiningPool {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Pool hashrate in H/s when the provider reports it
    #[serde(default)]
    pub hashrate: Option<f64>,
    #[serde(default)]
    pub miners: Option<u64>,
    /// Reported as either a number or a string like "1%"
    #[serde(default)]
    pub pool_fee: Option<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Per-coin statistics document
#[derive(Debug, Clone, Deserialize)]
pub struct MiningCoinData {
    #[serde(default)]
    pub coin: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    /// Network hashrate in H/s when the provider reports it
    #[serde(default)]
    pub network_hashrate: Option<f64>,
    #[serde(default)]
    pub pools: Option<Vec<MiningPool>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl MiningCoinData {
    pub fn pool_count(&self) -> usize {
        self.pools.as_ref().map(|p| p.len()).unwrap_or(0)
    }
}
