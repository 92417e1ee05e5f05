/// Market data provider endpoints (CoinGecko-compatible)
///
/// Two lookups are proxied: the full market listing (price, market cap,
/// volume, percentage changes) and the lightweight simple-price lookup.
/// Query parameters are normalized here so logically identical requests
/// serialize, and therefore cache, identically.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use super::endpoint_url;
use crate::errors::ProxyError;

/// Upstream caps listing pages at 250 rows
pub const MAX_PER_PAGE: u32 = 250;

/// Normalized query set for `/coins/markets`
pub fn markets_params(ids: &str, vs_currency: &str, per_page: u32, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("ids", ids.to_string()),
        ("vs_currency", vs_currency.to_string()),
        ("per_page", per_page.min(MAX_PER_PAGE).to_string()),
        ("page", page.to_string()),
        ("sparkline", "false".to_string()),
        ("price_change_percentage", "1h,24h,7d".to_string()),
    ]
}

/// Normalized query set for `/simple/price`
pub fn price_params(ids: &str, vs_currencies: &str) -> Vec<(&'static str, String)> {
    vec![
        ("ids", ids.to_string()),
        ("vs_currencies", vs_currencies.to_string()),
        ("include_market_cap", "true".to_string()),
        ("include_24hr_vol", "true".to_string()),
        ("include_24hr_change", "true".to_string()),
    ]
}

pub fn markets_url(base: &str, params: &[(&'static str, String)]) -> Result<Url, ProxyError> {
    endpoint_url(base, &["coins", "markets"], params)
}

pub fn price_url(base: &str, params: &[(&'static str, String)]) -> Result<Url, ProxyError> {
    endpoint_url(base, &["simple", "price"], params)
}

/// One row of the market listing
///
/// Only the fields the service inspects are typed; everything else the
/// upstream sends rides along in `extra`. All numeric fields are optional
/// because the upstream omits or nulls them for thinly traded coins.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
