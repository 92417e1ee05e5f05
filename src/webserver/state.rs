/// Shared application state for the webserver
///
/// Owns the response cache, the per-upstream HTTP clients and the endpoint
/// proxy settings derived from configuration. Handed to all route handlers
/// as an Arc.
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::fetch::RetryPolicy;
use crate::logger::LogTag;
use crate::proxy::EndpointSpec;

/// Proxy settings for each upstream endpoint family
pub struct Endpoints {
    pub markets: EndpointSpec,
    pub price: EndpointSpec,
    pub mining: EndpointSpec,
}

/// Shared application state passed to all route handlers
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: CacheStore,
    pub market_http: Client,
    pub mining_http: Client,
    pub endpoints: Endpoints,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state from loaded configuration
    pub fn new(config: Config) -> Result<Self, String> {
        let market_http = build_client(config.market.timeout_secs)?;
        let mining_http = build_client(config.mining.timeout_secs)?;

        let endpoints = Endpoints {
            markets: EndpointSpec {
                name: "market.coins",
                tag: LogTag::Market,
                ttl: Duration::from_secs(config.market.markets_ttl_secs),
                retry: RetryPolicy::new(config.market.retries, config.market.base_delay_ms),
            },
            price: EndpointSpec {
                name: "market.price",
                tag: LogTag::Market,
                ttl: Duration::from_secs(config.market.price_ttl_secs),
                retry: RetryPolicy::new(config.market.retries, config.market.base_delay_ms),
            },
            mining: EndpointSpec {
                name: "mining.coin",
                tag: LogTag::Mining,
                ttl: Duration::from_secs(config.mining.ttl_secs),
                retry: RetryPolicy::new(config.mining.retries, config.mining.base_delay_ms),
            },
        };

        Ok(Self {
            config: Arc::new(config),
            cache: CacheStore::new(),
            market_http,
            mining_http,
            endpoints,
            startup_time: Utc::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}

fn build_client(timeout_secs: u64) -> Result<Client, String> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}
