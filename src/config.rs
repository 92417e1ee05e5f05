/// Runtime configuration for Hashfolio
///
/// All settings have compiled-in defaults; an optional TOML file
/// (`hashfolio.toml` or `--config <path>`) can override any subset of them.
/// Per-endpoint cache TTLs and retry policies live here so the proxy call
/// sites stay free of magic numbers.
use serde::{Deserialize, Serialize};

use crate::arguments;
use crate::logger::{self, LogTag};

const DEFAULT_CONFIG_PATH: &str = "hashfolio.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Demo-tier market data API (CoinGecko-compatible)
const DEFAULT_MARKET_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Unofficial mining pool statistics API; schema is unstable, handled loosely
const DEFAULT_MINING_BASE_URL: &str = "https://miningpoolstats.stream";

/// Upstreams can be slow with large datasets, 20s recommended
const DEFAULT_TIMEOUT_SECS: u64 = 20;

const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub market: MarketConfig,
    pub mining: MiningConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Market data provider settings
///
/// Listings change slower than spot prices, so the two endpoints carry
/// separate TTLs (60s vs 30s).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,
    pub markets_ttl_secs: u64,
    pub price_ttl_secs: u64,
    pub retries: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_BASE_URL.to_string(),
            markets_ttl_secs: 60,
            price_ttl_secs: 30,
            retries: DEFAULT_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Mining pool statistics provider settings
///
/// Network hashrate moves slowly; 120s keeps us well under the provider's
/// rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub base_url: String,
    pub ttl_secs: u64,
    pub retries: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MINING_BASE_URL.to_string(),
            ttl_secs: 120,
            retries: DEFAULT_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Periodic cache sweep settings
///
/// Entries stay retrievable after expiry for stale fallback; the sweep only
/// removes entries that have been expired for longer than `sweep_grace_secs`,
/// so a recent payload remains available through short upstream outages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub sweep_enabled: bool,
    pub sweep_interval_secs: u64,
    pub sweep_grace_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_enabled: true,
            sweep_interval_secs: 300,
            sweep_grace_secs: 3600,
        }
    }
}

impl Config {
    /// Load configuration, merging the optional TOML file over the defaults
    ///
    /// A missing file is normal (defaults apply); a file that exists but
    /// fails to parse is reported and ignored rather than aborting startup.
    pub fn load() -> Self {
        let explicit = arguments::get_config_path();
        let path = explicit
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        match std::fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str::<Config>(&raw) {
                Ok(config) => {
                    logger::info(
                        LogTag::Config,
                        &format!("✅ Loaded configuration from {}", path),
                    );
                    config
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Config,
                        &format!("⚠️ Failed to parse {}: {} - using defaults", path, e),
                    );
                    Config::default()
                }
            },
            Err(e) => {
                if explicit.is_some() {
                    logger::warning(
                        LogTag::Config,
                        &format!("⚠️ Cannot read {}: {} - using defaults", path, e),
                    );
                } else {
                    logger::debug(LogTag::Config, "No configuration file found, using defaults");
                }
                Config::default()
            }
        }
    }
}
