/// Proxy flow shared by the upstream request handlers
///
/// Composes the TTL cache and the retrying fetcher into one sequence:
/// consult the cache, fetch on a miss, populate the cache on success, and
/// degrade to a stale entry when the upstream is rate-limiting or failing.
/// The goal is that a usable cached value always beats surfacing an
/// upstream outage to the client.
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::cache::{cache_key, CacheStore};
use crate::fetch::{fetch_with_retry, RetryPolicy};
use crate::logger::{self, LogTag};

/// Per-endpoint proxy settings
///
/// `name` is the logical endpoint id used for cache key derivation; it must
/// be unique per upstream endpoint family.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub tag: LogTag,
    pub ttl: Duration,
    pub retry: RetryPolicy,
}

/// How a successfully served payload was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Fetched from the upstream just now
    Fresh,
    /// Served from a fresh cache entry, no upstream call
    CacheHit,
    /// Served from an expired cache entry because the upstream is failing
    Stale,
}

/// Outcome of one proxied request
#[derive(Debug)]
pub enum ProxyOutcome {
    /// Usable JSON payload
    Payload {
        body: Value,
        source: ServeSource,
        ttl: Duration,
    },
    /// Upstream answered with a non-success status that is passed through
    UpstreamError { status: u16, body: String },
    /// The request could not be completed at all (network exhausted after
    /// retries with no stale entry, or an unparseable success payload)
    Failed { message: String },
}

/// Run the full cache → fetch → stale-fallback sequence for one request
///
/// `params` is the normalized parameter set identifying the request; it is
/// used for cache key derivation only (the caller has already baked the
/// parameters into `url`).
pub async fn proxy_json(
    client: &Client,
    cache: &CacheStore,
    spec: &EndpointSpec,
    url: Url,
    params: &[(&'static str, String)],
) -> ProxyOutcome {
    let key = cache_key(spec.name, params);

    if let Some(body) = cache.get(&key) {
        logger::debug(spec.tag, &format!("Cache hit for {}", key));
        return ProxyOutcome::Payload {
            body,
            source: ServeSource::CacheHit,
            ttl: spec.ttl,
        };
    }

    match fetch_with_retry(client, url, &spec.retry).await {
        Ok(response) => {
            let status = response.status();

            if status.is_success() {
                return match response.json::<Value>().await {
                    Ok(body) => {
                        cache.set(&key, body.clone(), spec.ttl);
                        logger::debug(spec.tag, &format!("Fetched and cached {}", key));
                        ProxyOutcome::Payload {
                            body,
                            source: ServeSource::Fresh,
                            ttl: spec.ttl,
                        }
                    }
                    Err(e) => {
                        logger::warning(
                            spec.tag,
                            &format!("⚠️ Unparseable payload for {}: {}", key, e),
                        );
                        ProxyOutcome::Failed {
                            message: format!("invalid upstream JSON: {}", e),
                        }
                    }
                };
            }

            let code = status.as_u16();
            let body = response.text().await.unwrap_or_else(|_| String::new());

            // Rate limiting and server errors are the degraded-service
            // cases; anything else is the upstream's verdict on the request
            // itself and is passed through untouched.
            if code == 429 || code >= 500 {
                if let Some(stale) = cache.get_stale(&key) {
                    logger::warning(
                        spec.tag,
                        &format!("⚠️ Upstream {} for {}, serving stale entry", code, key),
                    );
                    return ProxyOutcome::Payload {
                        body: stale,
                        source: ServeSource::Stale,
                        ttl: spec.ttl,
                    };
                }
            }

            ProxyOutcome::UpstreamError { status: code, body }
        }
        Err(e) => {
            if let Some(stale) = cache.get_stale(&key) {
                logger::warning(
                    spec.tag,
                    &format!("⚠️ Upstream unreachable for {}, serving stale entry: {}", key, e),
                );
                return ProxyOutcome::Payload {
                    body: stale,
                    source: ServeSource::Stale,
                    ttl: spec.ttl,
                };
            }
            ProxyOutcome::Failed {
                message: format!("upstream unreachable after retries: {}", e),
            }
        }
    }
}
