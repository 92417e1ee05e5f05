/// TTL cache with stale fallback for proxied upstream responses
///
/// Process-wide in-memory store of upstream JSON payloads, one entry per
/// cache key, each with an absolute expiry. An entry past its expiry is no
/// longer served by `get` but stays physically present so `get_stale` can
/// hand it out as a degraded-mode fallback while the upstream is failing.
///
/// The store itself enforces no usage pattern: callers decide the TTL on
/// `set` and when to reach for `get_stale`. There is no eviction beyond
/// overwrite-on-set and the optional `sweep`; handlers performing
/// read-then-write around an upstream call are NOT transactional, so two
/// concurrent requests for the same cold key may both fetch (accepted cache
/// stampede, see the concurrency notes in DESIGN.md).
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logger::{self, LogTag};

/// One cached payload with its expiry
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Shared in-memory TTL cache
///
/// Cheap to clone; clones share the same underlying map. Constructed
/// explicitly and handed to the webserver state rather than living in a
/// global, so tests get isolated instances.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh lookup: the value iff the entry exists and has not expired
    ///
    /// An expired entry is left in place (not deleted) so that `get_stale`
    /// can still serve it if the follow-up fetch fails. Removal of long-dead
    /// entries is the sweep's job.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if Instant::now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store a value, unconditionally overwriting any existing entry
    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Stale lookup: the value regardless of freshness
    ///
    /// Returns None only if the key was never stored, was overwritten away,
    /// or was removed by a sweep.
    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).map(|e| e.value.clone())
    }

    /// Remove entries that have been expired for longer than `grace`
    ///
    /// Entries expired more recently than `grace` survive the sweep and
    /// remain available for stale fallback. Returns the number of entries
    /// removed.
    pub fn sweep(&self, grace: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| now < e.expires_at + grace);
        let removed = before - entries.len();
        if removed > 0 {
            logger::debug(
                LogTag::Cache,
                &format!("Swept {} long-expired entries ({} remain)", removed, entries.len()),
            );
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Derive the cache key for a proxied request
///
/// The key is the logical endpoint id plus a canonical serialization of the
/// query parameters. Parameter keys are sorted so two logically identical
/// requests produce the same key regardless of the order the caller supplied
/// them in.
pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}::{}", endpoint, query)
}
