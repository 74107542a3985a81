use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use log::debug;

use crate::error::ApiError;
use crate::metrics;
use crate::types::OptionList;

/// Cache key for the root bank list, which has no parent selection.
pub const BANKS_KEY: &str = "banks";

/// Build a cache key from ordered ancestor selection values.
pub fn cache_key(parts: &[&str]) -> String {
    parts.join("|")
}

/// Process-lifetime memoization of fetched option lists.
///
/// Keyed by the `|`-joined concatenation of ancestor selection values
/// (`"banks"` for the root bank list, then `bank`, `bank|state`,
/// `bank|state|district`). Entries are write-once per key: no TTL, no
/// eviction, no size bound. Results for a given key are deterministic from
/// the server's perspective, so a rare duplicate fill resolving
/// last-write-wins is harmless.
pub struct LookupCache {
    entries: DashMap<String, OptionList>,
    stats: CacheStats,
}

#[derive(Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub cache_size: usize,
}

impl LookupCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached list for `key`, or run `fetcher`, store its result,
    /// and return it.
    ///
    /// A failed fetch is propagated without populating the entry, so a later
    /// request for the same key goes back to the network.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetcher: F) -> Result<OptionList, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OptionList, ApiError>>,
    {
        if let Some(hit) = self.entries.get(key) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            metrics::increment_cache_hit("options");
            debug!("LookupCache: hit for key '{}' ({} options)", key, hit.len());
            return Ok(hit.clone());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        metrics::increment_cache_miss("options");
        debug!("LookupCache: miss for key '{}', fetching", key);

        let list = fetcher().await?;
        self.entries.insert(key.to_string(), list.clone());
        metrics::set_cache_size(self.entries.len() as f64);
        Ok(list)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        let hits = self.stats.hits.load(Ordering::Relaxed);
        let misses = self.stats.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStatsSnapshot {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            cache_size: self.entries.len(),
        }
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionItem;
    use std::sync::atomic::AtomicUsize;

    fn options(names: &[&str]) -> OptionList {
        names.iter().map(|n| OptionItem::plain(*n)).collect()
    }

    #[test]
    fn cache_key_joins_ancestor_values_in_order() {
        assert_eq!(cache_key(&["SBI"]), "SBI");
        assert_eq!(cache_key(&["SBI", "MAHARASHTRA"]), "SBI|MAHARASHTRA");
        assert_eq!(
            cache_key(&["SBI", "MAHARASHTRA", "MUMBAI"]),
            "SBI|MAHARASHTRA|MUMBAI"
        );
    }

    #[tokio::test]
    async fn second_sequential_request_is_served_from_cache() {
        let cache = LookupCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch("SBI", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(options(&["MAHARASHTRA", "WEST BENGAL"]))
            })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("SBI", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(options(&["MAHARASHTRA", "WEST BENGAL"]))
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1, "second request must not fetch");
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.cache_size, 1);
    }

    #[tokio::test]
    async fn failed_fetch_does_not_populate_the_entry() {
        let cache = LookupCache::new();

        let result = cache
            .get_or_fetch("HDFC", || async {
                Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY))
            })
            .await;

        assert!(result.is_err());
        assert!(!cache.contains("HDFC"));

        // A later request for the same key goes back to the network.
        let recovered = cache
            .get_or_fetch("HDFC", || async { Ok(options(&["KERALA"])) })
            .await
            .unwrap();
        assert_eq!(recovered.len(), 1);
        assert!(cache.contains("HDFC"));
    }

    #[tokio::test]
    async fn distinct_keys_are_independent_entries() {
        let cache = LookupCache::new();
        cache
            .get_or_fetch("SBI", || async { Ok(options(&["MAHARASHTRA"])) })
            .await
            .unwrap();
        cache
            .get_or_fetch("SBI|MAHARASHTRA", || async { Ok(options(&["MUMBAI"])) })
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("SBI"));
        assert!(cache.contains("SBI|MAHARASHTRA"));
    }
}
