//! Cache Metrics System
//!
//! Every cache keeps a small set of counters that are updated inside the same
//! critical section as the operation they describe, so a metrics snapshot is
//! always consistent with some point in the cache's history.
//!
//! Metrics are reported as a `BTreeMap<String, f64>` so that key order is
//! deterministic across runs, which keeps log lines and test assertions stable.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod mru;

pub use mru::MruCacheMetrics;

/// Counters shared by every cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups that touch recency (hits + misses)
    pub requests: u64,

    /// Lookups that found a live entry
    pub cache_hits: u64,

    /// Writes that created a new entry
    pub insertions: u64,

    /// Writes that replaced the value of an existing entry
    pub updates: u64,

    /// Entries removed because the capacity was exceeded
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are not stored separately; they are `requests - cache_hits`.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a write that introduced a new key.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a write that replaced the value of a live key.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records the removal of the least-recently-used entry.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Number of lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0.
    ///
    /// Returns 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0.
    ///
    /// Returns 0.0 if no lookups have been made.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a map with deterministic key order.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        let writes = self.insertions + self.updates;
        if writes > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / writes as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for caches.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name identifying the eviction policy (e.g. `"MRU"`).
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_counters() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_insertion();
        metrics.record_update();
        metrics.record_eviction();

        assert_eq!(metrics.requests, 3);
        assert_eq!(metrics.cache_hits, 2);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.insertions, 1);
        assert_eq!(metrics.updates, 1);
        assert_eq!(metrics.evictions, 1);
    }

    #[test]
    fn test_rates_with_no_requests() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert!(!metrics.to_btreemap().contains_key("eviction_rate"));
    }

    #[test]
    fn test_to_btreemap() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_miss();
        metrics.record_miss();
        metrics.record_insertion();
        metrics.record_insertion();
        metrics.record_eviction();

        let map = metrics.to_btreemap();
        assert_eq!(map.get("requests"), Some(&4.0));
        assert_eq!(map.get("cache_hits"), Some(&1.0));
        assert_eq!(map.get("cache_misses"), Some(&3.0));
        assert_eq!(map.get("hit_rate"), Some(&0.25));
        assert_eq!(map.get("miss_rate"), Some(&0.75));
        assert_eq!(map.get("eviction_rate"), Some(&0.5));

        let keys: alloc::vec::Vec<&str> = map.keys().map(String::as_str).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}
