//! MRU Cache Metrics
//!
//! Metrics for the recency-ordered cache. On top of the core counters this
//! reports the configured capacity and the current fill level.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Metrics for an [`MruCache`](crate::MruCache).
#[derive(Debug, Clone, PartialEq)]
pub struct MruCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Entries held when the snapshot was taken
    pub len: usize,
}

impl MruCacheMetrics {
    /// Creates metrics for a cache of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            capacity,
            len: 0,
        }
    }

    /// Fraction of the capacity in use, or 0.0 for a zero-capacity cache.
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.len as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Converts the metrics to a map with deterministic key order.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("len".to_string(), self.len as f64);
        metrics.insert("utilization".to_string(), self.utilization());
        metrics
    }
}

impl CacheMetrics for MruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "MRU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization() {
        let mut metrics = MruCacheMetrics::new(4);
        assert_eq!(metrics.utilization(), 0.0);
        metrics.len = 3;
        assert_eq!(metrics.utilization(), 0.75);

        let empty = MruCacheMetrics::new(0);
        assert_eq!(empty.utilization(), 0.0);
    }

    #[test]
    fn test_report_includes_core_and_fill() {
        let mut metrics = MruCacheMetrics::new(2);
        metrics.core.record_hit();
        metrics.len = 1;

        let report = metrics.metrics();
        assert_eq!(report.get("cache_hits"), Some(&1.0));
        assert_eq!(report.get("capacity"), Some(&2.0));
        assert_eq!(report.get("len"), Some(&1.0));
        assert_eq!(report.get("utilization"), Some(&0.5));
        assert_eq!(metrics.algorithm_name(), "MRU");
    }
}
