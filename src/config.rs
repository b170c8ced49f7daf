//! Cache Configuration
//!
//! Configuration structs have public fields for simple instantiation. Build the
//! struct (or start from [`Default`]) and hand it to
//! [`MruCache::init`](crate::MruCache::init).
//!
//! # Sizing
//!
//! `capacity` counts entries, not bytes. Each entry costs the key twice (once
//! in the hash index, once in its recency node), the value, two slot indices
//! and the hash table's own overhead.
//!
//! A capacity of zero is accepted. Such a cache evicts every entry in the
//! same call that inserted it, so it never holds anything and every
//! [`get`](crate::MruCache::get) is a miss.
//!
//! # Examples
//!
//! ```
//! use mru_cache::config::MruCacheConfig;
//! use mru_cache::MruCache;
//!
//! let config = MruCacheConfig { capacity: 10_000 };
//! let cache: MruCache<String, Vec<u8>> = MruCache::init(config, None);
//! assert_eq!(cache.capacity(), 10_000);
//!
//! let cache: MruCache<u64, u64> = MruCache::init(MruCacheConfig::default(), None);
//! assert_eq!(cache.capacity(), 1024);
//! ```

use core::fmt;

/// Capacity used when none is specified.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Configuration for an [`MruCache`](crate::MruCache).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MruCacheConfig {
    /// Maximum number of key-value pairs the cache retains.
    /// Fixed for the lifetime of the cache.
    pub capacity: usize,
}

impl Default for MruCacheConfig {
    fn default() -> Self {
        MruCacheConfig {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl fmt::Debug for MruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
