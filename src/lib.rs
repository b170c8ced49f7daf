#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Structure
//!
//! ```text
//! ┌───────────────────────────── MruCache ─────────────────────────────┐
//! │  parking_lot::Mutex                                                │
//! │  ┌───────────────────────── MruSegment ─────────────────────────┐  │
//! │  │  index: HashMap<K, (slot, V)>     head: Option<slot>         │  │
//! │  │  ring:  Vec<slot> ◀──prev/next──▶ (circular, MRU at head)    │  │
//! │  │  count, capacity, metrics                                    │  │
//! │  └──────────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mru_cache::{CacheMetrics, MruCache};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(MruCache::new(1000));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 let key = format!("{t}-{i}");
//!                 cache.set(key.clone(), i);
//!                 assert_eq!(cache.get(&key), Some(i));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 400);
//! assert_eq!(cache.metrics().get("cache_hits"), Some(&400.0));
//! ```
//!
//! ## Modules
//!
//! - [`mru`]: the cache and its enumeration snapshot
//! - [`config`]: configuration structure
//! - [`metrics`]: metrics collection
//! - [`error`]: error types

#![no_std]

#[cfg(test)]
extern crate scoped_threadpool;

/// Arena-backed recency ring.
///
/// Nodes refer to their neighbours by slot index. This module is internal
/// infrastructure; use [`MruCache`] instead.
pub(crate) mod ring;

/// Cache configuration.
pub mod config;

/// Error types.
pub mod error;

/// Recency-ordered cache implementation.
///
/// Provides a fixed-capacity, internally synchronized cache that evicts the
/// least recently used entry when the capacity is exceeded.
pub mod mru;

/// Cache metrics system.
pub mod metrics;

pub use config::MruCacheConfig;
pub use error::{CacheError, Result};
pub use metrics::CacheMetrics;
pub use mru::{MruCache, Snapshot};

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_threadpool::Pool;

    #[test]
    fn test_scoped_workers_share_cache() {
        let cache: MruCache<u32, u32> = MruCache::new(64);
        let mut pool = Pool::new(4);

        pool.scoped(|scope| {
            for worker in 0..4u32 {
                let cache = &cache;
                scope.execute(move || {
                    for i in 0..100 {
                        let key = worker * 1000 + i;
                        cache.set(key, i);
                        let _ = cache.get(&key);
                    }
                });
            }
        });

        assert_eq!(cache.len(), 64);
        assert!(cache.verify_integrity().is_ok());
    }
}
