//! Concurrent Cache Usage Examples
//!
//! Demonstrates sharing one cache between threads. Every operation takes the
//! cache's internal lock, so no extra synchronization is needed.
//!
//! Run with: RUST_LOG=mru_cache=trace cargo run --example concurrent_usage

use mru_cache::config::MruCacheConfig;
use mru_cache::{CacheMetrics, MruCache};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage();
    read_heavy_workload();
    snapshot_while_writing();
}

fn basic_concurrent_usage() {
    println!("--- Basic concurrent usage ---");
    let cache: Arc<MruCache<String, usize>> =
        Arc::new(MruCache::init(MruCacheConfig { capacity: 1_000 }, None));

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1_000 {
                    let key = format!("key-{t}-{i}");
                    cache.set(key.clone(), i);
                    let _ = cache.get(&key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    println!("  entries:  {} / {}", cache.len(), cache.capacity());
    println!("  elapsed:  {:?}", start.elapsed());
    println!("  evictions: {}", cache.metrics()["evictions"]);
    cache
        .verify_integrity()
        .expect("recency ring should be intact");
    println!();
}

fn read_heavy_workload() {
    println!("--- Read-heavy workload ---");
    let cache: Arc<MruCache<u64, u64>> = Arc::new(MruCache::new(500));
    for i in 0..500 {
        cache.set(i, i * i);
    }

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..10_000u64 {
                    let key = (t * 131 + i * 17) % 750;
                    if cache.get(&key).is_none() {
                        cache.set(key, key * key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = cache.metrics();
    println!("  hit rate: {:.2}%", metrics["hit_rate"] * 100.0);
    println!("  requests: {}", metrics["requests"]);
    println!();
}

fn snapshot_while_writing() {
    println!("--- Snapshots during writes ---");
    let cache: Arc<MruCache<usize, usize>> = Arc::new(MruCache::new(8));

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..10_000 {
                cache.set(i % 32, i);
            }
        })
    };

    for _ in 0..3 {
        let keys: Vec<usize> = cache.enumerate().map(|(k, _)| k).collect();
        println!("  most recent first: {keys:?}");
    }

    writer.join().unwrap();
    let keys: Vec<usize> = cache.enumerate().map(|(k, _)| k).collect();
    println!("  final order:       {keys:?}");
}
