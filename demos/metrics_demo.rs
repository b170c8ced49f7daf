//! Cache Metrics Demonstration
//!
//! Runs a small workload against a capacity-3 cache and prints the metrics
//! report, then shows the recency order the workload produced.

use mru_cache::{CacheMetrics, MruCache};
use std::collections::BTreeMap;

fn main() {
    println!("Cache Metrics Demonstration");
    println!("===========================\n");

    let cache = MruCache::new(3);

    // Insert 5 items into a cache that holds 3
    for (i, fruit) in ["apple", "banana", "cherry", "date", "elderberry"]
        .into_iter()
        .enumerate()
    {
        if let Some((evicted, _)) = cache.set(fruit, i) {
            println!("  set {fruit:<10} evicted {evicted}");
        } else {
            println!("  set {fruit:<10}");
        }
    }

    // Access pattern: hits and misses
    for fruit in ["cherry", "apple", "elderberry", "cherry", "fig"] {
        match cache.get(&fruit) {
            Some(value) => println!("  get {fruit:<10} hit  ({value})"),
            None => println!("  get {fruit:<10} miss"),
        }
    }

    // Insert 2 more to trigger further evictions
    cache.set("grape", 5);
    cache.set("honeydew", 6);

    println!();
    print_metrics(cache.algorithm_name(), &cache.metrics());

    println!("\nRecency order (most recent first):");
    for (position, (key, value)) in cache.enumerate().enumerate() {
        println!("  {position}. {key} = {value}");
    }
}

fn print_metrics(name: &str, metrics: &BTreeMap<String, f64>) {
    println!("{name} metrics:");
    for (key, value) in metrics {
        if key.ends_with("rate") || key == "utilization" {
            println!("  {key:<14} {:>6.1}%", value * 100.0);
        } else {
            println!("  {key:<14} {value:>7}");
        }
    }
}
