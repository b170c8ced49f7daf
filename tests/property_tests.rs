//! Randomized Property Tests
//!
//! Drives the cache with seeded random operation sequences and compares it
//! after every step against a straightforward reference model (a vector kept
//! in recency order). Seeds are fixed so failures are reproducible.

use mru_cache::MruCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 8] = [1, 7, 42, 1234, 0xdead_beef, 99_999, 31_337, 2024];
const STEPS: usize = 2_000;

/// Reference model: entries ordered most recently used first.
struct Model {
    capacity: usize,
    entries: Vec<(u32, u32)>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    fn get(&mut self, key: u32) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos);
        self.entries.insert(0, entry);
        Some(entry.1)
    }

    fn set(&mut self, key: u32, value: u32) -> Option<(u32, u32)> {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
            self.entries.insert(0, (key, value));
            return None;
        }
        self.entries.insert(0, (key, value));
        if self.entries.len() > self.capacity {
            self.entries.pop()
        } else {
            None
        }
    }
}

fn run_sequence(seed: u64, capacity: usize, key_space: u32) {
    let mut rng = StdRng::seed_from_u64(seed);
    let cache: MruCache<u32, u32> = MruCache::new(capacity);
    let mut model = Model::new(capacity);

    for step in 0..STEPS {
        let key = rng.gen_range(0..key_space);
        if rng.gen_bool(0.6) {
            let value = rng.gen::<u32>();
            assert_eq!(
                cache.set(key, value),
                model.set(key, value),
                "seed {seed} step {step}: set({key}) evicted a different entry"
            );
            assert_eq!(
                cache.get(&key),
                model.get(key),
                "seed {seed} step {step}: value not readable right after set"
            );
        } else {
            assert_eq!(
                cache.get(&key),
                model.get(key),
                "seed {seed} step {step}: get({key}) disagrees with model"
            );
        }

        assert!(cache.len() <= capacity);
        assert_eq!(cache.len(), model.entries.len());
        let snapshot: Vec<_> = cache.enumerate().collect();
        assert_eq!(
            snapshot, model.entries,
            "seed {seed} step {step}: recency order diverged"
        );
    }

    assert!(cache.verify_integrity().is_ok(), "seed {seed}: ring corrupted");
}

#[test]
fn prop_matches_reference_model_small() {
    for seed in SEEDS {
        run_sequence(seed, 4, 10);
    }
}

#[test]
fn prop_matches_reference_model_large_key_space() {
    for seed in SEEDS {
        run_sequence(seed, 16, 200);
    }
}

#[test]
fn prop_matches_reference_model_capacity_one() {
    for seed in SEEDS {
        run_sequence(seed, 1, 5);
    }
}

#[test]
fn prop_zero_capacity_never_holds_entries() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let cache: MruCache<u32, u32> = MruCache::new(0);
        for _ in 0..500 {
            let key = rng.gen_range(0..50);
            let value = rng.gen::<u32>();
            assert_eq!(cache.set(key, value), Some((key, value)));
            assert_eq!(cache.get(&key), None);
            assert_eq!(cache.len(), 0);
        }
        assert!(cache.verify_integrity().is_ok());
    }
}

#[test]
fn prop_repeated_get_preserves_relative_order() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let cache: MruCache<u32, u32> = MruCache::new(12);
        for _ in 0..40 {
            cache.set(rng.gen_range(0..30), rng.gen());
        }

        let before: Vec<u32> = cache.enumerate().map(|(k, _)| k).collect();
        let touched = before[rng.gen_range(0..before.len())];
        for _ in 0..rng.gen_range(1..5) {
            assert!(cache.get(&touched).is_some());
        }
        let after: Vec<u32> = cache.enumerate().map(|(k, _)| k).collect();

        assert_eq!(after[0], touched);
        let others_before: Vec<_> = before.iter().filter(|&&k| k != touched).collect();
        let others_after: Vec<_> = after.iter().filter(|&&k| k != touched).collect();
        assert_eq!(others_before, others_after, "seed {seed}");
    }
}
