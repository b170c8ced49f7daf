//! Recency-Ordered (MRU) Cache Implementation
//!
//! This module provides a capacity-bounded cache that keeps the most recently
//! touched entries and evicts the least recently touched one once the
//! capacity is exceeded. Functionally it is an LRU cache; the name reflects
//! what it retains rather than what it throws away.
//!
//! # Algorithm
//!
//! Two structures are kept in lock step:
//!
//! - a hash index from key to `(node, value)`, for O(1) lookup
//! - a circular doubly linked *recency ring* of nodes, one per key, with a
//!   `head` marker on the most recently used node
//!
//! Every hit relinks the key's node in front of the current head and makes it
//! the new head. A write of a new key links a fresh node at the head; if that
//! pushes the number of entries over capacity, the node at `head.prev` (the
//! tail, i.e. the least recently used entry) is unlinked and its index entry
//! deleted. Exactly one entry is evicted per write because a write adds at
//! most one entry.
//!
//! ```text
//!   index:  "a" ─▶ (slot 2, 1)    "b" ─▶ (slot 0, 2)    "c" ─▶ (slot 1, 3)
//!
//!   ring:   head ─▶ [2:"a"] ◀──▶ [1:"c"] ◀──▶ [0:"b"] ◀─ head.prev (next victim)
//!              ▲________________________________________│
//! ```
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Set: O(1) amortized
//!   - Enumerate: O(n)
//!
//! - **Space Complexity**:
//!   - O(n) where n is the capacity of the cache
//!   - Each entry stores its key twice (index and ring node) plus two slot indices
//!
//! # Thread Safety
//!
//! [`MruCache`] owns a single `parking_lot::Mutex` that guards the index, the
//! ring, the head marker and the entry count together. Every operation holds
//! it for its full duration, so the two structures can never be observed out
//! of step. There is no lock-free fast path; `get` mutates recency and takes
//! the same lock as `set`.
//!
//! # Zero Capacity
//!
//! A zero-capacity cache is allowed. Each `set` of a new key is counted as an
//! insertion and an eviction and handed straight back, so the entry is never
//! observable and `len()` stays 0.
//!
//! # Keys
//!
//! Keys must implement `Hash + Eq + Clone`. The key is cloned once on insert
//! so that the ring node can identify the index entry to delete on eviction.
//! An absent key cannot be expressed, so there is no runtime key validation.

extern crate alloc;

use crate::config::MruCacheConfig;
use crate::error::{CacheError, Result};
use crate::metrics::{CacheMetrics, MruCacheMetrics};
use crate::ring::Ring;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::{self, Vec};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_map::Entry;
use hashbrown::{DefaultHashBuilder, HashMap};
use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

/// Upper bound on how many entries are allocated up front.
///
/// Large capacities grow on demand instead of reserving everything at
/// construction.
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

/// Index entry: the key's recency node and its cached value.
struct IndexEntry<V> {
    node: usize,
    value: V,
}

/// Moves `node` to the head of the ring. A node that already is the head
/// stays where it is.
fn promote<K>(ring: &mut Ring<K>, head: &mut Option<usize>, node: usize) {
    if *head == Some(node) {
        return;
    }
    ring.unlink(node);
    ring.link_before(node, *head);
    *head = Some(node);
}

/// Unsynchronized cache state.
///
/// Holds the hash index, the recency ring, the head marker and the entry
/// count. [`MruCache`] wraps exactly one of these in a mutex; everything here
/// assumes it has exclusive access.
pub(crate) struct MruSegment<K, V, S = DefaultHashBuilder> {
    index: HashMap<K, IndexEntry<V>, S>,
    ring: Ring<K>,
    head: Option<usize>,
    count: usize,
    capacity: usize,
    metrics: MruCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> MruSegment<K, V, S> {
    pub(crate) fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        // One spare slot: a write may briefly hold capacity + 1 entries
        // before the tail is evicted.
        let prealloc = capacity.saturating_add(1).min(MAX_PREALLOCATED_ENTRIES);
        MruSegment {
            index: HashMap::with_capacity_and_hasher(prealloc, hash_builder),
            ring: Ring::with_capacity(prealloc),
            head: None,
            count: 0,
            capacity,
            metrics: MruCacheMetrics::new(capacity),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn metrics(&self) -> MruCacheMetrics {
        MruCacheMetrics {
            len: self.count,
            ..self.metrics.clone()
        }
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(entry) = self.index.get(key) else {
            self.metrics.core.record_miss();
            return None;
        };
        promote(&mut self.ring, &mut self.head, entry.node);
        self.metrics.core.record_hit();
        Some(&entry.value)
    }

    /// Looks up `key` without touching recency or metrics.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.get(key).map(|entry| &entry.value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Inserts or replaces `key`, making it the most recently used entry.
    ///
    /// Returns the evicted entry when the write pushed the cache over capacity.
    ///
    /// User `Hash`, `Eq` and `Clone` only run while the index and the ring
    /// agree, so a panic in any of them leaves the segment consistent.
    pub(crate) fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(entry) = self.index.get_mut(&key) {
            entry.value = value;
            let node = entry.node;
            promote(&mut self.ring, &mut self.head, node);
            self.metrics.core.record_update();
            return None;
        }

        self.metrics.core.record_insertion();
        if self.capacity == 0 {
            self.metrics.core.record_eviction();
            trace!(capacity = 0, "evicted entry from zero-capacity cache");
            return Some((key, value));
        }

        let evicted = if self.count >= self.capacity {
            self.evict()
        } else {
            None
        };

        // After this no insert below rehashes
        self.index.reserve(1);
        match self.index.entry(key) {
            Entry::Vacant(vacant) => {
                let node = self.ring.insert(vacant.key().clone());
                self.ring.link_before(node, self.head);
                self.head = Some(node);
                vacant.insert(IndexEntry { node, value });
                self.count += 1;
            }
            // Only reachable with an `Eq` that disagrees with itself
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().value = value;
                let node = occupied.get().node;
                promote(&mut self.ring, &mut self.head, node);
            }
        }
        evicted
    }

    /// Reserves room for `additional` more entries in both the index and the
    /// ring. On error nothing has been modified.
    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.index
            .try_reserve(additional)
            .map_err(|_| CacheError::AllocationFailed { additional })?;
        self.ring
            .try_reserve(additional)
            .map_err(|_| CacheError::AllocationFailed { additional })
    }

    /// Like [`set`](Self::set), but reserves room first and reports allocation
    /// failure instead of aborting. On error nothing has been modified.
    pub(crate) fn try_set(&mut self, key: K, value: V) -> Result<Option<(K, V)>> {
        self.try_reserve(1)?;
        Ok(self.set(key, value))
    }

    /// Removes the least recently used entry, the one at `head.prev`.
    ///
    /// The index entry goes first: its lookup runs user `Eq`, and the ring is
    /// only touched once that has returned.
    fn evict(&mut self) -> Option<(K, V)> {
        let head = self.head?;
        let tail = self.ring.prev(head);
        let entry = self.index.remove(self.ring.key(tail))?;
        if tail == head {
            self.head = None;
        }
        let key = self.ring.release(tail);
        self.count -= 1;
        self.metrics.core.record_eviction();
        trace!(
            capacity = self.capacity,
            len = self.count,
            "evicted least recently used entry"
        );
        Some((key, entry.value))
    }

    /// Walks the ring from the head, most recently used first.
    pub(crate) fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            segment: self,
            cursor: self.head,
            remaining: self.count,
        }
    }

    /// Checks that the index, the ring, the head and the count agree.
    pub(crate) fn verify(&self) -> Result<()> {
        let corrupted = |reason: String| Err(CacheError::Corrupted { reason });

        if self.count != self.index.len() {
            return corrupted(format!(
                "count {} does not match index size {}",
                self.count,
                self.index.len()
            ));
        }
        if self.count != self.ring.len() {
            return corrupted(format!(
                "count {} does not match ring size {}",
                self.count,
                self.ring.len()
            ));
        }
        if self.count > self.capacity {
            return corrupted(format!(
                "count {} exceeds capacity {}",
                self.count, self.capacity
            ));
        }

        let head = match (self.head, self.count) {
            (None, 0) => return Ok(()),
            (None, count) => return corrupted(format!("no head but count is {count}")),
            (Some(_), 0) => return corrupted(String::from("head set on an empty cache")),
            (Some(head), _) => head,
        };

        let mut cursor = head;
        for step in 0..self.count {
            if step > 0 && cursor == head {
                return corrupted(format!(
                    "ring returned to head after {step} of {} nodes",
                    self.count
                ));
            }
            let Some(node) = self.ring.get(cursor) else {
                return corrupted(format!("ring slot {cursor} is vacant at step {step}"));
            };
            match self.index.get(node.key()) {
                Some(entry) if entry.node == cursor => {}
                _ => {
                    return corrupted(format!(
                        "ring slot {cursor} has no matching index entry"
                    ))
                }
            }
            let next = node.next();
            match self.ring.get(next) {
                Some(next_node) if next_node.prev() == cursor => {}
                _ => {
                    return corrupted(format!(
                        "ring slot {next} does not link back to slot {cursor}"
                    ))
                }
            }
            cursor = next;
        }

        if cursor != head {
            return corrupted(format!(
                "ring did not return to head after {} nodes",
                self.count
            ));
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for MruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MruSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.count)
            .finish()
    }
}

/// Borrowing iterator over a segment in recency order.
pub(crate) struct Iter<'a, K, V, S> {
    segment: &'a MruSegment<K, V, S>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let segment = self.segment;
        let idx = self.cursor?;
        let key = segment.ring.key(idx);
        let entry = segment.index.get(key)?;
        self.remaining -= 1;
        self.cursor = Some(segment.ring.next(idx));
        Some((key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// A thread-safe, capacity-bounded cache that retains the most recently used
/// entries.
///
/// All operations take `&self` and serialize on one internal mutex, so the
/// cache can be shared between threads behind an `Arc` without any extra
/// wrapping. Operations are totally ordered by lock acquisition.
///
/// # Examples
///
/// ```
/// use mru_cache::MruCache;
///
/// let cache = MruCache::new(2);
///
/// cache.set("apple", 1);
/// cache.set("banana", 2);
///
/// // Touching "apple" makes "banana" the least recently used entry
/// assert_eq!(cache.get(&"apple"), Some(1));
///
/// // Exceeding the capacity evicts it
/// cache.set("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
///
/// let order: Vec<_> = cache.enumerate().collect();
/// assert_eq!(order, vec![("cherry", 3), ("apple", 1)]);
/// ```
pub struct MruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<MruSegment<K, V, S>>,
}

impl<K: Hash + Eq + Clone, V> MruCache<K, V, DefaultHashBuilder> {
    /// Creates a cache that holds at most `capacity` entries.
    ///
    /// A capacity of 0 is valid: every write is evicted immediately.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration specifying the capacity
    /// * `hasher` - Optional custom hash builder. If `None`, uses `DefaultHashBuilder`
    pub fn init(config: MruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq + Clone, V> Default for MruCache<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::init(MruCacheConfig::default(), None)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> MruCache<K, V, S> {
    /// Creates a cache with a custom hash builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        debug!(capacity, "creating MRU cache");
        Self {
            segment: Mutex::new(MruSegment::with_hasher(capacity, hash_builder)),
        }
    }

    /// Creates a cache from a configuration and a custom hash builder.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration specifying the capacity
    /// * `hash_builder` - Hash builder used by the index
    pub fn init_with_hasher(config: MruCacheConfig, hash_builder: S) -> Self {
        Self::with_hasher(config.capacity, hash_builder)
    }

    /// Maximum number of entries the cache retains.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segment.lock().cap()
    }

    /// Number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Retrieves a clone of the value for `key`.
    ///
    /// On a hit the entry becomes the most recently used and a hit is
    /// recorded. On a miss a miss is recorded; a miss is a normal outcome,
    /// not an error.
    ///
    /// # Returns
    ///
    /// - `Some(value)` if the key is cached
    /// - `None` if the key was not found
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Retrieves the value for `key` and applies `f` to it while the lock is
    /// held, avoiding a clone.
    ///
    /// Recency and hit/miss accounting are the same as [`get`](Self::get).
    /// `f` must not call back into this cache; the lock is not reentrant.
    ///
    /// # Returns
    ///
    /// - `Some(f(&value))` if the key is cached
    /// - `None` if the key was not found, in which case `f` is not called
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Retrieves a clone of the value for `key` without changing its recency
    /// or the hit/miss counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` has a live entry. Does not change recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Inserts or replaces the value for `key` and makes it the most recently
    /// used entry.
    ///
    /// Writing an existing key reuses its recency node and never evicts. A new
    /// key that pushes the cache over capacity evicts exactly one entry, the
    /// least recently used. Ignoring the return value is fine.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to cache
    ///
    /// # Returns
    ///
    /// - `Some((evicted_key, evicted_value))` if the write evicted an entry
    /// - `None` otherwise
    pub fn set(&self, key: K, value: V) -> Option<(K, V)> {
        self.segment.lock().set(key, value)
    }

    /// Like [`set`](Self::set), but returns [`CacheError::AllocationFailed`]
    /// instead of aborting when the cache cannot grow.
    ///
    /// # Errors
    ///
    /// [`CacheError::AllocationFailed`] if room for one more entry could not
    /// be reserved. The cache is unchanged in that case.
    pub fn try_set(&self, key: K, value: V) -> Result<Option<(K, V)>> {
        self.segment
            .lock()
            .try_set(key, value)
            .inspect_err(|err| warn!(%err, "cache write rejected"))
    }

    /// Returns a snapshot of every entry, most recently used first.
    ///
    /// The snapshot is taken under the lock and owns its data, so the cache
    /// can be used freely while iterating. Taking a snapshot does not change
    /// recency. An empty cache yields an empty snapshot.
    pub fn enumerate(&self) -> Snapshot<K, V>
    where
        V: Clone,
    {
        let segment = self.segment.lock();
        let mut entries = Vec::with_capacity(segment.len());
        entries.extend(segment.iter().map(|(k, v)| (k.clone(), v.clone())));
        Snapshot {
            entries: entries.into_iter(),
        }
    }

    /// Walks the recency ring and checks that it agrees with the hash index,
    /// the entry count and the capacity.
    ///
    /// # Errors
    ///
    /// [`CacheError::Corrupted`] describing the first violation found.
    pub fn verify_integrity(&self) -> Result<()> {
        self.segment
            .lock()
            .verify()
            .inspect_err(|err| error!(%err, "cache integrity check failed"))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for MruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "MRU"
    }
}

impl<K, V, S> fmt::Debug for MruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment.try_lock() {
            Some(segment) => f
                .debug_struct("MruCache")
                .field("capacity", &segment.capacity)
                .field("len", &segment.count)
                .finish(),
            None => f
                .debug_struct("MruCache")
                .field("segment", &"<locked>")
                .finish(),
        }
    }
}

/// Owned snapshot of a cache's entries, most recently used first.
///
/// Produced by [`MruCache::enumerate`]. It can be consumed once; reversing it
/// yields least recently used first.
#[derive(Debug)]
pub struct Snapshot<K, V> {
    entries: vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for Snapshot<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Snapshot<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for Snapshot<K, V> {}

impl<K, V> FusedIterator for Snapshot<K, V> {}
