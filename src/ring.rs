//! Arena-backed recency ring.
//!
//! Every live cache key owns one node in a circular doubly linked list that
//! records access order. Nodes are stored in a slab and refer to their
//! neighbours by slot index instead of by pointer, so relinking and eviction
//! are plain index updates and no node can outlive the arena that owns it.
//!
//! ```text
//!            prev <--  --> next
//!   ┌─────────────────────────────────────────────┐
//!   └─▶ [head] ◀──▶ [ b ] ◀──▶ [ c ] ◀──▶ [tail] ─┘
//!        MRU                               LRU
//! ```
//!
//! A node is either *unlinked*, in which case `prev` and `next` both point back
//! at the node itself (a ring of one), or linked into exactly one ring. The
//! ring does not track which node is the head; that is the owner's job.

extern crate alloc;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt;

/// A single participant in the recency ring.
#[derive(Debug)]
pub(crate) struct Node<K> {
    key: K,
    prev: usize,
    next: usize,
}

impl<K> Node<K> {
    /// The key this node represents. Immutable for the lifetime of the node.
    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn prev(&self) -> usize {
        self.prev
    }

    #[inline]
    pub(crate) fn next(&self) -> usize {
        self.next
    }
}

#[derive(Debug)]
enum Slot<K> {
    Occupied(Node<K>),
    Vacant { next_free: Option<usize> },
}

/// Slab of recency nodes addressed by slot index.
///
/// Freed slots are threaded onto an intrusive free list and handed out again
/// by [`Ring::insert`], so the slab never grows past the peak number of live
/// nodes.
pub(crate) struct Ring<K> {
    slots: Vec<Slot<K>>,
    free_head: Option<usize>,
    live: usize,
}

impl<K> Ring<K> {
    /// Creates an empty ring with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Ring {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live nodes, linked or not.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Makes sure `additional` more nodes can be inserted without allocating.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let vacant = self.slots.len() - self.live;
        self.slots.try_reserve(additional.saturating_sub(vacant))
    }

    /// Allocates an unlinked node for `key` and returns its slot index.
    pub(crate) fn insert(&mut self, key: K) -> usize {
        let idx = match self.free_head {
            Some(idx) => {
                self.free_head = match self.slots[idx] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at live slot {idx}"),
                };
                idx
            }
            None => {
                self.slots.push(Slot::Vacant { next_free: None });
                self.slots.len() - 1
            }
        };
        self.slots[idx] = Slot::Occupied(Node {
            key,
            prev: idx,
            next: idx,
        });
        self.live += 1;
        idx
    }

    /// Returns the node at `idx`, or `None` if the slot is vacant or out of range.
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Option<&Node<K>> {
        match self.slots.get(idx) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline]
    fn node(&self, idx: usize) -> &Node<K> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("ring slot {idx} is vacant"),
        }
    }

    #[inline]
    fn node_mut(&mut self, idx: usize) -> &mut Node<K> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("ring slot {idx} is vacant"),
        }
    }

    #[inline]
    pub(crate) fn key(&self, idx: usize) -> &K {
        &self.node(idx).key
    }

    #[inline]
    pub(crate) fn next(&self, idx: usize) -> usize {
        self.node(idx).next
    }

    #[inline]
    pub(crate) fn prev(&self, idx: usize) -> usize {
        self.node(idx).prev
    }

    /// Returns `true` if the node is a ring of one.
    #[inline]
    pub(crate) fn is_unlinked(&self, idx: usize) -> bool {
        let node = self.node(idx);
        node.prev == idx && node.next == idx
    }

    /// Detaches the node from whatever ring it is part of and turns it into a
    /// ring of one. Does nothing if the node is already unlinked.
    pub(crate) fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        if prev == idx && next == idx {
            return;
        }
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
        let node = self.node_mut(idx);
        node.prev = idx;
        node.next = idx;
    }

    /// Inserts an unlinked node immediately before `target`, so that the node
    /// becomes `target.prev`. With no target the node stays a ring of one.
    pub(crate) fn link_before(&mut self, idx: usize, target: Option<usize>) {
        debug_assert!(self.is_unlinked(idx), "link_before on a linked node");
        let Some(target) = target.filter(|&t| t != idx) else {
            return;
        };
        let before = self.node(target).prev;
        {
            let node = self.node_mut(idx);
            node.prev = before;
            node.next = target;
        }
        self.node_mut(before).next = idx;
        self.node_mut(target).prev = idx;
    }

    /// Unlinks the node, frees its slot and hands the key back.
    pub(crate) fn release(&mut self, idx: usize) -> K {
        self.unlink(idx);
        let slot = core::mem::replace(
            &mut self.slots[idx],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(idx);
        self.live -= 1;
        match slot {
            Slot::Occupied(node) => node.key,
            Slot::Vacant { .. } => unreachable!("released vacant ring slot {idx}"),
        }
    }
}

impl<K> fmt::Debug for Ring<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .finish()
    }
}
