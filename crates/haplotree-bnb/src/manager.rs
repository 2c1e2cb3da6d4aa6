// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # The Search-Node Arena
//!
//! A pre-allocated pool of [`SearchNode`] slots with a monotonically
//! growing high-water mark. Indices are dense starting at 0, a reserved
//! index is never handed out twice, and nothing is deallocated during a
//! search — which is what makes thread-safe expansion a single atomic
//! fetch-and-add and lets child pointers reference forward in allocation
//! order without ownership cycles.
//!
//! The engine reserves children in pairs through
//! [`NodeManager::get_next_pair`], one `fetch_add(2)`, so the right child
//! is always at `left + 1` even under concurrent expansion. Two
//! independent single-slot reservations would interleave between workers
//! and break that adjacency.

use crate::search_node::SearchNode;
use haplotree_model::index::SearchNodeIndex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hard ceiling for the default worst-case sizing. Instances whose full
/// tree would exceed this must size the arena explicitly.
const MAX_DEFAULT_CAPACITY: usize = (1 << 22) - 1;

/// A pre-allocated pool of search nodes.
#[derive(Debug)]
pub struct NodeManager {
    slots: Box<[SearchNode]>,
    high_water: AtomicUsize,
}

impl NodeManager {
    /// Creates an arena with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots: Box<[SearchNode]> = (0..capacity).map(|_| SearchNode::new()).collect();
        Self {
            slots,
            high_water: AtomicUsize::new(0),
        }
    }

    /// Creates an arena sized for the worst-case search over
    /// `num_positions` positions: `2^(num_positions + 1) - 1` slots (the
    /// root, its two seeds, and a full pair of children per frontier node
    /// per level), clamped to [`MAX_DEFAULT_CAPACITY`].
    pub fn for_positions(num_positions: usize) -> Self {
        let capacity = if num_positions >= 21 {
            MAX_DEFAULT_CAPACITY
        } else {
            (1usize << (num_positions + 1)) - 1
        };
        Self::with_capacity(capacity)
    }

    /// Total slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots reserved so far (the high-water mark).
    #[inline]
    pub fn allocated(&self) -> usize {
        self.high_water.load(Ordering::Relaxed).min(self.slots.len())
    }

    /// Returns the slot at `index`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index` has not been reserved yet.
    #[inline]
    pub fn node(&self, index: SearchNodeIndex) -> &SearchNode {
        debug_assert!(
            index.get() < self.allocated(),
            "called `NodeManager::node` with an unreserved index: the high-water mark is {} but the index is {}",
            self.allocated(),
            index
        );
        &self.slots[index.get()]
    }

    /// Reserves the next unused slot and returns its index. Thread-safe;
    /// never returns the same index twice.
    ///
    /// # Panics
    ///
    /// Panics if the arena is exhausted.
    #[inline]
    pub fn get_next_node(&self) -> SearchNodeIndex {
        let index = self.high_water.fetch_add(1, Ordering::Relaxed);
        assert!(
            index < self.slots.len(),
            "search arena exhausted: capacity is {} slots; size the arena explicitly for this instance",
            self.slots.len()
        );
        SearchNodeIndex::new(index)
    }

    /// Reserves two consecutive slots and returns the index of the first;
    /// the second is at `index + 1`. Thread-safe: the pair is reserved
    /// with a single fetch-and-add, so concurrent expanders can never
    /// interleave within a pair.
    ///
    /// # Panics
    ///
    /// Panics if the arena is exhausted.
    #[inline]
    pub fn get_next_pair(&self) -> SearchNodeIndex {
        let index = self.high_water.fetch_add(2, Ordering::Relaxed);
        assert!(
            index + 1 < self.slots.len(),
            "search arena exhausted: capacity is {} slots; size the arena explicitly for this instance",
            self.slots.len()
        );
        SearchNodeIndex::new(index)
    }
}

impl std::fmt::Display for NodeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NodeManager(allocated: {}, capacity: {})",
            self.allocated(),
            self.capacity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequential_reservation_is_dense() {
        let manager = NodeManager::with_capacity(4);
        assert_eq!(manager.get_next_node().get(), 0);
        assert_eq!(manager.get_next_node().get(), 1);
        assert_eq!(manager.get_next_node().get(), 2);
        assert_eq!(manager.allocated(), 3);
    }

    #[test]
    fn test_pair_reservation_is_consecutive() {
        let manager = NodeManager::with_capacity(8);
        let root = manager.get_next_node();
        assert!(root.is_zero());
        let first_pair = manager.get_next_pair();
        let second_pair = manager.get_next_pair();
        assert_eq!(first_pair.get(), 1);
        assert_eq!(second_pair.get(), 3);
        assert_eq!(manager.allocated(), 5);
    }

    #[test]
    fn test_for_positions_worst_case_sizing() {
        assert_eq!(NodeManager::for_positions(1).capacity(), 3);
        assert_eq!(NodeManager::for_positions(2).capacity(), 7);
        assert_eq!(NodeManager::for_positions(6).capacity(), 127);
        assert_eq!(NodeManager::for_positions(30).capacity(), MAX_DEFAULT_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "search arena exhausted")]
    fn test_exhaustion_is_fatal() {
        let manager = NodeManager::with_capacity(2);
        manager.get_next_node();
        manager.get_next_pair();
    }

    #[test]
    fn test_reserved_slots_are_addressable() {
        let manager = NodeManager::with_capacity(4);
        let index = manager.get_next_node();
        manager.node(index).set_value(1);
        assert_eq!(manager.node(index).value(), 1);
    }

    #[test]
    fn test_concurrent_pair_reservation_never_overlaps() {
        let manager = Arc::new(NodeManager::with_capacity(1 + 8 * 50 * 2));
        manager.get_next_node(); // root

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            handles.push(thread::spawn(move || {
                let mut firsts = Vec::new();
                for _ in 0..50 {
                    firsts.push(manager.get_next_pair().get());
                }
                firsts
            }));
        }

        let mut all: Vec<usize> = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }

        // Every pair start is unique and odd-aligned relative to the root,
        // and together they tile [1, 1 + 2 * pairs) without gaps.
        all.sort_unstable();
        let expected: Vec<usize> = (0..all.len()).map(|i| 1 + 2 * i).collect();
        assert_eq!(all, expected);
        assert_eq!(manager.allocated(), 1 + 2 * all.len());
    }
}
