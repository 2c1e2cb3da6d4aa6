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

//! # Search-Tree Node Records
//!
//! A `SearchNode` is one slot of the search arena: it fixes one node of
//! the model to 0 or 1 and carries the accumulated `[lower, upper]`
//! penalty window inherited from its parent. Every field is an atomic so
//! that a branch worker can initialize the children it reserved while its
//! siblings run, without locks. Cross-level visibility is provided by the
//! fork/join barrier of the level loop, so all accesses are `Relaxed`.

use haplotree_core::num::ops::saturating_arithmetic::{SaturatingAddVal, SaturatingSubVal};
use haplotree_model::index::{NodeIndex, SearchNodeIndex};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

/// Which side of the parent a search node hangs on. Left fixes the
/// position to 0, right fixes it to 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchDirection {
    Left,
    Right,
}

impl BranchDirection {
    /// The 0/1 value this direction assigns.
    #[inline]
    pub fn as_value(&self) -> u8 {
        match self {
            BranchDirection::Left => 0,
            BranchDirection::Right => 1,
        }
    }

    #[inline]
    fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            BranchDirection::Left
        } else {
            BranchDirection::Right
        }
    }
}

impl std::fmt::Display for BranchDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchDirection::Left => write!(f, "Left"),
            BranchDirection::Right => write!(f, "Right"),
        }
    }
}

/// One slot of the search arena.
///
/// `index` is the model-node index the slot's level branches on, `root`
/// points at the parent slot (always a smaller arena index), `left` and
/// `right` point at the children once spawned (0 means unset).
#[derive(Debug, Default)]
pub struct SearchNode {
    index: AtomicUsize,
    root: AtomicUsize,
    left: AtomicUsize,
    right: AtomicUsize,
    lower_bound: AtomicU64,
    upper_bound: AtomicU64,
    branch: AtomicU8,
    value: AtomicU8,
}

impl SearchNode {
    /// Creates a zeroed slot.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The model-node index this slot branches.
    #[inline]
    pub fn index(&self) -> NodeIndex {
        NodeIndex::new(self.index.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_index(&self, index: NodeIndex) {
        self.index.store(index.get(), Ordering::Relaxed);
    }

    /// The parent slot's arena index.
    #[inline]
    pub fn root(&self) -> SearchNodeIndex {
        SearchNodeIndex::new(self.root.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_root(&self, root: SearchNodeIndex) {
        self.root.store(root.get(), Ordering::Relaxed);
    }

    /// The left child's arena index (0 if unset).
    #[inline]
    pub fn left(&self) -> SearchNodeIndex {
        SearchNodeIndex::new(self.left.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_left(&self, left: SearchNodeIndex) {
        self.left.store(left.get(), Ordering::Relaxed);
    }

    /// The right child's arena index (0 if unset).
    #[inline]
    pub fn right(&self) -> SearchNodeIndex {
        SearchNodeIndex::new(self.right.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_right(&self, right: SearchNodeIndex) {
        self.right.store(right.get(), Ordering::Relaxed);
    }

    /// Which side of the parent this slot hangs on.
    #[inline]
    pub fn branch_direction(&self) -> BranchDirection {
        BranchDirection::from_raw(self.branch.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_branch_direction(&self, direction: BranchDirection) {
        self.branch.store(direction.as_value(), Ordering::Relaxed);
    }

    /// The 0/1 decision of this slot.
    #[inline]
    pub fn value(&self) -> u8 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_value(&self, value: u8) {
        debug_assert!(
            value <= 1,
            "called `SearchNode::set_value` with a non-binary value: {}",
            value
        );
        self.value.store(value, Ordering::Relaxed);
    }

    /// The accumulated lower bound.
    #[inline]
    pub fn lower_bound(&self) -> u64 {
        self.lower_bound.load(Ordering::Relaxed)
    }

    /// The accumulated upper bound.
    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// The `(lower, upper)` window.
    #[inline]
    pub fn bounds(&self) -> (u64, u64) {
        (self.lower_bound(), self.upper_bound())
    }

    /// Installs an inherited `(lower, upper)` window.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `lower > upper`.
    #[inline]
    pub fn set_bounds(&self, bounds: (u64, u64)) {
        let (lower, upper) = bounds;
        debug_assert!(
            lower <= upper,
            "called `SearchNode::set_bounds` with an inverted window: lower is {} but upper is {}",
            lower,
            upper
        );
        self.lower_bound.store(lower, Ordering::Relaxed);
        self.upper_bound.store(upper, Ordering::Relaxed);
    }

    /// Applies a bound delta: raises the lower bound by `lower_delta` and
    /// shrinks the upper bound by `upper_delta`, both saturating. Returns
    /// the adjusted window.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the adjusted window is inverted, which
    /// indicates an inadmissible delta.
    #[inline]
    pub fn apply_delta(&self, lower_delta: u64, upper_delta: u64) -> (u64, u64) {
        let lower = self.lower_bound().saturating_add_val(lower_delta);
        let upper = self.upper_bound().saturating_sub_val(upper_delta);
        debug_assert!(
            lower <= upper,
            "bound delta inverted the window: lower is {} but upper is {}",
            lower,
            upper
        );
        self.lower_bound.store(lower, Ordering::Relaxed);
        self.upper_bound.store(upper, Ordering::Relaxed);
        (lower, upper)
    }
}

impl std::fmt::Display for SearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode(index: {}, value: {}, root: {}, bounds: [{}, {}])",
            self.index(),
            self.value(),
            self.root(),
            self.lower_bound(),
            self.upper_bound()
        )
    }
}
