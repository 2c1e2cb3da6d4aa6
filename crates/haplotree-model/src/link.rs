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

//! # Link Records and the Sparse Link Container
//!
//! A `Link` records the pairwise evidence between two haplotype positions:
//! the homozygous weight is the cost of giving the endpoints *different*
//! values (contradicting the evidence that they belong together), the
//! heterozygous weight is the cost of giving them *equal* values. A pair
//! with no entry in the container is equivalent to a link with both
//! weights zero.
//!
//! Keys are strict ordered pairs `(lower, upper)` with `lower < upper`;
//! the container rejects degenerate or inverted keys eagerly so a single
//! pair can never be stored twice under two spellings.

use std::collections::hash_map::{Entry, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// The forced penalty of a link whose endpoint values are both committed:
/// equal values contradict the heterozygous evidence, unequal values the
/// homozygous evidence. Every bound computation — whether it reads a
/// [`Link`] record or a snapshot of its weights — selects the side
/// through this function.
#[inline]
pub fn forced_penalty(homo_weight: u64, hetro_weight: u64, equal: bool) -> u64 {
    if equal {
        hetro_weight
    } else {
        homo_weight
    }
}

/// A link between two nodes.
///
/// Weights are atomics: they are accumulated during load (potentially from
/// parallel loader threads) and are read-only during the search.
#[derive(Debug, Default)]
pub struct Link {
    homo_weight: AtomicU64,
    hetro_weight: AtomicU64,
}

impl Link {
    /// Creates a link with both weights zero.
    #[inline]
    pub fn new() -> Self {
        Self {
            homo_weight: AtomicU64::new(0),
            hetro_weight: AtomicU64::new(0),
        }
    }

    /// Accessor for the homozygous weight (cost of unequal endpoint values).
    #[inline]
    pub fn homo_weight(&self) -> &AtomicU64 {
        &self.homo_weight
    }

    /// Accessor for the heterozygous weight (cost of equal endpoint values).
    #[inline]
    pub fn hetro_weight(&self) -> &AtomicU64 {
        &self.hetro_weight
    }

    /// Returns the value of the link: the larger of its two weights.
    #[inline]
    pub fn value(&self) -> u64 {
        self.homo_weight
            .load(Ordering::Relaxed)
            .max(self.hetro_weight.load(Ordering::Relaxed))
    }

    /// Returns the forced penalty of the link once both endpoint values
    /// are committed; see [`forced_penalty`].
    #[inline]
    pub fn penalty(&self, equal: bool) -> u64 {
        forced_penalty(
            self.homo_weight.load(Ordering::Relaxed),
            self.hetro_weight.load(Ordering::Relaxed),
            equal,
        )
    }
}

/// A strict ordered pair key for the link container.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LinkKey {
    lower: usize,
    upper: usize,
}

impl LinkKey {
    /// Creates a key from an already-ordered pair.
    ///
    /// # Panics
    ///
    /// Panics if `lower >= upper`.
    #[inline]
    pub fn new(lower: usize, upper: usize) -> Self {
        assert!(
            lower < upper,
            "called `LinkKey::new` with a non-strict pair: lower is {} but upper is {}",
            lower,
            upper
        );
        Self { lower, upper }
    }

    /// The lower index of the pair.
    #[inline]
    pub fn lower(&self) -> usize {
        self.lower
    }

    /// The upper index of the pair.
    #[inline]
    pub fn upper(&self) -> usize {
        self.upper
    }
}

impl std::fmt::Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinkKey({}, {})", self.lower, self.upper)
    }
}

/// A sparse mapping from strict `(lower, upper)` pairs to [`Link`] records.
///
/// Structural mutation (`insert`) requires exclusive access and only
/// happens during load; during the search the container is read
/// concurrently and never reshaped.
#[derive(Debug, Default)]
pub struct LinkContainer {
    links: HashMap<LinkKey, Link>,
}

impl LinkContainer {
    /// Creates an empty link container.
    #[inline]
    pub fn new() -> Self {
        Self {
            links: HashMap::new(),
        }
    }

    /// Inserts a fresh zero-weight link for `(lower, upper)` and returns it.
    ///
    /// Inserting an existing pair is a no-op that returns the existing
    /// record with its weights intact.
    ///
    /// # Panics
    ///
    /// Panics if `lower >= upper`.
    pub fn insert(&mut self, lower: usize, upper: usize) -> &Link {
        match self.links.entry(LinkKey::new(lower, upper)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Link::new()),
        }
    }

    /// Returns `true` if a link exists for `(lower, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if `lower >= upper`.
    #[inline]
    pub fn exists(&self, lower: usize, upper: usize) -> bool {
        self.links.contains_key(&LinkKey::new(lower, upper))
    }

    /// Returns the link for `(lower, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if the pair is absent or not strictly ordered. Callers check
    /// with [`LinkContainer::exists`] first.
    #[inline]
    pub fn at(&self, lower: usize, upper: usize) -> &Link {
        self.links
            .get(&LinkKey::new(lower, upper))
            .expect("called `LinkContainer::at` on an absent pair")
    }

    /// Returns the value of the link for `(lower, upper)`, or 0 if the
    /// pair is absent.
    ///
    /// # Panics
    ///
    /// Panics if `lower >= upper`.
    #[inline]
    pub fn link_max(&self, lower: usize, upper: usize) -> u64 {
        match self.links.get(&LinkKey::new(lower, upper)) {
            Some(link) => link.value(),
            None => 0,
        }
    }

    /// Returns the number of stored links.
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Iterates over all stored pairs in unspecified order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&LinkKey, &Link)> {
        self.links.iter()
    }
}

impl std::fmt::Display for LinkContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinkContainer(num_links: {})", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_value_is_weight_maximum() {
        let link = Link::new();
        link.homo_weight().store(3, Ordering::Relaxed);
        link.hetro_weight().store(7, Ordering::Relaxed);
        assert_eq!(link.value(), 7);
    }

    #[test]
    fn test_forced_penalty_sides() {
        // Equal endpoints contradict the heterozygous evidence.
        assert_eq!(forced_penalty(3, 1, true), 1);
        // Unequal endpoints contradict the homozygous evidence.
        assert_eq!(forced_penalty(3, 1, false), 3);
    }

    #[test]
    fn test_link_penalty_delegates_to_the_convention() {
        let link = Link::new();
        link.homo_weight().store(3, Ordering::Relaxed);
        link.hetro_weight().store(1, Ordering::Relaxed);
        assert_eq!(link.penalty(true), forced_penalty(3, 1, true));
        assert_eq!(link.penalty(false), forced_penalty(3, 1, false));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut container = LinkContainer::new();
        container.insert(0, 1).homo_weight().store(5, Ordering::Relaxed);
        // A second insert must not reset the weights.
        container.insert(0, 1);
        assert_eq!(container.len(), 1);
        assert_eq!(container.at(0, 1).homo_weight().load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_exists_and_link_max() {
        let mut container = LinkContainer::new();
        container.insert(2, 5).hetro_weight().store(4, Ordering::Relaxed);

        assert!(container.exists(2, 5));
        assert!(!container.exists(1, 5));
        assert_eq!(container.link_max(2, 5), 4);
        assert_eq!(container.link_max(1, 5), 0);
    }

    #[test]
    #[should_panic]
    fn test_key_rejects_inverted_pair() {
        let _ = LinkKey::new(3, 1);
    }

    #[test]
    #[should_panic]
    fn test_key_rejects_degenerate_pair() {
        let _ = LinkKey::new(2, 2);
    }

    #[test]
    #[should_panic]
    fn test_at_on_absent_pair_panics() {
        let container = LinkContainer::new();
        let _ = container.at(0, 1);
    }

    #[test]
    fn test_iteration_covers_all_pairs() {
        let mut container = LinkContainer::new();
        container.insert(0, 1);
        container.insert(1, 2);
        container.insert(0, 2);

        let mut keys: Vec<(usize, usize)> = container
            .iter()
            .map(|(key, _)| (key.lower(), key.upper()))
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 2)]);
    }
}
