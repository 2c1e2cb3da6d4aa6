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

//! # The Bound Calculator
//!
//! Computes, for a candidate `(haplo position, search node)` pair, the
//! deltas to apply to the window the candidate inherited from its parent.
//!
//! Every link is accounted exactly once, at the level where its second
//! endpoint commits. For each link from the committing position to an
//! already-decided position on the candidate's ancestor path:
//!
//! - the *lower* delta gains the forced penalty (the heterozygous weight
//!   when the two values agree, the homozygous weight when they differ);
//! - the *upper* delta gains the slack the commitment removed — the link's
//!   maximum minus the forced penalty.
//!
//! Links whose other endpoint is still open contribute nothing yet; their
//! full maximum stays inside the upper window until they commit. Seeding
//! the root window at or above the summed link maxima therefore keeps
//! `lower <= upper` at every depth, and at a leaf the lower bound is the
//! exact objective of the assignment.
//!
//! The link weights are snapshotted into a CSR adjacency at construction;
//! links are read-only during the search, and the flat layout keeps the
//! inner fold cache-friendly. When the caller grants more than one bound
//! thread and the position's incidence list is large enough, the fold is
//! chunked across the pool and reduced by addition.

use crate::manager::NodeManager;
use fixedbitset::FixedBitSet;
use haplotree_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use haplotree_model::index::SearchNodeIndex;
use haplotree_model::link::{forced_penalty, LinkContainer};
use haplotree_model::node::NodeContainer;
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};
use std::sync::atomic::Ordering;

/// Incidence lists shorter than this are folded serially regardless of the
/// granted width; the split overhead would dominate the sum.
const MIN_PARALLEL_EDGES: usize = 64;

/// One incident link, snapshotted at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LinkEdge {
    other: usize,
    homo: u64,
    hetro: u64,
}

impl LinkEdge {
    #[inline]
    fn max_weight(&self) -> u64 {
        self.homo.max(self.hetro)
    }

    #[inline]
    fn penalty(&self, equal: bool) -> u64 {
        forced_penalty(self.homo, self.hetro, equal)
    }
}

/// The pair of deltas a candidate applies to its inherited window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundDelta {
    /// Penalty forced by the commitments of this level.
    pub lower: u64,
    /// Slack removed from the worst case by those commitments.
    pub upper: u64,
}

impl std::ops::Add for BoundDelta {
    type Output = BoundDelta;

    #[inline]
    fn add(self, other: BoundDelta) -> BoundDelta {
        BoundDelta {
            lower: self.lower.saturating_add_val(other.lower),
            upper: self.upper.saturating_add_val(other.upper),
        }
    }
}

impl std::fmt::Display for BoundDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundDelta(lower: {}, upper: {})", self.lower, self.upper)
    }
}

/// The bound calculator of a search run.
#[derive(Debug, Clone)]
pub struct Bounder {
    num_positions: usize,
    /// Model-node index to haplotype position.
    positions: Vec<usize>,
    /// CSR offsets per position; `offsets[p]..offsets[p + 1]` slices
    /// `edges`.
    offsets: Vec<usize>,
    edges: Vec<LinkEdge>,
}

impl Bounder {
    /// Snapshots the model into a flat adjacency.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if a node's haplotype position is out of
    /// range.
    pub fn new(nodes: &NodeContainer, links: &LinkContainer) -> Self {
        let num_positions = nodes.num_nodes();
        let positions: Vec<usize> = nodes.iter().map(|node| node.position()).collect();
        debug_assert!(
            positions.iter().all(|&p| p < num_positions),
            "node haplotype positions exceed the container size"
        );

        let mut adjacency: Vec<Vec<LinkEdge>> = vec![Vec::new(); num_positions];
        for (key, link) in links.iter() {
            let lower_pos = positions[key.lower()];
            let upper_pos = positions[key.upper()];
            let homo = link.homo_weight().load(Ordering::Relaxed);
            let hetro = link.hetro_weight().load(Ordering::Relaxed);
            adjacency[lower_pos].push(LinkEdge {
                other: upper_pos,
                homo,
                hetro,
            });
            adjacency[upper_pos].push(LinkEdge {
                other: lower_pos,
                homo,
                hetro,
            });
        }

        let mut offsets = Vec::with_capacity(num_positions + 1);
        let mut edges = Vec::new();
        offsets.push(0);
        for list in &mut adjacency {
            list.sort_unstable_by_key(|edge| edge.other);
            edges.extend_from_slice(list);
            offsets.push(edges.len());
        }

        Self {
            num_positions,
            positions,
            offsets,
            edges,
        }
    }

    #[inline]
    fn incident(&self, haplo_idx: usize) -> &[LinkEdge] {
        debug_assert!(
            haplo_idx < self.num_positions,
            "called `Bounder::incident` with position out of bounds: the len is {} but the position is {}",
            self.num_positions,
            haplo_idx
        );
        &self.edges[self.offsets[haplo_idx]..self.offsets[haplo_idx + 1]]
    }

    /// Computes the deltas for the candidate at arena index `search_idx`,
    /// which commits `haplo_idx` to its already-stored value. The
    /// candidate's `index` and `value` fields must be set before the call.
    ///
    /// `bound_threads` caps the inner fan-out; 1 folds serially.
    pub fn calculate(
        &self,
        haplo_idx: usize,
        search_idx: SearchNodeIndex,
        manager: &NodeManager,
        bound_threads: usize,
    ) -> BoundDelta {
        let edges = self.incident(haplo_idx);
        if edges.is_empty() {
            return BoundDelta::default();
        }

        // Gather the decided positions along the ancestor path. Arena
        // index 0 is the pseudo-root and carries no decision.
        let mut decided = FixedBitSet::with_capacity(self.num_positions);
        let mut values: SmallVec<[u8; 128]> = smallvec![0u8; self.num_positions];
        let mut cursor = search_idx;
        while !cursor.is_zero() {
            let node = manager.node(cursor);
            let position = self.positions[node.index().get()];
            decided.insert(position);
            values[position] = node.value();
            cursor = node.root();
        }
        debug_assert!(
            decided.contains(haplo_idx),
            "called `Bounder::calculate` before the candidate's own decision was stored"
        );
        let own_value = values[haplo_idx];

        let fold = |chunk: &[LinkEdge]| -> BoundDelta {
            let mut delta = BoundDelta::default();
            for edge in chunk {
                if !decided.contains(edge.other) {
                    continue;
                }
                let penalty = edge.penalty(values[edge.other] == own_value);
                delta.lower = delta.lower.saturating_add_val(penalty);
                delta.upper = delta
                    .upper
                    .saturating_add_val(edge.max_weight() - penalty);
            }
            delta
        };

        if bound_threads <= 1 || edges.len() < MIN_PARALLEL_EDGES {
            return fold(edges);
        }

        let chunk_size = edges.len().div_ceil(bound_threads);
        edges
            .par_chunks(chunk_size)
            .map(fold)
            .reduce(BoundDelta::default, |a, b| a + b)
    }
}

impl std::fmt::Display for Bounder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bounder(positions: {}, edges: {})",
            self.num_positions,
            self.edges.len() / 2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haplotree_model::index::NodeIndex;
    use haplotree_model::link::LinkContainer;
    use haplotree_model::node::NodeContainer;

    fn model_with_links(
        num_nodes: usize,
        weights: &[(usize, usize, u64, u64)],
    ) -> (NodeContainer, LinkContainer) {
        let nodes = NodeContainer::new(num_nodes);
        let mut links = LinkContainer::new();
        for &(lower, upper, homo, hetro) in weights {
            let link = links.insert(lower, upper);
            link.homo_weight().store(homo, Ordering::Relaxed);
            link.hetro_weight().store(hetro, Ordering::Relaxed);
        }
        (nodes, links)
    }

    /// Builds an arena holding a single decided path: slot `i + 1` commits
    /// model node `i` to `values[i]`, rooted at the slot before it.
    fn path_arena(values: &[u8]) -> NodeManager {
        let manager = NodeManager::with_capacity(values.len() + 1);
        manager.get_next_node(); // pseudo-root
        for (i, &value) in values.iter().enumerate() {
            let slot = manager.get_next_node();
            let node = manager.node(slot);
            node.set_index(NodeIndex::new(i));
            node.set_value(value);
            node.set_root(SearchNodeIndex::new(slot.get() - 1));
        }
        manager
    }

    #[test]
    fn test_open_endpoint_contributes_nothing() {
        let (nodes, links) = model_with_links(2, &[(0, 1, 4, 1)]);
        let bounder = Bounder::new(&nodes, &links);
        // Only position 0 is decided; the link to position 1 stays open.
        let manager = path_arena(&[0]);

        let delta = bounder.calculate(0, SearchNodeIndex::new(1), &manager, 1);
        assert_eq!(delta, BoundDelta::default());
    }

    #[test]
    fn test_committed_pair_forces_penalty_and_slack() {
        let (nodes, links) = model_with_links(2, &[(0, 1, 4, 1)]);
        let bounder = Bounder::new(&nodes, &links);

        // Both endpoints 0: agreement contradicts the heterozygous side.
        let manager = path_arena(&[0, 0]);
        let delta = bounder.calculate(1, SearchNodeIndex::new(2), &manager, 1);
        assert_eq!(delta, BoundDelta { lower: 1, upper: 3 });

        // Disagreement contradicts the homozygous side; no slack remains.
        let manager = path_arena(&[0, 1]);
        let delta = bounder.calculate(1, SearchNodeIndex::new(2), &manager, 1);
        assert_eq!(delta, BoundDelta { lower: 4, upper: 0 });
    }

    #[test]
    fn test_multiple_decided_neighbors_accumulate() {
        let (nodes, links) = model_with_links(3, &[(0, 2, 4, 1), (1, 2, 1, 4)]);
        let bounder = Bounder::new(&nodes, &links);

        // Path commits 0 -> 0, 1 -> 1, then 2 -> 0.
        let manager = path_arena(&[0, 1, 0]);
        let delta = bounder.calculate(2, SearchNodeIndex::new(3), &manager, 1);
        // (0, 2): equal, penalty 1, slack 3. (1, 2): unequal, penalty 1,
        // slack 3.
        assert_eq!(delta, BoundDelta { lower: 2, upper: 6 });
    }

    #[test]
    fn test_delta_addition_saturates() {
        let a = BoundDelta {
            lower: u64::MAX - 1,
            upper: 0,
        };
        let b = BoundDelta { lower: 5, upper: 3 };
        assert_eq!(a + b, BoundDelta { lower: u64::MAX, upper: 3 });
    }

    #[test]
    fn test_parallel_fold_matches_serial() {
        // A hub position linked to every other position, all decided, so
        // the incidence list is long enough to split.
        let hub = 80usize;
        let specs: Vec<(usize, usize, u64, u64)> =
            (0..hub).map(|i| (i, hub, i as u64 + 1, 1)).collect();
        let (nodes, links) = model_with_links(hub + 1, &specs);
        let bounder = Bounder::new(&nodes, &links);

        let values: Vec<u8> = (0..=hub).map(|i| (i % 2) as u8).collect();
        let manager = path_arena(&values);

        let serial = bounder.calculate(hub, SearchNodeIndex::new(hub + 1), &manager, 1);
        let parallel = bounder.calculate(hub, SearchNodeIndex::new(hub + 1), &manager, 4);
        assert_eq!(serial, parallel);
        assert!(serial.lower > 0);
    }
}
