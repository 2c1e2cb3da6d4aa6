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

//! # The Branching-Order Selector
//!
//! Chooses which model node to branch on next. The order is a static
//! priority computed once at construction: the start node comes first,
//! the remaining nodes follow by descending influence — node weight plus
//! the summed maxima of incident links — with ties broken by the lower
//! node index. High-influence positions early means the big penalties and
//! the big slack land near the root, which is where pruning pays.
//!
//! `select_node` is called once per recursion level from the sequential
//! part of the driver; after `num_nodes` calls the order is exhausted and
//! `last_search_index` names the terminal position.

use haplotree_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use haplotree_model::link::LinkContainer;
use haplotree_model::node::NodeContainer;
use std::sync::atomic::Ordering;

/// The static branching order of a search.
#[derive(Debug, Clone)]
pub struct NodeSelector {
    order: Vec<usize>,
    cursor: usize,
}

impl NodeSelector {
    /// Builds the order for the given model, pinned to start at
    /// `start_node`.
    ///
    /// # Panics
    ///
    /// Panics if `start_node` is out of bounds for a non-empty container.
    pub fn new(nodes: &NodeContainer, links: &LinkContainer, start_node: usize) -> Self {
        let num_nodes = nodes.num_nodes();
        if num_nodes == 0 {
            return Self {
                order: Vec::new(),
                cursor: 0,
            };
        }
        assert!(
            start_node < num_nodes,
            "called `NodeSelector::new` with start node out of bounds: the len is {} but the index is {}",
            num_nodes,
            start_node
        );

        let mut influence: Vec<u64> = nodes
            .iter()
            .map(|node| node.weight().load(Ordering::Relaxed))
            .collect();
        for (key, link) in links.iter() {
            let value = link.value();
            influence[key.lower()] = influence[key.lower()].saturating_add_val(value);
            influence[key.upper()] = influence[key.upper()].saturating_add_val(value);
        }

        let mut order: Vec<usize> = (0..num_nodes).filter(|&i| i != start_node).collect();
        order.sort_unstable_by(|&a, &b| influence[b].cmp(&influence[a]).then(a.cmp(&b)));
        order.insert(0, start_node);

        Self { order, cursor: 0 }
    }

    /// Returns the next node index to branch on and advances the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the order is exhausted; the driver stops recursing at
    /// [`NodeSelector::last_search_index`].
    #[inline]
    pub fn select_node(&mut self) -> usize {
        assert!(
            self.cursor < self.order.len(),
            "called `NodeSelector::select_node` past the end of the order: the len is {}",
            self.order.len()
        );
        let selected = self.order[self.cursor];
        self.cursor += 1;
        selected
    }

    /// The node index at which the order exhausts (the terminal level).
    ///
    /// # Panics
    ///
    /// In debug builds, panics on an empty order.
    #[inline]
    pub fn last_search_index(&self) -> usize {
        debug_assert!(
            !self.order.is_empty(),
            "called `NodeSelector::last_search_index` on an empty order"
        );
        self.order[self.order.len() - 1]
    }

    /// The full order, start node first.
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl std::fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NodeSelector(len: {}, cursor: {})",
            self.order.len(),
            self.cursor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haplotree_model::link::LinkContainer;
    use haplotree_model::node::NodeContainer;
    use std::sync::atomic::Ordering;

    fn links_with(values: &[(usize, usize, u64)]) -> LinkContainer {
        let mut links = LinkContainer::new();
        for &(lower, upper, value) in values {
            links
                .insert(lower, upper)
                .homo_weight()
                .store(value, Ordering::Relaxed);
        }
        links
    }

    #[test]
    fn test_start_node_is_pinned_first() {
        let nodes = NodeContainer::new(4);
        let links = links_with(&[(0, 1, 10), (2, 3, 50)]);
        let selector = NodeSelector::new(&nodes, &links, 1);
        assert_eq!(selector.order()[0], 1);
    }

    #[test]
    fn test_order_follows_influence() {
        let nodes = NodeContainer::new(4);
        // Node 2 and 3 share the strongest link, node 0 a weaker one.
        let links = links_with(&[(0, 1, 10), (2, 3, 50)]);
        let selector = NodeSelector::new(&nodes, &links, 0);
        // After the pinned start: 2 and 3 (influence 51) before 1 (11).
        assert_eq!(selector.order(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_node_weight_contributes_to_influence() {
        let nodes = NodeContainer::new(3);
        nodes.weight(2).store(100, Ordering::Relaxed);
        let links = links_with(&[(0, 1, 10)]);
        let selector = NodeSelector::new(&nodes, &links, 0);
        assert_eq!(selector.order(), &[0, 2, 1]);
    }

    #[test]
    fn test_ties_break_to_lower_index() {
        let nodes = NodeContainer::new(4);
        let links = LinkContainer::new();
        let selector = NodeSelector::new(&nodes, &links, 2);
        assert_eq!(selector.order(), &[2, 0, 1, 3]);
    }

    #[test]
    fn test_every_level_commits_a_fresh_position() {
        let nodes = NodeContainer::new(5);
        let links = links_with(&[(0, 4, 3), (1, 2, 7)]);
        let mut selector = NodeSelector::new(&nodes, &links, 3);

        let mut selected = Vec::new();
        for _ in 0..5 {
            selected.push(selector.select_node());
        }
        let mut sorted = selected.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        assert_eq!(*selected.last().unwrap(), selector.last_search_index());
    }

    #[test]
    #[should_panic]
    fn test_selecting_past_the_end_panics() {
        let nodes = NodeContainer::new(1);
        let links = LinkContainer::new();
        let mut selector = NodeSelector::new(&nodes, &links, 0);
        selector.select_node();
        selector.select_node();
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_start_node_rejected() {
        let nodes = NodeContainer::new(2);
        let links = LinkContainer::new();
        let _ = NodeSelector::new(&nodes, &links, 5);
    }
}
