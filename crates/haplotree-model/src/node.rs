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

//! # Node Records and the Dense Node Container
//!
//! Each `Node` models one position of the output haplotype. The node's
//! `weight` is the significance of that position, `haplo_pos` is where the
//! position sits in the output string, `worst_case` caches the summed
//! maxima of all incident links (the node's influence), and `haplo_value`
//! receives the final 0/1 assignment when the search terminates.
//!
//! All fields are atomic scalars exposed as addressable references. The
//! loader populates them through shared references before the search; the
//! search reads them concurrently and only ever writes `haplo_value`, from
//! the sequential post-join phase of each level.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

/// A single haplotype position record.
///
/// Fresh nodes carry weight 1 so that an unweighted model still orders
/// positions by link influence alone.
#[derive(Debug)]
pub struct Node {
    weight: AtomicU64,
    haplo_pos: AtomicUsize,
    worst_case: AtomicU64,
    haplo_value: AtomicU8,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Creates a node with weight 1, position 0 and no assignment.
    #[inline]
    pub fn new() -> Self {
        Self {
            weight: AtomicU64::new(1),
            haplo_pos: AtomicUsize::new(0),
            worst_case: AtomicU64::new(0),
            haplo_value: AtomicU8::new(0),
        }
    }

    /// Accessor for the weight of the node (how significant it is).
    #[inline]
    pub fn weight(&self) -> &AtomicU64 {
        &self.weight
    }

    /// Accessor for the haplotype position the node represents.
    #[inline]
    pub fn haplo_pos(&self) -> &AtomicUsize {
        &self.haplo_pos
    }

    /// Accessor for the worst-case value of the node (the summed maxima of
    /// its incident links).
    #[inline]
    pub fn worst_case(&self) -> &AtomicU64 {
        &self.worst_case
    }

    /// Accessor for the final 0/1 assignment of the node.
    #[inline]
    pub fn haplo_value(&self) -> &AtomicU8 {
        &self.haplo_value
    }

    /// Convenience read of the haplotype position.
    #[inline]
    pub fn position(&self) -> usize {
        self.haplo_pos.load(Ordering::Relaxed)
    }

    /// Convenience write of the final assignment.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `value` is not 0 or 1.
    #[inline]
    pub fn set_haplo_value(&self, value: u8) {
        debug_assert!(
            value <= 1,
            "called `Node::set_haplo_value` with a non-binary value: {}",
            value
        );
        self.haplo_value.store(value, Ordering::Relaxed);
    }
}

/// A dense, indexed collection of [`Node`] records.
///
/// The container has a fixed size after [`NodeContainer::resize`]; node
/// identity is the index. Fresh nodes default their `haplo_pos` to their
/// own index, so a loader that models position `i` with node `i` does not
/// need to touch positions at all.
#[derive(Debug, Default)]
pub struct NodeContainer {
    nodes: Vec<Node>,
}

impl NodeContainer {
    /// Creates a container holding `num_nodes` fresh nodes.
    pub fn new(num_nodes: usize) -> Self {
        let mut container = Self { nodes: Vec::new() };
        container.resize(num_nodes);
        container
    }

    /// Resizes the container to exactly `num_nodes` nodes.
    ///
    /// Growing appends fresh nodes (with `haplo_pos` defaulting to their
    /// index); shrinking drops the tail. Resizing to the current size is a
    /// no-op.
    pub fn resize(&mut self, num_nodes: usize) {
        if self.nodes.len() == num_nodes {
            return;
        }
        let old_len = self.nodes.len();
        self.nodes.resize_with(num_nodes, Node::new);
        for index in old_len..num_nodes {
            self.nodes[index].haplo_pos().store(index, Ordering::Relaxed);
        }
    }

    /// Returns the number of nodes in the container.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the container holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn at(&self, index: usize) -> &Node {
        debug_assert!(
            index < self.nodes.len(),
            "called `NodeContainer::at` with index out of bounds: the len is {} but the index is {}",
            self.nodes.len(),
            index
        );
        &self.nodes[index]
    }

    /// Accessor for the weight of the node at `index`.
    #[inline]
    pub fn weight(&self, index: usize) -> &AtomicU64 {
        self.at(index).weight()
    }

    /// Accessor for the worst-case value of the node at `index`.
    #[inline]
    pub fn worst_case_value(&self, index: usize) -> &AtomicU64 {
        self.at(index).worst_case()
    }

    /// Accessor for the haplotype position of the node at `index`.
    #[inline]
    pub fn haplo_pos(&self, index: usize) -> &AtomicUsize {
        self.at(index).haplo_pos()
    }

    /// Iterates over the nodes in index order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl std::fmt::Display for NodeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeContainer(num_nodes: {})", self.num_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_node_defaults() {
        let node = Node::new();
        assert_eq!(node.weight().load(Ordering::Relaxed), 1);
        assert_eq!(node.position(), 0);
        assert_eq!(node.worst_case().load(Ordering::Relaxed), 0);
        assert_eq!(node.haplo_value().load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_container_positions_default_to_index() {
        let container = NodeContainer::new(4);
        for i in 0..4 {
            assert_eq!(container.at(i).position(), i);
        }
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut container = NodeContainer::new(3);
        container.weight(1).store(7, Ordering::Relaxed);
        container.resize(3);
        assert_eq!(container.num_nodes(), 3);
        assert_eq!(container.weight(1).load(Ordering::Relaxed), 7);
    }

    #[test]
    fn test_resize_grows_with_fresh_nodes() {
        let mut container = NodeContainer::new(2);
        container.resize(5);
        assert_eq!(container.num_nodes(), 5);
        assert_eq!(container.at(4).position(), 4);
        assert_eq!(container.weight(4).load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_resize_shrinks() {
        let mut container = NodeContainer::new(5);
        container.resize(2);
        assert_eq!(container.num_nodes(), 2);
    }

    #[test]
    fn test_atomic_accessors_are_writable() {
        let container = NodeContainer::new(2);
        container.weight(0).store(42, Ordering::Relaxed);
        container.haplo_pos(0).store(1, Ordering::Relaxed);
        container.worst_case_value(0).store(9, Ordering::Relaxed);
        assert_eq!(container.weight(0).load(Ordering::Relaxed), 42);
        assert_eq!(container.at(0).position(), 1);
        assert_eq!(container.worst_case_value(0).load(Ordering::Relaxed), 9);
    }

    #[test]
    fn test_set_haplo_value() {
        let node = Node::new();
        node.set_haplo_value(1);
        assert_eq!(node.haplo_value().load(Ordering::Relaxed), 1);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_set_haplo_value_rejects_non_binary() {
        let node = Node::new();
        node.set_haplo_value(2);
    }
}
