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

use crate::node::NodeContainer;
use num_traits::PrimInt;
use std::sync::atomic::Ordering;

/// The final solution of a haplotype search: one 0/1 value per position
/// plus the proven objective (the accumulated penalty of the assignment).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Haplotype {
    values: Vec<u8>,
    objective: u64,
}

impl Haplotype {
    /// Constructs a haplotype from explicit per-position values.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if any value is not 0 or 1.
    pub fn new(values: Vec<u8>, objective: u64) -> Self {
        debug_assert!(
            values.iter().all(|&v| v <= 1),
            "called `Haplotype::new` with non-binary values"
        );
        Self { values, objective }
    }

    /// Gathers the haplotype out of a node container: every node writes its
    /// `haplo_value` at its `haplo_pos`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if a node's position is out of range.
    pub fn from_nodes(nodes: &NodeContainer, objective: u64) -> Self {
        let mut values = vec![0u8; nodes.num_nodes()];
        for node in nodes.iter() {
            let position = node.position();
            debug_assert!(
                position < values.len(),
                "node haplotype position out of range: the len is {} but the position is {}",
                values.len(),
                position
            );
            values[position] = node.haplo_value().load(Ordering::Relaxed);
        }
        Self { values, objective }
    }

    /// Returns the value at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    #[inline]
    pub fn value(&self, position: usize) -> u8 {
        debug_assert!(
            position < self.values.len(),
            "called `Haplotype::value` with position out of bounds: the len is {} but the position is {}",
            self.values.len(),
            position
        );
        self.values[position]
    }

    /// Returns all per-position values in position order.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Returns the number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the haplotype has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the accumulated penalty of this assignment.
    #[inline]
    pub fn objective(&self) -> u64 {
        self.objective
    }

    /// Returns the objective converted to `T`.
    ///
    /// Mirrors the raw `u64` accessor for callers that carry their own
    /// integer width through a pipeline.
    #[inline]
    pub fn objective_as<T>(&self) -> Result<T, <T as TryFrom<u64>>::Error>
    where
        T: PrimInt + TryFrom<u64>,
    {
        T::try_from(self.objective)
    }
}

impl std::fmt::Display for Haplotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &value in &self.values {
            write!(f, "{}", value)?;
        }
        write!(f, " (objective: {})", self.objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeContainer;

    #[test]
    fn test_from_nodes_orders_by_position() {
        let container = NodeContainer::new(3);
        // Model position 2 with node 0 and position 0 with node 2.
        container.haplo_pos(0).store(2, Ordering::Relaxed);
        container.haplo_pos(2).store(0, Ordering::Relaxed);
        container.at(0).set_haplo_value(1);
        container.at(1).set_haplo_value(0);
        container.at(2).set_haplo_value(1);

        let haplotype = Haplotype::from_nodes(&container, 5);
        assert_eq!(haplotype.values(), &[1, 0, 1]);
        assert_eq!(haplotype.objective(), 5);
    }

    #[test]
    fn test_display_is_a_bit_string() {
        let haplotype = Haplotype::new(vec![1, 0, 1, 1], 3);
        assert_eq!(format!("{}", haplotype), "1011 (objective: 3)");
    }

    #[test]
    fn test_empty_haplotype() {
        let container = NodeContainer::new(0);
        let haplotype = Haplotype::from_nodes(&container, 0);
        assert!(haplotype.is_empty());
        assert_eq!(haplotype.len(), 0);
    }

    #[test]
    fn test_objective_conversion() {
        let haplotype = Haplotype::new(vec![0, 1], 42);
        let as_i64: i64 = haplotype.objective_as().unwrap();
        assert_eq!(as_i64, 42);

        let too_small: Result<i8, _> = Haplotype::new(vec![], 1000).objective_as();
        assert!(too_small.is_err());
    }
}
