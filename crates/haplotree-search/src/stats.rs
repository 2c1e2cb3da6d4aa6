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

use haplotree_core::num::constants::{PlusOne, Zero};
use haplotree_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use std::time::Duration;

/// Statistics collected during the execution of a haplotree search.
///
/// Counters are updated from the sequential per-level phase of the driver,
/// so plain fields suffice; the parallel regions report their tallies
/// through the level join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total search nodes reserved in the arena (the high-water mark).
    pub nodes_allocated: u64,
    /// Total frontier nodes whose bounds were evaluated.
    pub nodes_evaluated: u64,
    /// Frontier nodes that spawned a child pair.
    pub nodes_expanded: u64,
    /// Frontier nodes cut by the bound test.
    pub prunings_bound: u64,
    /// Levels the recursion processed.
    pub levels_processed: u64,
    /// The widest frontier seen.
    pub max_frontier: u64,
    /// The upper bound the root window was seeded with.
    pub root_upper_bound: u64,
    /// The best (smallest) complete objective the search proved.
    pub best_objective: u64,
    /// The shared upper bound when the search ended.
    pub final_upper_bound: u64,
    /// Total wall-clock time of the search.
    pub time_total: Duration,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self {
            nodes_allocated: u64::ZERO,
            nodes_evaluated: u64::ZERO,
            nodes_expanded: u64::ZERO,
            prunings_bound: u64::ZERO,
            levels_processed: u64::ZERO,
            max_frontier: u64::ZERO,
            root_upper_bound: u64::ZERO,
            best_objective: u64::ZERO,
            final_upper_bound: u64::ZERO,
            time_total: Duration::ZERO,
        }
    }
}

impl SearchStatistics {
    /// Records one completed level: its frontier width, how many frontier
    /// nodes expanded and how many were cut by the bound test.
    #[inline]
    pub fn on_level(&mut self, frontier: u64, expanded: u64, pruned: u64) {
        self.levels_processed = self.levels_processed.saturating_add_val(u64::PLUS_ONE);
        self.nodes_evaluated = self.nodes_evaluated.saturating_add_val(frontier);
        self.nodes_expanded = self.nodes_expanded.saturating_add_val(expanded);
        self.prunings_bound = self.prunings_bound.saturating_add_val(pruned);
        self.max_frontier = self.max_frontier.max(frontier);
    }

    #[inline]
    pub fn set_nodes_allocated(&mut self, nodes_allocated: u64) {
        self.nodes_allocated = nodes_allocated;
    }

    #[inline]
    pub fn set_root_upper_bound(&mut self, bound: u64) {
        self.root_upper_bound = bound;
    }

    #[inline]
    pub fn set_best_objective(&mut self, objective: u64) {
        self.best_objective = objective;
    }

    #[inline]
    pub fn set_final_upper_bound(&mut self, bound: u64) {
        self.final_upper_bound = bound;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Haplotree Search Statistics:")?;
        writeln!(f, "  Nodes allocated:      {}", self.nodes_allocated)?;
        writeln!(f, "  Nodes evaluated:      {}", self.nodes_evaluated)?;
        writeln!(f, "  Nodes expanded:       {}", self.nodes_expanded)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Levels processed:     {}", self.levels_processed)?;
        writeln!(f, "  Max frontier:         {}", self.max_frontier)?;
        writeln!(f, "  Root upper bound:     {}", self.root_upper_bound)?;
        writeln!(f, "  Best objective:       {}", self.best_objective)?;
        writeln!(f, "  Final upper bound:    {}", self.final_upper_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let stats = SearchStatistics::default();
        assert_eq!(stats.nodes_evaluated, 0);
        assert_eq!(stats.levels_processed, 0);
        assert_eq!(stats.time_total, Duration::ZERO);
    }

    #[test]
    fn test_on_level_accumulates() {
        let mut stats = SearchStatistics::default();
        stats.on_level(2, 2, 0);
        stats.on_level(4, 1, 3);

        assert_eq!(stats.levels_processed, 2);
        assert_eq!(stats.nodes_evaluated, 6);
        assert_eq!(stats.nodes_expanded, 3);
        assert_eq!(stats.prunings_bound, 3);
        assert_eq!(stats.max_frontier, 4);
    }

    #[test]
    fn test_display_contains_counters() {
        let mut stats = SearchStatistics::default();
        stats.on_level(2, 2, 0);
        stats.set_best_objective(7);
        let rendered = format!("{}", stats);
        assert!(rendered.contains("Nodes evaluated:      2"));
        assert!(rendered.contains("Best objective:       7"));
    }
}
