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

//! # Search Monitoring Interface
//!
//! An extensible callback interface for observing and controlling the
//! lifecycle of the level-parallel tree search. Implementations can collect
//! metrics, log progress, react to solutions, and issue termination
//! commands based on external criteria.
//!
//! The hook set is level-grained: the engine explores one frontier level
//! per recursion step, consults `search_command` at the sequential point
//! between levels, and terminates cooperatively with the best assignment
//! found so far when a monitor says so.

use crate::stats::SearchStatistics;
use haplotree_model::haplotype::Haplotype;

/// Control signal emitted by monitors to continue or abort the search.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// A snapshot of one completed frontier level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Recursion depth of the level (the first branched level is 1).
    pub depth: u64,
    /// The haplotype position the level committed.
    pub haplo_pos: usize,
    /// Frontier width of the level.
    pub frontier: u64,
    /// Frontier nodes that spawned children.
    pub expanded: u64,
    /// Frontier nodes cut by the bound test.
    pub pruned: u64,
    /// Smallest lower bound observed on the level.
    pub min_lower_bound: u64,
    /// The global shared upper bound after the level's publishes.
    pub upper_bound: u64,
}

impl std::fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LevelSummary(depth: {}, haplo_pos: {}, frontier: {}, expanded: {}, pruned: {}, min_lb: {}, ub: {})",
            self.depth,
            self.haplo_pos,
            self.frontier,
            self.expanded,
            self.pruned,
            self.min_lower_bound,
            self.upper_bound
        )
    }
}

/// Lifecycle hooks for a tree search run.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root is seeded.
    fn on_enter_search(&mut self, num_positions: usize, root_upper_bound: u64);

    /// Called after each level's join barrier.
    fn on_level_complete(&mut self, summary: &LevelSummary, stats: &SearchStatistics);

    /// Called once with the materialized assignment before the search
    /// returns (for interrupted runs this is the best found so far).
    fn on_solution_found(&mut self, haplotype: &Haplotype);

    /// Called once after the search finished.
    fn on_exit_search(&mut self, stats: &SearchStatistics);

    /// Consulted at the sequential point between levels.
    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand;
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

/// Delegating implementation so a borrowed monitor can be stacked into a
/// composite without giving up ownership.
impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, num_positions: usize, root_upper_bound: u64) {
        (**self).on_enter_search(num_positions, root_upper_bound);
    }

    fn on_level_complete(&mut self, summary: &LevelSummary, stats: &SearchStatistics) {
        (**self).on_level_complete(summary, stats);
    }

    fn on_solution_found(&mut self, haplotype: &Haplotype) {
        (**self).on_solution_found(haplotype);
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        (**self).on_exit_search(stats);
    }

    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand {
        (**self).search_command(stats)
    }
}

/// A monitor that observes nothing and never terminates the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new no-op monitor.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl TreeSearchMonitor for NoOperationMonitor {
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    fn on_enter_search(&mut self, _num_positions: usize, _root_upper_bound: u64) {}
    fn on_level_complete(&mut self, _summary: &LevelSummary, _stats: &SearchStatistics) {}
    fn on_solution_found(&mut self, _haplotype: &Haplotype) {}
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}

    fn search_command(&self, _stats: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_monitor_always_continues() {
        let monitor = NoOperationMonitor::new();
        assert_eq!(
            monitor.search_command(&SearchStatistics::default()),
            SearchCommand::Continue
        );
        assert_eq!(monitor.name(), "NoOperationMonitor");
    }

    #[test]
    fn test_search_command_display() {
        assert_eq!(format!("{}", SearchCommand::Continue), "Continue");
        assert_eq!(
            format!("{}", SearchCommand::Terminate("budget".into())),
            "Terminate: budget"
        );
    }

    #[test]
    fn test_borrowed_monitor_delegates() {
        struct Counting {
            levels: u64,
        }
        impl TreeSearchMonitor for Counting {
            fn name(&self) -> &str {
                "Counting"
            }
            fn on_enter_search(&mut self, _n: usize, _ub: u64) {}
            fn on_level_complete(&mut self, _s: &LevelSummary, _st: &SearchStatistics) {
                self.levels += 1;
            }
            fn on_solution_found(&mut self, _h: &Haplotype) {}
            fn on_exit_search(&mut self, _st: &SearchStatistics) {}
            fn search_command(&self, _st: &SearchStatistics) -> SearchCommand {
                SearchCommand::Continue
            }
        }

        let mut inner = Counting { levels: 0 };
        {
            let mut borrowed: &mut Counting = &mut inner;
            let summary = LevelSummary {
                depth: 1,
                haplo_pos: 0,
                frontier: 2,
                expanded: 2,
                pruned: 0,
                min_lower_bound: 0,
                upper_bound: 10,
            };
            borrowed.on_level_complete(&summary, &SearchStatistics::default());
        }
        assert_eq!(inner.levels, 1);
    }
}
