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

use haplotree_bnb::cores::CoreAllocation;
use haplotree_bnb::result::SearchOutcome;
use haplotree_bnb::tree::Tree;
use haplotree_search::monitor::composite::CompositeMonitor;
use haplotree_search::monitor::interrupt::InterruptMonitor;
use haplotree_search::monitor::log::LogMonitor;
use haplotree_search::monitor::search_monitor::TreeSearchMonitor;
use haplotree_search::monitor::time_limit::TimeLimitMonitor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Runs searches with a configured monitor stack.
///
/// Every solve assembles, in order: the interrupt monitor (so
/// [`Solver::request_stop`] works from any thread), the time-limit
/// monitor if configured, the progress logger if enabled, and whatever
/// the caller passes to [`Solver::solve_with_monitor`].
pub struct Solver {
    cores: CoreAllocation,
    time_limit: Option<Duration>,
    log_progress: bool,
    /// Shared flag to signal the running search to stop.
    stop_signal: AtomicBool,
}

impl Solver {
    /// Solves the given tree with the configured stack.
    pub fn solve(&self, tree: &Tree) -> SearchOutcome {
        let mut monitor = self.build_monitor_stack();
        tree.explore_with_monitor(self.cores, &mut monitor)
    }

    /// Solves the given tree with the configured stack plus a
    /// caller-provided monitor.
    pub fn solve_with_monitor<M>(&self, tree: &Tree, user_monitor: &mut M) -> SearchOutcome
    where
        M: TreeSearchMonitor,
    {
        let mut monitor = self.build_monitor_stack();
        monitor.add_monitor(user_monitor);
        tree.explore_with_monitor(self.cores, &mut monitor)
    }

    /// Signals the running search to stop after its current level. Safe to
    /// call from another thread through a shared reference.
    #[inline]
    pub fn request_stop(&self) {
        self.stop_signal.store(true, Ordering::Relaxed);
    }

    /// Clears a previously requested stop so the solver can run again.
    #[inline]
    pub fn reset_stop(&self) {
        self.stop_signal.store(false, Ordering::Relaxed);
    }

    /// The shared stop flag, for wiring into external controllers.
    #[inline]
    pub fn stop_handle(&self) -> &AtomicBool {
        &self.stop_signal
    }

    /// The configured parallelism widths.
    #[inline]
    pub fn cores(&self) -> CoreAllocation {
        self.cores
    }

    /// The configured wall-clock limit.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    fn build_monitor_stack(&self) -> CompositeMonitor<'_> {
        let mut monitor = CompositeMonitor::with_capacity(3);
        monitor.add_monitor(InterruptMonitor::new(&self.stop_signal));
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        if self.log_progress {
            monitor.add_monitor(LogMonitor::new());
        }
        monitor
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solver(cores: {}, time_limit: {:?}, log_progress: {})",
            self.cores, self.time_limit, self.log_progress
        )
    }
}

/// Builder-style configuration for [`Solver`].
pub struct SolverBuilder {
    cores: CoreAllocation,
    time_limit: Option<Duration>,
    log_progress: bool,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// Starts from a serial, unlimited, quiet configuration.
    #[inline]
    pub fn new() -> Self {
        Self {
            cores: CoreAllocation::serial(),
            time_limit: None,
            log_progress: false,
        }
    }

    /// Sets the parallelism widths.
    #[inline]
    pub fn with_cores(mut self, cores: CoreAllocation) -> Self {
        self.cores = cores;
        self
    }

    /// Sets a wall-clock limit; the search returns its best assignment so
    /// far when the limit trips.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables the per-level progress table on stdout.
    #[inline]
    pub fn with_progress_log(mut self) -> Self {
        self.log_progress = true;
        self
    }

    /// Builds the solver.
    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            cores: self.cores,
            time_limit: self.time_limit,
            log_progress: self.log_progress,
            stop_signal: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haplotree_search::monitor::search_monitor::{LevelSummary, SearchCommand};
    use haplotree_search::result::TerminationReason;
    use haplotree_search::stats::SearchStatistics;
    use std::sync::atomic::Ordering;

    fn chain_tree() -> Tree {
        let mut tree = Tree::new(3);
        let first = tree.create_link(0, 1);
        first.homo_weight().store(4, Ordering::Relaxed);
        first.hetro_weight().store(1, Ordering::Relaxed);
        let second = tree.create_link(1, 2);
        second.homo_weight().store(1, Ordering::Relaxed);
        second.hetro_weight().store(4, Ordering::Relaxed);
        tree.max_worst_case().store(10, Ordering::Relaxed);
        tree
    }

    #[test]
    fn test_solver_matches_direct_explore() {
        let tree = chain_tree();
        let solver = SolverBuilder::new()
            .with_cores(CoreAllocation::serial())
            .build();

        let outcome = solver.solve(&tree);
        let direct = chain_tree().explore(CoreAllocation::serial());

        assert!(outcome.is_completed());
        assert_eq!(outcome.haplotype(), direct.haplotype());
        assert_eq!(outcome.haplotype().objective(), 2);
    }

    #[test]
    fn test_requested_stop_interrupts_the_search() {
        let tree = chain_tree();
        let solver = SolverBuilder::new().build();
        solver.request_stop();
        assert!(solver.stop_handle().load(Ordering::Relaxed));

        let outcome = solver.solve(&tree);
        match outcome.reason() {
            TerminationReason::Interrupted(reason) => {
                assert_eq!(reason, "Interrupt signal received");
            }
            other => panic!("expected Interrupted, got {:?}", other),
        }

        // A cleared flag lets the next run finish.
        solver.reset_stop();
        assert!(!solver.stop_handle().load(Ordering::Relaxed));
        assert!(solver.solve(&tree).is_completed());
    }

    #[test]
    fn test_builder_configuration_round_trips() {
        let solver = SolverBuilder::new()
            .with_cores(CoreAllocation::new(2, 4))
            .with_time_limit(Duration::from_secs(60))
            .with_progress_log()
            .build();

        assert_eq!(solver.cores(), CoreAllocation::new(2, 4));
        assert_eq!(solver.time_limit(), Some(Duration::from_secs(60)));

        // The full stack (interrupt + time limit + progress log) still
        // proves the same optimum.
        let outcome = solver.solve(&chain_tree());
        assert!(outcome.is_completed());
        assert_eq!(outcome.haplotype().objective(), 2);
    }

    #[test]
    fn test_zero_time_limit_interrupts() {
        let tree = chain_tree();
        let solver = SolverBuilder::new()
            .with_time_limit(Duration::ZERO)
            .build();

        let outcome = solver.solve(&tree);
        assert!(!outcome.is_completed());
    }

    #[test]
    fn test_user_monitor_is_stacked() {
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
            fn on_solution_found(&mut self, _h: &haplotree_model::haplotype::Haplotype) {}
            fn on_exit_search(&mut self, _st: &SearchStatistics) {}
            fn search_command(&self, _st: &SearchStatistics) -> SearchCommand {
                SearchCommand::Continue
            }
        }

        let tree = chain_tree();
        let solver = SolverBuilder::new().build();
        let mut counting = Counting { levels: 0 };
        let outcome = solver.solve_with_monitor(&tree, &mut counting);

        assert!(outcome.is_completed());
        assert_eq!(counting.levels, 3);
    }
}
