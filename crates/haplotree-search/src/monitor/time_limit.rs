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

use crate::monitor::search_monitor::{LevelSummary, SearchCommand, TreeSearchMonitor};
use crate::stats::SearchStatistics;
use haplotree_model::haplotype::Haplotype;
use std::time::{Duration, Instant};

/// A search monitor that terminates the search once a wall-clock budget is
/// exhausted. The clock starts at `on_enter_search`.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    limit: Duration,
    start_time: Instant,
}

impl TimeLimitMonitor {
    /// Creates a monitor enforcing the given wall-clock limit.
    #[inline]
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            start_time: Instant::now(),
        }
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _num_positions: usize, _root_upper_bound: u64) {
        self.start_time = Instant::now();
    }

    fn on_level_complete(&mut self, _summary: &LevelSummary, _stats: &SearchStatistics) {}
    fn on_solution_found(&mut self, _haplotype: &Haplotype) {}
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}

    fn search_command(&self, _stats: &SearchStatistics) -> SearchCommand {
        if self.start_time.elapsed() >= self.limit {
            SearchCommand::Terminate(format!(
                "time limit reached after {:.3}s",
                self.limit.as_secs_f64()
            ))
        } else {
            SearchCommand::Continue
        }
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeLimitMonitor(limit: {:.3}s)", self.limit.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generous_limit_continues() {
        let monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        assert_eq!(
            monitor.search_command(&SearchStatistics::default()),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_zero_limit_terminates() {
        let monitor = TimeLimitMonitor::new(Duration::ZERO);
        match monitor.search_command(&SearchStatistics::default()) {
            SearchCommand::Terminate(reason) => {
                assert!(reason.contains("time limit reached"));
            }
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_enter_search_restarts_the_clock() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        std::thread::sleep(Duration::from_millis(5));
        monitor.on_enter_search(4, 100);
        assert_eq!(
            monitor.search_command(&SearchStatistics::default()),
            SearchCommand::Continue
        );
    }
}
