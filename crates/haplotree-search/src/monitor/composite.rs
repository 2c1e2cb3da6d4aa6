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

/// A monitor that fans every hook out to a stack of monitors. The first
/// `Terminate` command wins.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl<'a> std::fmt::Debug for CompositeMonitor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let monitors_str = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");

        f.debug_struct("CompositeMonitor")
            .field("monitors", &monitors_str)
            .finish()
    }
}

impl<'a> std::fmt::Display for CompositeMonitor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let monitors_str = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");

        write!(f, "CompositeMonitor([{}])", monitors_str)
    }
}

impl<'a> CompositeMonitor<'a> {
    /// Creates an empty composite.
    #[inline]
    pub fn new() -> CompositeMonitor<'a> {
        CompositeMonitor {
            monitors: Vec::new(),
        }
    }

    /// Creates an empty composite with preallocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> CompositeMonitor<'a> {
        CompositeMonitor {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor to the stack.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Number of stacked monitors.
    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if no monitors are stacked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> TreeSearchMonitor for CompositeMonitor<'a> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, num_positions: usize, root_upper_bound: u64) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(num_positions, root_upper_bound);
        }
    }

    fn on_level_complete(&mut self, summary: &LevelSummary, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_level_complete(summary, stats);
        }
    }

    fn on_solution_found(&mut self, haplotype: &Haplotype) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(haplotype);
        }
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(stats);
        }
    }

    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand {
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command(stats) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}
