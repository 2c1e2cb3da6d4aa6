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
use std::time::Instant;

/// A monitor that prints a fixed-width progress table, one row per level,
/// plus the statistics table when the search exits.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogMonitor {
    /// Creates a new log monitor.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    #[inline(always)]
    fn print_header(&self) {
        println!(
            "{:<9} | {:<7} | {:<9} | {:<9} | {:<9} | {:<8} | {:<14} | {:<14}",
            "Elapsed", "Depth", "Position", "Frontier", "Expanded", "Pruned", "Min Lower", "Upper Bound"
        );
        println!("{}", "-".repeat(98));
    }
}

impl TreeSearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, num_positions: usize, root_upper_bound: u64) {
        self.start_time = Instant::now();
        println!(
            "Exploring tree: {} positions, root upper bound {}",
            num_positions, root_upper_bound
        );
        self.print_header();
    }

    fn on_level_complete(&mut self, summary: &LevelSummary, _stats: &SearchStatistics) {
        let elapsed_field = format!("{:.1}s", self.start_time.elapsed().as_secs_f32());
        println!(
            "{:<9} | {:<7} | {:<9} | {:<9} | {:<9} | {:<8} | {:<14} | {:<14}",
            elapsed_field,
            summary.depth,
            summary.haplo_pos,
            summary.frontier,
            summary.expanded,
            summary.pruned,
            summary.min_lower_bound,
            summary.upper_bound
        );
    }

    fn on_solution_found(&mut self, haplotype: &Haplotype) {
        println!("Solution: {}", haplotype);
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        println!("{}", stats);
    }

    fn search_command(&self, _stats: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
