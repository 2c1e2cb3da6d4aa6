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

use haplotree_model::haplotype::Haplotype;
use haplotree_search::result::TerminationReason;
use haplotree_search::stats::SearchStatistics;

/// Everything a finished search hands back: the assignment, the run
/// statistics and why the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    haplotype: Haplotype,
    statistics: SearchStatistics,
    reason: TerminationReason,
}

impl SearchOutcome {
    /// Wraps a run that proved its assignment optimal.
    #[inline]
    pub fn completed(haplotype: Haplotype, statistics: SearchStatistics) -> Self {
        Self {
            haplotype,
            statistics,
            reason: TerminationReason::Completed,
        }
    }

    /// Wraps a run a monitor cut short; the assignment is the best found
    /// so far.
    #[inline]
    pub fn interrupted(
        haplotype: Haplotype,
        statistics: SearchStatistics,
        reason: String,
    ) -> Self {
        Self {
            haplotype,
            statistics,
            reason: TerminationReason::Interrupted(reason),
        }
    }

    /// The per-position assignment.
    #[inline]
    pub fn haplotype(&self) -> &Haplotype {
        &self.haplotype
    }

    /// Consumes the outcome and returns the assignment.
    #[inline]
    pub fn into_haplotype(self) -> Haplotype {
        self.haplotype
    }

    /// The run statistics.
    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Why the run ended.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Returns `true` if the run proved its assignment optimal.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.reason.is_completed()
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchOutcome(reason: {}, haplotype: {})",
            self.reason, self.haplotype
        )
    }
}
