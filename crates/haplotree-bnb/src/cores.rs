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

/// The parallelism widths of a search run.
///
/// `branch_cores` is the width of the outer region that walks a frontier
/// level; `op_cores` is the total worker budget. Each bound computation
/// inside a branch worker may fan out over `bound_threads()` =
/// `max(1, op_cores / branch_cores)` chunks, so the two nested regions
/// together stay within the `op_cores` budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreAllocation {
    branch_cores: usize,
    op_cores: usize,
}

impl CoreAllocation {
    /// Creates an allocation with explicit widths.
    ///
    /// # Panics
    ///
    /// Panics if either width is zero.
    #[inline]
    pub fn new(branch_cores: usize, op_cores: usize) -> Self {
        assert!(
            branch_cores > 0,
            "called `CoreAllocation::new` with zero branch cores"
        );
        assert!(
            op_cores > 0,
            "called `CoreAllocation::new` with zero op cores"
        );
        Self {
            branch_cores,
            op_cores,
        }
    }

    /// A fully sequential allocation. Runs on a single worker and is
    /// bit-reproducible across runs.
    #[inline]
    pub fn serial() -> Self {
        Self::new(1, 1)
    }

    /// Sizes both widths to the machine's available parallelism.
    pub fn auto() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(cores, cores)
    }

    /// The outer branch-parallel width.
    #[inline]
    pub fn branch_cores(&self) -> usize {
        self.branch_cores
    }

    /// The total worker budget.
    #[inline]
    pub fn op_cores(&self) -> usize {
        self.op_cores
    }

    /// The inner bound-parallel width per branch worker.
    #[inline]
    pub fn bound_threads(&self) -> usize {
        (self.op_cores / self.branch_cores).max(1)
    }
}

impl Default for CoreAllocation {
    fn default() -> Self {
        Self::serial()
    }
}

impl std::fmt::Display for CoreAllocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CoreAllocation(branch: {}, op: {}, bound: {})",
            self.branch_cores,
            self.op_cores,
            self.bound_threads()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CoreAllocation;

    #[test]
    fn test_bound_threads_split() {
        assert_eq!(CoreAllocation::new(1, 1).bound_threads(), 1);
        assert_eq!(CoreAllocation::new(2, 4).bound_threads(), 2);
        assert_eq!(CoreAllocation::new(4, 8).bound_threads(), 2);
        assert_eq!(CoreAllocation::new(8, 8).bound_threads(), 1);
        // More branch workers than ops still leaves one bound worker.
        assert_eq!(CoreAllocation::new(4, 2).bound_threads(), 1);
    }

    #[test]
    fn test_serial_allocation() {
        let serial = CoreAllocation::serial();
        assert_eq!(serial.branch_cores(), 1);
        assert_eq!(serial.op_cores(), 1);
        assert_eq!(serial.bound_threads(), 1);
    }

    #[test]
    fn test_auto_allocation_is_nonzero() {
        let auto = CoreAllocation::auto();
        assert!(auto.branch_cores() >= 1);
        assert!(auto.op_cores() >= 1);
    }

    #[test]
    #[should_panic]
    fn test_zero_branch_cores_rejected() {
        let _ = CoreAllocation::new(0, 4);
    }
}
