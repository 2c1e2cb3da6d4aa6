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

//! # Shared Bound Primitives
//!
//! Concurrent containers for the two bound quantities a parallel
//! branch-and-bound search shares between workers:
//!
//! - [`SharedBound`]: the global minimum upper bound. A single atomic with
//!   a `u64::MAX` sentinel meaning "no bound yet"; every tightening goes
//!   through the CAS-min primitive so the value is monotonically
//!   non-increasing for the life of the search. Pruning correctness hangs
//!   on that monotonicity.
//! - [`LevelIncumbent`]: the best candidate of one frontier level. A cheap
//!   atomic lower-bound hint short-circuits obviously worse candidates
//!   without locking; the authoritative `(lower_bound, node_idx)` pair
//!   lives behind a `Mutex` and is ordered lexicographically, which makes
//!   tie-breaking deterministic under any thread interleaving.

use haplotree_core::num::constants::MaxValue;
use haplotree_core::sync::atomic_min::atomic_min_update;
use num_traits::PrimInt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// The global minimum upper bound of a search, shared by all workers.
///
/// Reads use `Ordering::Relaxed`: the bound is a standalone monotone
/// scalar used to short-circuit work, and a marginally stale read only
/// delays a prune by one test, it never admits a wrong one.
#[derive(Debug)]
pub struct SharedBound {
    upper_bound: AtomicU64,
}

impl Default for SharedBound {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBound {
    /// Creates an unbounded shared bound (sentinel `u64::MAX_VALUE`).
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicU64::new(u64::MAX_VALUE),
        }
    }

    /// Creates a shared bound seeded with an initial upper bound.
    #[inline]
    pub fn with_initial(upper_bound: u64) -> Self {
        Self {
            upper_bound: AtomicU64::new(upper_bound),
        }
    }

    /// Returns the current upper bound.
    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns the current upper bound converted to type `T`.
    #[inline]
    pub fn upper_bound_as<T>(&self) -> Result<T, <T as TryFrom<u64>>::Error>
    where
        T: PrimInt + TryFrom<u64>,
    {
        T::try_from(self.upper_bound())
    }

    /// Returns `true` while no candidate has been published.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.upper_bound() == u64::MAX_VALUE
    }

    /// Publishes a candidate upper bound; the stored value only ever
    /// decreases.
    #[inline]
    pub fn tighten(&self, candidate: u64) {
        atomic_min_update(&self.upper_bound, candidate);
    }
}

impl std::fmt::Display for SharedBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unbounded() {
            write!(f, "SharedBound(upper_bound: Inf)")
        } else {
            write!(f, "SharedBound(upper_bound: {})", self.upper_bound())
        }
    }
}

/// The best candidate of one frontier level.
///
/// Workers call [`LevelIncumbent::record`] for every evaluated frontier
/// node; after the level's join barrier, [`LevelIncumbent::best`] is the
/// lexicographic minimum of all recorded `(lower_bound, node_idx)` pairs.
/// The atomic hint is only an optimization: a candidate whose lower bound
/// is strictly worse than the hint can never win and skips the lock.
#[derive(Debug)]
pub struct LevelIncumbent {
    lower_hint: AtomicU64,
    best: Mutex<Option<(u64, usize)>>,
}

impl Default for LevelIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelIncumbent {
    /// Creates an empty incumbent (hint at the `u64::MAX_VALUE` sentinel).
    #[inline]
    pub fn new() -> Self {
        Self {
            lower_hint: AtomicU64::new(u64::MAX_VALUE),
            best: Mutex::new(None),
        }
    }

    /// Records an evaluated candidate.
    pub fn record(&self, lower_bound: u64, node_idx: usize) {
        atomic_min_update(&self.lower_hint, lower_bound);

        // A candidate strictly above the hint has already lost to someone;
        // ties must take the lock so the index tiebreak stays exact.
        if lower_bound > self.lower_hint.load(Ordering::Relaxed) {
            return;
        }

        let mut guard = self.best.lock().unwrap();
        // Another thread may have recorded while we were waiting for the
        // lock; compare against the actual stored pair, not the hint.
        match *guard {
            Some(best) if best <= (lower_bound, node_idx) => {}
            _ => *guard = Some((lower_bound, node_idx)),
        }
    }

    /// Returns the smallest recorded lower bound, or `u64::MAX` if nothing
    /// has been recorded.
    #[inline]
    pub fn min_lower_bound(&self) -> u64 {
        self.lower_hint.load(Ordering::Relaxed)
    }

    /// Returns the winning `(lower_bound, node_idx)` pair, if any.
    #[inline]
    pub fn best(&self) -> Option<(u64, usize)> {
        *self.best.lock().unwrap()
    }
}

impl std::fmt::Display for LevelIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best() {
            Some((lower_bound, node_idx)) => write!(
                f,
                "LevelIncumbent(lower_bound: {}, node_idx: {})",
                lower_bound, node_idx
            ),
            None => write!(f, "LevelIncumbent(empty)"),
        }
    }
}
