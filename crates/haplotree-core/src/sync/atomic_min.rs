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

//! # Monotonic Atomic Minimum
//!
//! The CAS-based minimum update that all concurrent bound sharing is built
//! on. Workers publish candidate bounds with [`atomic_min_update`]; the
//! stored value only ever decreases, which is the invariant the pruning
//! protocol's correctness hinges on. An unconditional store could revert a
//! tighter bound published by a faster worker and must never be substituted
//! for this primitive.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lowers `atomic` to `min(atomic, value)`.
///
/// The update is a load/compare/CAS loop: if the stored value is already
/// less than or equal to `value` the call returns without writing,
/// otherwise it attempts to install `value` and retries on contention.
/// Under concurrent calls the cell is always left at the minimum of all
/// published values, regardless of interleaving.
///
/// Orderings are `Relaxed`: the cell is a standalone monotone scalar and
/// carries no data dependencies; the read-modify-write itself is atomic,
/// and the fork/join barriers of the search provide the cross-level
/// happens-before edges.
///
/// # Examples
///
/// ```rust
/// use haplotree_core::sync::atomic_min::atomic_min_update;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let bound = AtomicU64::new(100);
/// atomic_min_update(&bound, 42);
/// atomic_min_update(&bound, 70); // no effect, 42 is already lower
/// assert_eq!(bound.load(Ordering::Relaxed), 42);
/// ```
pub fn atomic_min_update(atomic: &AtomicU64, value: u64) {
    let mut current = atomic.load(Ordering::Relaxed);
    loop {
        if current <= value {
            return;
        }
        match atomic.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(observed) => current = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::atomic_min_update;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lowers_stored_value() {
        let cell = AtomicU64::new(50);
        atomic_min_update(&cell, 10);
        assert_eq!(cell.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_larger_value_is_ignored() {
        let cell = AtomicU64::new(10);
        atomic_min_update(&cell, 50);
        assert_eq!(cell.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_equal_value_is_a_no_op() {
        let cell = AtomicU64::new(10);
        atomic_min_update(&cell, 10);
        assert_eq!(cell.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_sentinel_start() {
        let cell = AtomicU64::new(u64::MAX);
        atomic_min_update(&cell, 123);
        assert_eq!(cell.load(Ordering::Relaxed), 123);
    }

    #[test]
    fn test_concurrent_minimum_wins() {
        let cell = Arc::new(AtomicU64::new(u64::MAX));
        let values = [300u64, 200, 400, 50, 120, 75, 500, 60, 90];

        let mut handles = Vec::new();
        for v in values {
            let cell = Arc::clone(&cell);
            handles.push(thread::spawn(move || {
                // Publish the same value a few times to stress the loop.
                for _ in 0..100 {
                    atomic_min_update(&cell, v);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let min = *values.iter().min().unwrap();
        assert_eq!(cell.load(Ordering::Relaxed), min);
    }

    #[test]
    fn test_monotonically_non_increasing_sequence() {
        let cell = AtomicU64::new(u64::MAX);
        let mut last = u64::MAX;
        for v in [900u64, 950, 800, 850, 10, 20, 5] {
            atomic_min_update(&cell, v);
            let observed = cell.load(Ordering::Relaxed);
            assert!(observed <= last, "bound increased from {} to {}", last, observed);
            last = observed;
        }
        assert_eq!(last, 5);
    }
}
