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

//! # Integer Constant Traits
//!
//! Compile-time constants for common numeric sentinel values across integer
//! types. These traits provide a uniform way to access `0`, `+1`, and the
//! type maximum as associated constants, enabling concise generic code
//! without littering call sites with type-specific literals.
//!
//! ## Provided Traits
//!
//! - `Zero` — exposes `ZERO` for all integer primitives.
//! - `PlusOne` — exposes `PLUS_ONE` for all integer primitives.
//! - `MaxValue` — exposes `MAX_VALUE`, the "+∞" sentinel that seeds
//!   minimum trackers before any real value has been observed.
//!
//! ## Usage
//!
//! ```rust
//! use haplotree_core::num::constants::{MaxValue, PlusOne, Zero};
//!
//! fn step_forward<T: PlusOne + core::ops::Add<Output = T>>(x: T) -> T {
//!     x + T::PLUS_ONE
//! }
//!
//! fn unbounded<T: MaxValue + PartialEq>(x: T) -> bool {
//!     x == T::MAX_VALUE
//! }
//!
//! assert_eq!(step_forward(41u64), 42);
//! assert!(unbounded(u64::MAX));
//! assert_eq!(u32::ZERO, 0);
//! ```

/// A trait for integer types that have a constant representing 0.
pub trait Zero {
    /// The constant representing 0 for the implementing type.
    const ZERO: Self;
}

/// A trait for integer types that have a constant representing +1.
pub trait PlusOne {
    /// The constant representing +1 for the implementing type.
    const PLUS_ONE: Self;
}

/// A trait for integer types that have a constant representing their
/// maximum representable value.
pub trait MaxValue {
    /// The maximum representable value for the implementing type.
    const MAX_VALUE: Self;
}

macro_rules! impl_const_for {
    ($trait_name:ident, $const_name:ident, $value:expr, $t:ty) => {
        impl $trait_name for $t {
            const $const_name: Self = $value;
        }
    };
}

macro_rules! impl_zero_for {
    ($t:ty) => {
        impl_const_for!(Zero, ZERO, 0, $t);
    };
}

macro_rules! impl_plus_one_for {
    ($t:ty) => {
        impl_const_for!(PlusOne, PLUS_ONE, 1, $t);
    };
}

macro_rules! impl_max_value_for {
    ($t:ty) => {
        impl_const_for!(MaxValue, MAX_VALUE, <$t>::MAX, $t);
    };
}

impl_zero_for!(u8);
impl_zero_for!(u16);
impl_zero_for!(u32);
impl_zero_for!(u64);
impl_zero_for!(u128);
impl_zero_for!(usize);
impl_zero_for!(i8);
impl_zero_for!(i16);
impl_zero_for!(i32);
impl_zero_for!(i64);
impl_zero_for!(i128);
impl_zero_for!(isize);

impl_plus_one_for!(u8);
impl_plus_one_for!(u16);
impl_plus_one_for!(u32);
impl_plus_one_for!(u64);
impl_plus_one_for!(u128);
impl_plus_one_for!(usize);
impl_plus_one_for!(i8);
impl_plus_one_for!(i16);
impl_plus_one_for!(i32);
impl_plus_one_for!(i64);
impl_plus_one_for!(i128);
impl_plus_one_for!(isize);

impl_max_value_for!(u8);
impl_max_value_for!(u16);
impl_max_value_for!(u32);
impl_max_value_for!(u64);
impl_max_value_for!(u128);
impl_max_value_for!(usize);
impl_max_value_for!(i8);
impl_max_value_for!(i16);
impl_max_value_for!(i32);
impl_max_value_for!(i64);
impl_max_value_for!(i128);
impl_max_value_for!(isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_constants() {
        assert_eq!(u8::ZERO, 0u8);
        assert_eq!(u64::ZERO, 0u64);
        assert_eq!(usize::ZERO, 0usize);
        assert_eq!(i64::ZERO, 0i64);
    }

    #[test]
    fn test_plus_one_constants() {
        assert_eq!(u8::PLUS_ONE, 1u8);
        assert_eq!(u64::PLUS_ONE, 1u64);
        assert_eq!(usize::PLUS_ONE, 1usize);
        assert_eq!(i32::PLUS_ONE, 1i32);
    }

    #[test]
    fn test_max_value_constants() {
        assert_eq!(u64::MAX_VALUE, u64::MAX);
        assert_eq!(usize::MAX_VALUE, usize::MAX);
        assert_eq!(i64::MAX_VALUE, i64::MAX);
    }

    #[test]
    fn test_generic_usage() {
        fn smallest_seen<T: MaxValue>() -> T {
            T::MAX_VALUE
        }
        let seed: u64 = smallest_seen();
        assert_eq!(seed, u64::MAX);
    }
}
