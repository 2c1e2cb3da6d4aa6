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

//! # Haplotree Core
//!
//! Foundational utilities and numeric primitives for the haplotree
//! haplotype-assembly ecosystem. This crate consolidates reusable building
//! blocks focused on performance and correctness that underpin the
//! higher-level model and solver crates.
//!
//! ## Modules
//!
//! - `num`: Integer-centric utilities including associated constant traits
//!   (`Zero`, `PlusOne`, `MaxValue`) and by-value saturating arithmetic
//!   traits used for all bound accumulation.
//! - `sync`: Lock-free synchronization primitives, most importantly the
//!   CAS-based monotonic minimum update that the concurrent pruning
//!   protocol is built on.
//! - `utils`: Core helpers such as phantom-tagged, strongly typed indices
//!   (`TypedIndex<T>`).
//!
//! ## Purpose
//!
//! These primitives enable robust code in the search pipeline, reducing
//! accidental bugs (index mixing, overflow, non-monotonic bound updates)
//! while keeping runtime overhead minimal.

pub mod num;
pub mod sync;
pub mod utils;
