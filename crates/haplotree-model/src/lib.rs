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

//! # Haplotree Model
//!
//! **The core domain model for the haplotree weighted haplotype assembly
//! solver.**
//!
//! This crate defines the data structures the search engine operates on.
//! It serves as the data interchange layer between the problem definition
//! (an external loader populating node and link weights) and the solving
//! engine (`haplotree_bnb`).
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed wrappers (`NodeIndex`, `SearchNodeIndex`)
//!   preventing mixups between the dense node space and the search arena.
//! * **`node`**: The per-position `Node` record and the dense
//!   `NodeContainer`.
//! * **`link`**: The pairwise `Link` record, the strict `(lower, upper)`
//!   key, and the sparse `LinkContainer`.
//! * **`haplotype`**: The output format — one value per position plus the
//!   proven objective.
//!
//! ## Design Philosophy
//!
//! 1. **Atomic scalars**: every mutable field of `Node` and `Link` is an
//!    atomic, so the loader writes through shared references and the
//!    search reads concurrently without locks.
//! 2. **Load, then search**: link structure is only mutated while the
//!    loader holds exclusive access; during search the containers are
//!    structurally frozen and only `haplo_value` is ever written, from the
//!    sequential post-join phase.
//! 3. **Fail-fast**: strict key validation and debug-checked index access
//!    surface misuse at the call site rather than corrupting the search.

pub mod haplotype;
pub mod index;
pub mod link;
pub mod node;
