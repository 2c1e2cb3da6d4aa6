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

//! # Haplotree-BnB: parallel branch-and-bound for haplotype assembly
//!
//! The engine explores a binary decision tree level by level: each level
//! commits one haplotype position, evaluates all live branches in
//! parallel against a shared atomic upper bound, spawns arena children for
//! the survivors, and recurses on the next level. On termination the best
//! path is walked back up and every position receives its 0/1 value.
//!
//! Core flow
//! - Populate a [`tree::Tree`] (nodes, links, start node, worst case).
//! - Pick a [`cores::CoreAllocation`] (outer branch width, total op width).
//! - Run [`tree::Tree::explore`], or attach monitors with
//!   [`tree::Tree::explore_with_monitor`].
//!
//! Design highlights
//! - The search tree is an append-only arena ([`manager::NodeManager`]) of
//!   atomic records addressed by dense indices; expansion is one atomic
//!   fetch-and-add, and no search node is ever deallocated mid-run.
//! - The only cross-worker synchronization for bounds is the CAS-min
//!   update; the shared upper bound is monotone for the life of the
//!   search.
//! - Two nested parallel regions share one thread pool: branch workers
//!   stride over the frontier, and each bound computation may fan its
//!   link fold out over the remaining cores.
//!
//! Module map
//! - `bounder`: incremental lower/upper bound deltas for a candidate.
//! - `cores`: parallelism widths.
//! - `manager`: the search-node arena.
//! - `result`: search outcome (assignment + statistics + reason).
//! - `search_node`: the atomic search-tree record.
//! - `selector`: the static branching order.
//! - `tree`: the aggregate and the recursive parallel driver.

pub mod bounder;
pub mod cores;
pub mod manager;
pub mod result;
pub mod search_node;
pub mod selector;
pub mod tree;
