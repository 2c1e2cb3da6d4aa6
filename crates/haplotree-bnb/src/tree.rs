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

//! # The Tree and the Parallel Explore Driver
//!
//! `Tree` aggregates the model (nodes, links, start node, worst case) and
//! drives the search. `explore` seeds the arena root and its two children,
//! then `search_subnodes` walks the tree level by level: each call selects
//! one model node, evaluates the whole frontier in parallel against the
//! shared upper bound, spawns arena children for the survivors, and
//! recurses with the spawned children as the next frontier.
//!
//! The terminal level (the selector's last index) elects the best leaf —
//! the lexicographically smallest `(lower bound, arena index)` pair — and
//! the recursion unwinds along that leaf's ancestor chain, writing one
//! `haplo_value` per level. At a leaf the accumulated lower bound is the
//! exact objective of the assignment, so the elected leaf is optimal.
//!
//! Concurrency protocol, in order, per frontier node: set the decision,
//! compute the bound deltas, publish to the level incumbent and the shared
//! upper bound via CAS-min, then — unless this is the terminal level or
//! the lower bound exceeds the shared upper bound — reserve a child pair
//! with a single fetch-and-add and initialize it with the adjusted window.
//! The level's scope join is the only barrier the next level needs.

use crate::bounder::Bounder;
use crate::cores::CoreAllocation;
use crate::manager::NodeManager;
use crate::result::SearchOutcome;
use crate::search_node::BranchDirection;
use crate::selector::NodeSelector;
use haplotree_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use haplotree_model::haplotype::Haplotype;
use haplotree_model::index::{NodeIndex, SearchNodeIndex};
use haplotree_model::link::{Link, LinkContainer};
use haplotree_model::node::NodeContainer;
use haplotree_search::bound::{LevelIncumbent, SharedBound};
use haplotree_search::monitor::search_monitor::{
    LevelSummary, NoOperationMonitor, SearchCommand, TreeSearchMonitor,
};
use haplotree_search::stats::SearchStatistics;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// The searchable model: nodes, links, and the two root parameters.
///
/// The loader populates the model through the atomic accessors, then the
/// search runs on `&self`; the only field the engine mutates is each
/// node's `haplo_value`, from the sequential post-join phase.
#[derive(Debug, Default)]
pub struct Tree {
    start_node: AtomicUsize,
    start_node_worst_case: AtomicU64,
    nodes: NodeContainer,
    links: LinkContainer,
}

impl Tree {
    /// Creates a tree over `num_nodes` haplotype positions.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            start_node: AtomicUsize::new(0),
            start_node_worst_case: AtomicU64::new(0),
            nodes: NodeContainer::new(num_nodes),
            links: LinkContainer::new(),
        }
    }

    /// Resizes the tree to `num_nodes` positions; a no-op at the current
    /// size.
    pub fn resize(&mut self, num_nodes: usize) {
        self.nodes.resize(num_nodes);
    }

    /// The number of nodes in the tree.
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.num_nodes()
    }

    /// The node container.
    #[inline]
    pub fn nodes(&self) -> &NodeContainer {
        &self.nodes
    }

    /// The link container.
    #[inline]
    pub fn links(&self) -> &LinkContainer {
        &self.links
    }

    /// Creates (or finds) the link between two nodes and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `node_idx_lower >= node_idx_upper`.
    #[inline]
    pub fn create_link(&mut self, node_idx_lower: usize, node_idx_upper: usize) -> &Link {
        self.links.insert(node_idx_lower, node_idx_upper)
    }

    /// The link between two nodes.
    ///
    /// # Panics
    ///
    /// Panics if the pair is absent; check with `links().exists` first.
    #[inline]
    pub fn link(&self, node_idx_lower: usize, node_idx_upper: usize) -> &Link {
        self.links.at(node_idx_lower, node_idx_upper)
    }

    /// The value of the link between two nodes, or 0 if absent.
    #[inline]
    pub fn link_max(&self, node_idx_lower: usize, node_idx_upper: usize) -> u64 {
        self.links.link_max(node_idx_lower, node_idx_upper)
    }

    /// Accessor for the weight of a node.
    #[inline]
    pub fn node_weight(&self, idx: usize) -> &AtomicU64 {
        self.nodes.weight(idx)
    }

    /// Accessor for the worst-case value of a node.
    #[inline]
    pub fn node_worst_case(&self, idx: usize) -> &AtomicU64 {
        self.nodes.worst_case_value(idx)
    }

    /// Accessor for the haplotype position of a node.
    #[inline]
    pub fn node_haplo_pos(&self, idx: usize) -> &AtomicUsize {
        self.nodes.haplo_pos(idx)
    }

    /// Accessor for the tree-wide worst case, the root window's upper
    /// bound. Must be at least [`Tree::computed_worst_case`] when
    /// `explore` runs.
    #[inline]
    pub fn max_worst_case(&self) -> &AtomicU64 {
        &self.start_node_worst_case
    }

    /// Accessor for the index of the node the search branches first.
    #[inline]
    pub fn start_node(&self) -> &AtomicUsize {
        &self.start_node
    }

    /// The summed maxima of all links: the tightest admissible root
    /// window.
    pub fn computed_worst_case(&self) -> u64 {
        self.links
            .iter()
            .fold(0u64, |acc, (_, link)| acc.saturating_add_val(link.value()))
    }

    /// Loader helper: refreshes every node's worst case (its summed
    /// incident link maxima) and seeds the tree-wide worst case from the
    /// link set.
    pub fn recompute_worst_cases(&self) {
        for node in self.nodes.iter() {
            node.worst_case().store(0, Ordering::Relaxed);
        }
        let mut total = 0u64;
        for (key, link) in self.links.iter() {
            let value = link.value();
            self.nodes
                .worst_case_value(key.lower())
                .fetch_add(value, Ordering::Relaxed);
            self.nodes
                .worst_case_value(key.upper())
                .fetch_add(value, Ordering::Relaxed);
            total = total.saturating_add_val(value);
        }
        self.start_node_worst_case.store(total, Ordering::Relaxed);
    }

    /// Loader helper: points `start_node` at the highest-influence node
    /// (largest worst case, ties to the lower index). Call after
    /// [`Tree::recompute_worst_cases`].
    pub fn set_start_from_worst_cases(&self) {
        let mut best = (0u64, 0usize);
        for (idx, node) in self.nodes.iter().enumerate() {
            let worst_case = node.worst_case().load(Ordering::Relaxed);
            if worst_case > best.0 {
                best = (worst_case, idx);
            }
        }
        self.start_node.store(best.1, Ordering::Relaxed);
    }

    /// Runs the search with the given parallelism widths.
    pub fn explore(&self, cores: CoreAllocation) -> SearchOutcome {
        let mut monitor = NoOperationMonitor::new();
        self.explore_with_monitor(cores, &mut monitor)
    }

    /// Runs the search, reporting progress to `monitor` and honoring its
    /// termination commands at the sequential point between levels.
    ///
    /// # Panics
    ///
    /// Panics if the stored start node is out of bounds. In debug builds,
    /// panics if the stored worst case is below the summed link maxima
    /// (the root window would invert mid-search).
    pub fn explore_with_monitor<M>(&self, cores: CoreAllocation, monitor: &mut M) -> SearchOutcome
    where
        M: TreeSearchMonitor,
    {
        let start_time = Instant::now();
        let num_nodes = self.nodes.num_nodes();
        let mut stats = SearchStatistics::default();

        if self.nodes.is_empty() {
            monitor.on_enter_search(0, 0);
            let haplotype = Haplotype::from_nodes(&self.nodes, 0);
            stats.set_total_time(start_time.elapsed());
            monitor.on_solution_found(&haplotype);
            monitor.on_exit_search(&stats);
            return SearchOutcome::completed(haplotype, stats);
        }

        let start_node = self.start_node.load(Ordering::Relaxed);
        assert!(
            start_node < num_nodes,
            "called `Tree::explore` with start node out of bounds: the len is {} but the index is {}",
            num_nodes,
            start_node
        );
        let worst_case = self.start_node_worst_case.load(Ordering::Relaxed);
        debug_assert!(
            worst_case >= self.computed_worst_case(),
            "root worst case {} is below the summed link maxima {}; the bound window would invert",
            worst_case,
            self.computed_worst_case()
        );

        monitor.on_enter_search(num_nodes, worst_case);
        stats.set_root_upper_bound(worst_case);

        let manager = NodeManager::for_positions(num_nodes);

        // Seed the root and its two children with the full window.
        let root_idx = manager.get_next_node();
        let root = manager.node(root_idx);
        root.set_index(NodeIndex::new(start_node));
        root.set_value(0);
        root.set_bounds((0, worst_case));

        let seed_pair = manager.get_next_pair();
        root.set_left(seed_pair);
        root.set_right(seed_pair + 1);
        for (offset, direction) in [BranchDirection::Left, BranchDirection::Right]
            .into_iter()
            .enumerate()
        {
            let child = manager.node(seed_pair + offset);
            child.set_branch_direction(direction);
            child.set_root(root_idx);
            child.set_bounds((0, worst_case));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cores.op_cores())
            .thread_name(|i| format!("haplotree-worker-{}", i))
            .build()
            .expect("failed to build the search thread pool");

        let mut ctx = SearchContext {
            manager,
            selector: NodeSelector::new(&self.nodes, &self.links, start_node),
            bounder: Bounder::new(&self.nodes, &self.links),
            min_ubound: SharedBound::with_initial(worst_case),
            pool,
            cores,
            stats,
            monitor,
            best_objective: None,
            interrupt_reason: None,
        };

        self.search_subnodes(&mut ctx, seed_pair, 2, 1);

        let SearchContext {
            manager,
            min_ubound,
            mut stats,
            monitor,
            best_objective,
            interrupt_reason,
            ..
        } = ctx;

        stats.set_nodes_allocated(manager.allocated() as u64);
        stats.set_final_upper_bound(min_ubound.upper_bound());
        let objective = best_objective.unwrap_or(0);
        stats.set_best_objective(objective);
        stats.set_total_time(start_time.elapsed());

        let haplotype = Haplotype::from_nodes(&self.nodes, objective);
        monitor.on_solution_found(&haplotype);
        monitor.on_exit_search(&stats);

        match interrupt_reason {
            Some(reason) => SearchOutcome::interrupted(haplotype, stats, reason),
            None => SearchOutcome::completed(haplotype, stats),
        }
    }

    /// Explores one frontier level and recurses on the spawned children.
    ///
    /// `start_index` is the arena index of the level's first frontier
    /// node, `num_subnodes` the frontier width. Returns the arena index of
    /// the member of *this* frontier that lies on the best path, so the
    /// caller can continue the assignment walk upward.
    fn search_subnodes<M>(
        &self,
        ctx: &mut SearchContext<'_, M>,
        start_index: SearchNodeIndex,
        num_subnodes: usize,
        depth: u64,
    ) -> SearchNodeIndex
    where
        M: TreeSearchMonitor,
    {
        let search_idx = ctx.selector.select_node();
        let is_last = search_idx == ctx.selector.last_search_index();
        let haplo_idx = self.nodes.at(search_idx).position();
        let branch_cores = ctx.cores.branch_cores().min(num_subnodes);
        let bound_threads = ctx.cores.bound_threads();

        let num_branches = AtomicU64::new(0);
        let num_pruned = AtomicU64::new(0);
        let level_best = LevelIncumbent::new();

        {
            let manager = &ctx.manager;
            let bounder = &ctx.bounder;
            let min_ubound = &ctx.min_ubound;
            let num_branches = &num_branches;
            let num_pruned = &num_pruned;
            let level_best = &level_best;

            ctx.pool.scope(|scope| {
                for thread_id in 0..branch_cores {
                    scope.spawn(move |_| {
                        // Strided walk: worker t visits start + t,
                        // start + t + w, ... for width w.
                        let mut offset = thread_id;
                        while offset < num_subnodes {
                            let node_idx = start_index + offset;
                            let node = manager.node(node_idx);
                            node.set_index(NodeIndex::new(search_idx));
                            node.set_value(node.branch_direction().as_value());

                            let delta =
                                bounder.calculate(haplo_idx, node_idx, manager, bound_threads);
                            let (lower, upper) = node.apply_delta(delta.lower, delta.upper);

                            level_best.record(lower, node_idx.get());
                            min_ubound.tighten(upper);

                            if is_last {
                                // Terminal level: candidates only, nothing
                                // left to spawn.
                            } else if lower <= min_ubound.upper_bound() {
                                let left_idx = manager.get_next_pair();
                                let left = manager.node(left_idx);
                                let right = manager.node(left_idx + 1);
                                left.set_branch_direction(BranchDirection::Left);
                                right.set_branch_direction(BranchDirection::Right);
                                left.set_root(node_idx);
                                right.set_root(node_idx);
                                left.set_bounds(node.bounds());
                                right.set_bounds(node.bounds());
                                node.set_left(left_idx);
                                node.set_right(left_idx + 1);
                                num_branches.fetch_add(2, Ordering::Relaxed);
                            } else {
                                num_pruned.fetch_add(1, Ordering::Relaxed);
                            }

                            offset += branch_cores;
                        }
                    });
                }
            });
        }

        let branches = num_branches.load(Ordering::Relaxed);
        let pruned = num_pruned.load(Ordering::Relaxed);
        ctx.stats.on_level(num_subnodes as u64, branches / 2, pruned);

        let summary = LevelSummary {
            depth,
            haplo_pos: haplo_idx,
            frontier: num_subnodes as u64,
            expanded: branches / 2,
            pruned,
            min_lower_bound: level_best.min_lower_bound(),
            upper_bound: ctx.min_ubound.upper_bound(),
        };
        ctx.monitor.on_level_complete(&summary, &ctx.stats);

        if ctx.interrupt_reason.is_none() {
            if let SearchCommand::Terminate(reason) = ctx.monitor.search_command(&ctx.stats) {
                ctx.interrupt_reason = Some(reason);
            }
        }

        let best_index = if !is_last && branches > 0 && ctx.interrupt_reason.is_none() {
            self.search_subnodes(ctx, start_index + num_subnodes, branches as usize, depth + 1)
        } else {
            // Terminal (or terminated) level: elect the best candidate.
            let (best_lower, best_idx) = level_best
                .best()
                .expect("a frontier level elected no best candidate");
            ctx.best_objective = Some(best_lower);
            SearchNodeIndex::new(best_idx)
        };

        // Walk the best path upward: this level's position takes the value
        // of the best-path member of this frontier.
        self.nodes
            .at(search_idx)
            .set_haplo_value(ctx.manager.node(best_index).value());
        ctx.manager.node(best_index).root()
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tree(nodes: {}, links: {}, start_node: {}, worst_case: {})",
            self.nodes.num_nodes(),
            self.links.len(),
            self.start_node.load(Ordering::Relaxed),
            self.start_node_worst_case.load(Ordering::Relaxed)
        )
    }
}

/// Everything one search run threads through its recursion.
struct SearchContext<'a, M> {
    manager: NodeManager,
    selector: NodeSelector,
    bounder: Bounder,
    min_ubound: SharedBound,
    pool: rayon::ThreadPool,
    cores: CoreAllocation,
    stats: SearchStatistics,
    monitor: &'a mut M,
    best_objective: Option<u64>,
    interrupt_reason: Option<String>,
}
