//! Generic monotone dataflow framework: a direction-parameterized worklist
//! solver over pluggable lattice operations (spec.md §4.4).

use crate::cfg::{BasicBlock, BlockId, Cfg};
use crate::error::{CfgError, Result};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// An instance of a monotone dataflow problem over a CFG. `Fact` is the
/// join-semilattice value propagated between blocks.
pub trait DataflowAnalysis {
    type Fact: Clone + PartialEq;

    fn direction(&self) -> Direction;

    /// Value at the boundary block: entry for a forward analysis, exit for
    /// a backward one.
    fn initial(&self) -> Self::Fact;

    /// Value at every other block before iteration begins (typically
    /// lattice bottom).
    fn boundary(&self) -> Self::Fact;

    /// Combine facts gathered from neighboring blocks. Must be correct
    /// (return the meet identity) when `facts` is empty.
    fn meet(&self, facts: &[Self::Fact], block: &BasicBlock) -> Self::Fact;

    /// Compute the outgoing fact of `block` from its incoming fact.
    fn transfer(&self, incoming: &Self::Fact, block: &BasicBlock) -> Self::Fact;
}

/// Per-block `(IN, OUT)` fact pairs computed by the solver.
#[derive(Debug, Clone)]
pub struct AnalysisResult<F> {
    pub in_facts: BTreeMap<BlockId, F>,
    pub out_facts: BTreeMap<BlockId, F>,
}

impl<F> AnalysisResult<F> {
    pub fn in_fact(&self, block: BlockId) -> Option<&F> {
        self.in_facts.get(&block)
    }

    pub fn out_fact(&self, block: BlockId) -> Option<&F> {
        self.out_facts.get(&block)
    }
}

/// Worklist-based fixed-point solver (spec.md §4.4 algorithm).
pub struct FixpointSolver;

impl FixpointSolver {
    /// Solve with the default iteration cap (`10 * blocks * statements`, a
    /// safety net rather than a tuned bound).
    pub fn solve<A: DataflowAnalysis>(analysis: &A, cfg: &Cfg) -> Result<AnalysisResult<A::Fact>> {
        Self::solve_with_cap(analysis, cfg, None)
    }

    /// Solve with an optional override of the default iteration cap, e.g.
    /// from `AnalysisConfig::iteration_cap`.
    pub fn solve_with_cap<A: DataflowAnalysis>(
        analysis: &A,
        cfg: &Cfg,
        cap_override: Option<usize>,
    ) -> Result<AnalysisResult<A::Fact>> {
        match analysis.direction() {
            Direction::Forward => {
                Self::solve_direction(analysis, cfg, cfg.entry(), cap_override, |b| &b.predecessors, |b| &b.successors)
            }
            Direction::Backward => {
                Self::solve_direction(analysis, cfg, cfg.exit(), cap_override, |b| &b.successors, |b| &b.predecessors)
            }
        }
    }

    /// `boundary_block` is entry (forward) or exit (backward). `upstream`
    /// reads the neighbor set the meet gathers from (predecessors forward,
    /// successors backward); `downstream` reads the neighbor set to
    /// re-enqueue on change.
    fn solve_direction<A: DataflowAnalysis>(
        analysis: &A,
        cfg: &Cfg,
        boundary_block: BlockId,
        cap_override: Option<usize>,
        upstream: impl Fn(&BasicBlock) -> &std::collections::BTreeSet<BlockId>,
        downstream: impl Fn(&BasicBlock) -> &std::collections::BTreeSet<BlockId>,
    ) -> Result<AnalysisResult<A::Fact>> {
        let forward = analysis.direction() == Direction::Forward;

        let mut in_facts: BTreeMap<BlockId, A::Fact> = BTreeMap::new();
        let mut out_facts: BTreeMap<BlockId, A::Fact> = BTreeMap::new();
        for id in cfg.block_ids() {
            in_facts.insert(id, analysis.boundary());
            out_facts.insert(id, analysis.boundary());
        }
        if forward {
            in_facts.insert(boundary_block, analysis.initial());
        } else {
            out_facts.insert(boundary_block, analysis.initial());
        }

        let mut worklist: VecDeque<BlockId> = cfg.block_ids().collect();
        let mut queued: std::collections::BTreeSet<BlockId> = worklist.iter().copied().collect();

        let total_stmts: usize = cfg.blocks().map(|b| b.stmts.len()).sum();
        let cap = cap_override.unwrap_or(10 * cfg.len().max(1) * total_stmts.max(1));
        let mut iterations = 0usize;

        while let Some(id) = worklist.pop_front() {
            queued.remove(&id);
            iterations += 1;
            if iterations > cap {
                warn!(cap, "dataflow solver exceeded iteration cap");
                return Err(CfgError::IterationCapExceeded(iterations));
            }

            let Some(block) = cfg.block(id) else {
                continue;
            };

            let pinned = id == boundary_block;
            let gathered: Vec<A::Fact> = upstream(block)
                .iter()
                .filter_map(|n| if forward { out_facts.get(n) } else { in_facts.get(n) })
                .cloned()
                .collect();
            let new_pinned_side = if pinned {
                analysis.initial()
            } else {
                analysis.meet(&gathered, block)
            };
            let new_other_side = analysis.transfer(&new_pinned_side, block);

            let (changed, new_in, new_out) = if forward {
                let changed = in_facts.get(&id) != Some(&new_pinned_side) || out_facts.get(&id) != Some(&new_other_side);
                (changed, new_pinned_side, new_other_side)
            } else {
                let changed = out_facts.get(&id) != Some(&new_pinned_side) || in_facts.get(&id) != Some(&new_other_side);
                (changed, new_other_side, new_pinned_side)
            };

            if changed {
                in_facts.insert(id, new_in);
                out_facts.insert(id, new_out);
                for &neighbor in downstream(block) {
                    if queued.insert(neighbor) {
                        worklist.push_back(neighbor);
                    }
                }
            }
        }

        debug!(iterations, blocks = cfg.len(), "dataflow solver reached fixed point");
        Ok(AnalysisResult { in_facts, out_facts })
    }
}
