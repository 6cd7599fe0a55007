//! Reaching-definitions analysis: forward, union-meet, gen/kill per
//! statement (spec.md §4.5).

use crate::cfg::{BasicBlock, BlockId, Cfg};
use crate::solver::{DataflowAnalysis, Direction};
use slang_hir::Stmt;
use std::collections::BTreeSet;

/// A definition site: the `(block, statement-index)` coordinate at which a
/// `Let` or `Assign` binds a variable name (spec.md §4.5, §9 "Fact
/// identity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefSite {
    pub block: BlockId,
    pub index: usize,
}

fn bound_name(stmt: &Stmt) -> Option<&str> {
    match stmt {
        Stmt::Let { name, .. } => Some(name.as_str()),
        Stmt::Assign { lhs, .. } => lhs.as_var(),
        _ => None,
    }
}

pub struct ReachingDefinitions<'a> {
    cfg: &'a Cfg,
}

impl<'a> ReachingDefinitions<'a> {
    pub fn new(cfg: &'a Cfg) -> Self {
        Self { cfg }
    }

    fn name_at(&self, site: DefSite) -> Option<&str> {
        bound_name(self.cfg.block(site.block)?.stmts.get(site.index)?)
    }
}

impl DataflowAnalysis for ReachingDefinitions<'_> {
    type Fact = BTreeSet<DefSite>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn initial(&self) -> Self::Fact {
        BTreeSet::new()
    }

    fn boundary(&self) -> Self::Fact {
        BTreeSet::new()
    }

    fn meet(&self, facts: &[Self::Fact], _block: &BasicBlock) -> Self::Fact {
        let mut result = BTreeSet::new();
        for fact in facts {
            result.extend(fact.iter().copied());
        }
        result
    }

    fn transfer(&self, incoming: &Self::Fact, block: &BasicBlock) -> Self::Fact {
        let mut working = incoming.clone();
        for (index, stmt) in block.stmts.iter().enumerate() {
            if let Some(name) = bound_name(stmt) {
                working.retain(|site| self.name_at(*site) != Some(name));
                working.insert(DefSite { block: block.id, index });
            }
        }
        working
    }
}
