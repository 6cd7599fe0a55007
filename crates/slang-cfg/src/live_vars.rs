//! Live-variables analysis: backward, union-meet, use/def per statement
//! (spec.md §4.6).

use crate::cfg::BasicBlock;
use crate::solver::{DataflowAnalysis, Direction};
use slang_hir::{free_vars, lvalue_free_vars, Stmt};
use std::collections::BTreeSet;

/// `use` (free variables read) and `def` (variable bound, if any) for a
/// single statement.
fn use_def(stmt: &Stmt) -> (BTreeSet<String>, Option<String>) {
    match stmt {
        Stmt::Let { name, expr } => (free_vars(expr), Some(name.clone())),
        Stmt::Assign { lhs, expr } => {
            let mut uses = free_vars(expr);
            uses.extend(lvalue_free_vars(lhs));
            (uses, lhs.as_var().map(str::to_string))
        }
        Stmt::ExprStmt(expr) => (free_vars(expr), None),
        Stmt::Print(args) => {
            let mut uses = BTreeSet::new();
            for arg in args {
                uses.extend(free_vars(arg));
            }
            (uses, None)
        }
        Stmt::Return(Some(expr)) => (free_vars(expr), None),
        Stmt::Return(None) => (BTreeSet::new(), None),
        Stmt::DerefAssign { lhs, rhs } => {
            let mut uses = free_vars(lhs);
            uses.extend(free_vars(rhs));
            (uses, None)
        }
        // CFG construction never places these inside a basic block; kept
        // for exhaustiveness, contributing neither a use nor a def.
        Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::If { .. }
        | Stmt::While { .. }
        | Stmt::Function(_)
        | Stmt::Struct(_)
        | Stmt::Block(_) => (BTreeSet::new(), None),
    }
}

pub struct LiveVariables;

impl DataflowAnalysis for LiveVariables {
    type Fact = BTreeSet<String>;

    fn direction(&self) -> Direction {
        Direction::Backward
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
            result.extend(fact.iter().cloned());
        }
        result
    }

    fn transfer(&self, out: &Self::Fact, block: &BasicBlock) -> Self::Fact {
        let mut working = out.clone();
        for stmt in block.stmts.iter().rev() {
            let (uses, def) = use_def(stmt);
            if let Some(name) = &def {
                working.remove(name);
            }
            working.extend(uses);
        }
        working
    }
}
