//! Free-variable collection over HLIR expressions.
//!
//! Used by the live-variables analysis (see `slang-cfg`) to compute the
//! `use` set of a statement. Recurses through every expression variant,
//! including `InlinedFunction`, whose own parameters shadow within its body
//! (captured names that remain free become a use at the enclosing site).

use crate::expr::{Callee, Expr};
use crate::stmt::{LValue, Stmt};
use std::collections::HashSet;

/// Free variables referenced by a single expression.
pub fn free_vars(expr: &Expr) -> HashSet<String> {
    let mut bound = HashSet::new();
    let mut free = HashSet::new();
    collect_expr(expr, &mut bound, &mut free);
    free
}

/// Free variables referenced by a base expression of an l-value (the
/// binding target itself, `LValue::Var`, contributes no use).
pub fn lvalue_free_vars(lhs: &LValue) -> HashSet<String> {
    let mut bound = HashSet::new();
    let mut free = HashSet::new();
    collect_lvalue(lhs, &mut bound, &mut free);
    free
}

/// Free variables of a statement sequence, e.g. an `InlinedFunction` body,
/// honoring `Let` bindings and nested scopes within the sequence.
pub fn block_free_vars(stmts: &[Stmt]) -> HashSet<String> {
    let mut bound = HashSet::new();
    let mut free = HashSet::new();
    collect_stmts(stmts, &mut bound, &mut free);
    free
}

fn collect_stmts(stmts: &[Stmt], bound: &mut HashSet<String>, free: &mut HashSet<String>) {
    for stmt in stmts {
        match stmt {
            Stmt::Let { name, expr } => {
                collect_expr(expr, bound, free);
                bound.insert(name.clone());
            }
            Stmt::Assign { lhs, expr } => {
                collect_lvalue(lhs, bound, free);
                collect_expr(expr, bound, free);
            }
            Stmt::ExprStmt(expr) => collect_expr(expr, bound, free),
            Stmt::Print(args) => {
                for arg in args {
                    collect_expr(arg, bound, free);
                }
            }
            Stmt::Return(Some(expr)) => collect_expr(expr, bound, free),
            Stmt::Return(None) => {}
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                collect_expr(cond, bound, free);
                let mut then_scope = bound.clone();
                collect_stmts(then_block, &mut then_scope, free);
                if let Some(else_stmts) = else_block {
                    let mut else_scope = bound.clone();
                    collect_stmts(else_stmts, &mut else_scope, free);
                }
            }
            Stmt::While { cond, body } => {
                collect_expr(cond, bound, free);
                let mut body_scope = bound.clone();
                collect_stmts(body, &mut body_scope, free);
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::Function(_) => {
                // A nested function declaration introduces its own scope;
                // it contributes no free variable at the declaration site.
            }
            Stmt::Struct(decl) => {
                for (_, init) in &decl.fields {
                    if let Some(expr) = init {
                        collect_expr(expr, bound, free);
                    }
                }
            }
            Stmt::Block(inner) => {
                let mut inner_scope = bound.clone();
                collect_stmts(inner, &mut inner_scope, free);
            }
            Stmt::DerefAssign { lhs, rhs } => {
                collect_expr(lhs, bound, free);
                collect_expr(rhs, bound, free);
            }
        }
    }
}

fn collect_lvalue(lhs: &LValue, bound: &mut HashSet<String>, free: &mut HashSet<String>) {
    match lhs {
        LValue::Var(_) => {}
        LValue::Deref(expr) => collect_expr(expr, bound, free),
        LValue::Field { base, .. } => collect_expr(base, bound, free),
        LValue::Index { base, index } => {
            collect_expr(base, bound, free);
            collect_expr(index, bound, free);
        }
    }
}

fn collect_expr(expr: &Expr, bound: &mut HashSet<String>, free: &mut HashSet<String>) {
    match expr {
        Expr::Var(name) => {
            if !bound.contains(name) {
                free.insert(name.clone());
            }
        }
        Expr::Literal(_) => {}
        Expr::Binary { left, right, .. } => {
            collect_expr(left, bound, free);
            collect_expr(right, bound, free);
        }
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            collect_expr(cond, bound, free);
            collect_expr(then_expr, bound, free);
            collect_expr(else_expr, bound, free);
        }
        Expr::Call { callee, args } => {
            if let Callee::Expr(callee_expr) = callee {
                collect_expr(callee_expr, bound, free);
            }
            for arg in args {
                collect_expr(arg, bound, free);
            }
        }
        Expr::Record(fields) => {
            for (_, value) in fields {
                collect_expr(value, bound, free);
            }
        }
        Expr::Array(items) => {
            for item in items {
                collect_expr(item, bound, free);
            }
        }
        Expr::Index { base, index } => {
            collect_expr(base, bound, free);
            collect_expr(index, bound, free);
        }
        Expr::Field { base, .. } => collect_expr(base, bound, free),
        Expr::Ref(inner) | Expr::Deref(inner) | Expr::Paren(inner) => collect_expr(inner, bound, free),
        Expr::InlinedFunction { params, body } => {
            let mut inner_scope = bound.clone();
            inner_scope.extend(params.iter().cloned());
            collect_stmts(body, &mut inner_scope, free);
        }
    }
}
