//! Expression nodes of the Slang HLIR.
//!
//! Expressions are treated opaquely by CFG construction (they never contain
//! control flow of their own) but are inspected by dataflow analyses for
//! their free variables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Str(String),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// The callee of a function call: a bare name, or an arbitrary expression
/// that evaluates to a callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    Named(String),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Var(String),
    Literal(Literal),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `cond ? then_expr : else_expr`
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
    },
    Record(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Field {
        base: Box<Expr>,
        name: String,
    },
    Ref(Box<Expr>),
    Deref(Box<Expr>),
    Paren(Box<Expr>),
    /// An inlined (lambda-like) function literal. Captures lexical bindings
    /// by value; see free-variable treatment in `slang_hir::free_vars`.
    InlinedFunction {
        params: crate::stmt::Params,
        body: Vec<crate::stmt::Stmt>,
    },
}

impl Expr {
    pub fn var<S: Into<String>>(name: S) -> Self {
        Expr::Var(name.into())
    }

    pub fn number(n: f64) -> Self {
        Expr::Literal(Literal::Number(n))
    }
}
