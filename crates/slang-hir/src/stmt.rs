//! Statement nodes of the Slang HLIR.

use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Parameter lists are small in practice; inline storage avoids a heap
/// allocation for the common case.
pub type Params = SmallVec<[String; 4]>;

/// Opaque source position, carried only for diagnostic rendering. Never
/// interpreted by CFG construction or any analysis; `None` when the HLIR was
/// built without source tracking (e.g. synthesized in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

/// The target of an `Assign`. A plain `Var` binds a name directly (and is a
/// reaching-definitions/live-variables definition site); the other variants
/// write through a base expression that must itself be evaluated, so they
/// contribute a *use* of their base, not a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LValue {
    Var(String),
    Deref(Box<Expr>),
    Field { base: Box<Expr>, name: String },
    Index { base: Box<Expr>, index: Box<Expr> },
}

impl LValue {
    pub fn as_var(&self) -> Option<&str> {
        match self {
            LValue::Var(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Params,
    pub body: Vec<Stmt>,
    /// Synthesized leading parameter name for struct methods (resolves the
    /// open question in spec.md §9 about an implicit `this`).
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub id: String,
    pub methods: Vec<FunctionDecl>,
    pub fields: Vec<(String, Option<Expr>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let {
        name: String,
        expr: Expr,
    },
    Assign {
        lhs: LValue,
        expr: Expr,
    },
    ExprStmt(Expr),
    Print(Vec<Expr>),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Break {
        span: Option<Span>,
    },
    Continue {
        span: Option<Span>,
    },
    Function(FunctionDecl),
    Struct(StructDecl),
    Block(Vec<Stmt>),
    /// `*lhs = rhs` — a pointer-store. Does not bind a name.
    DerefAssign {
        lhs: Expr,
        rhs: Expr,
    },
}

/// A compilation unit: the ordered top-level statements of a program.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub stmts: Vec<Stmt>,
}
