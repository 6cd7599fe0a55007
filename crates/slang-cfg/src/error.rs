//! Error categories for CFG construction and the dataflow solver
//! (spec.md §7).

use slang_hir::Span;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CfgError {
    /// `break` outside any enclosing loop.
    #[error("`break` outside any loop{}", span_suffix(.0))]
    BreakOutsideLoop(Option<Span>),

    /// `continue` outside any enclosing loop.
    #[error("`continue` outside any loop{}", span_suffix(.0))]
    ContinueOutsideLoop(Option<Span>),

    /// The worklist solver exceeded its iteration cap without reaching a
    /// fixed point. Indicates a non-monotone transfer function or a bug in
    /// the CFG, not a malformed program.
    #[error("dataflow solver exceeded iteration cap ({0} iterations) without reaching a fixed point")]
    IterationCapExceeded(usize),

    /// A structural invariant of the CFG (entry/exit shape, pred/succ
    /// consistency, reachability) was violated. Always indicates a bug in
    /// the builder, never a malformed input program.
    #[error("CFG invariant violated: {0}")]
    InvariantViolation(String),
}

fn span_suffix(span: &Option<Span>) -> String {
    match span {
        Some(s) => format!(" at {}:{}", s.line, s.col),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CfgError>;
