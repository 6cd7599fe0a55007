//! Immutable algebraic model of the Slang high-level intermediate
//! representation, consumed by `slang-cfg`'s CFG builder and dataflow
//! analyses.
//!
//! Slang HLIR nodes are produced by an external frontend (out of scope
//! here) and are assumed well-formed; this crate never reads source text
//! and performs no validation beyond what its types statically enforce.

pub mod expr;
pub mod free_vars;
pub mod pretty;
pub mod stmt;

pub use expr::{BinOp, Callee, Expr, Literal};
pub use free_vars::{block_free_vars, free_vars, lvalue_free_vars};
pub use pretty::{pretty_expr, pretty_stmt, pretty_unit};
pub use stmt::{CompilationUnit, FunctionDecl, LValue, Params, Span, Stmt, StructDecl};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_unit_round_trips_through_json() {
        let unit = CompilationUnit {
            stmts: vec![
                Stmt::Let {
                    name: "x".to_string(),
                    expr: Expr::number(10.0),
                },
                Stmt::Print(vec![Expr::var("x")]),
            ],
        };
        let json = serde_json::to_string(&unit).expect("serialize");
        let back: CompilationUnit = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(unit, back);
    }

    #[test]
    fn function_decl_with_receiver_round_trips() {
        let decl = FunctionDecl {
            name: "area".to_string(),
            params: Params::new(),
            body: vec![Stmt::Return(Some(Expr::var("w")))],
            receiver: Some("this".to_string()),
        };
        let json = serde_json::to_string(&decl).expect("serialize");
        let back: FunctionDecl = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decl, back);
    }
}
