//! Loading HLIR fixtures (JSON-serialized `CompilationUnit`s) from disk.

use anyhow::{Context, Result};
use slang_hir::{CompilationUnit, FunctionDecl};
use std::path::Path;

pub fn load(path: &Path) -> Result<CompilationUnit> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing fixture {}", path.display()))
}

/// Find a function by name among the unit's top-level functions and any
/// struct methods, since `--function` may name either.
pub fn find_function<'a>(unit: &'a CompilationUnit, name: &str) -> Option<&'a FunctionDecl> {
    unit.stmts.iter().find_map(|stmt| match stmt {
        slang_hir::Stmt::Function(decl) if decl.name == name => Some(decl),
        slang_hir::Stmt::Struct(decl) => decl.methods.iter().find(|m| m.name == name),
        _ => None,
    })
}

/// Every function declared anywhere in the unit: top-level functions and
/// struct methods.
pub fn all_functions(unit: &CompilationUnit) -> Vec<&FunctionDecl> {
    unit.stmts
        .iter()
        .flat_map(|stmt| match stmt {
            slang_hir::Stmt::Function(decl) => vec![decl],
            slang_hir::Stmt::Struct(decl) => decl.methods.iter().collect(),
            _ => vec![],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_hir::{Expr, Stmt};

    fn sample_unit() -> CompilationUnit {
        CompilationUnit {
            stmts: vec![Stmt::Function(FunctionDecl {
                name: "double".to_string(),
                params: smallvec::smallvec!["x".to_string()],
                body: vec![Stmt::Return(Some(Expr::var("x")))],
                receiver: None,
            })],
        }
    }

    #[test]
    fn finds_top_level_function_by_name() {
        let unit = sample_unit();
        assert!(find_function(&unit, "double").is_some());
        assert!(find_function(&unit, "missing").is_none());
    }

    #[test]
    fn all_functions_collects_top_level_declarations() {
        let unit = sample_unit();
        assert_eq!(all_functions(&unit).len(), 1);
    }
}
