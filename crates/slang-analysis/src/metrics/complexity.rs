//! Complexity metrics computed directly from the CFG and HLIR, rather than
//! from source text.

use slang_cfg::Cfg;
use slang_hir::Stmt;

/// McCabe cyclomatic complexity: `E - N + 2` for the single-entry,
/// single-exit CFG produced by `slang-cfg`.
pub fn cyclomatic_complexity(cfg: &Cfg) -> u32 {
    let edges: usize = cfg.blocks().map(|b| b.successors.len()).sum();
    let nodes = cfg.len();
    (edges as i64 - nodes as i64 + 2).max(1) as u32
}

/// Statement count over a nested HLIR body, recursing into every branch and
/// loop so a deeply-nested function is not undercounted.
pub fn count_statements(stmts: &[Stmt]) -> usize {
    stmts.iter().map(count_one).sum()
}

fn count_one(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::If { then_block, else_block, .. } => {
            1 + count_statements(then_block) + else_block.as_ref().map(|e| count_statements(e)).unwrap_or(0)
        }
        Stmt::While { body, .. } => 1 + count_statements(body),
        Stmt::Block(inner) => count_statements(inner),
        Stmt::Function(decl) => 1 + count_statements(&decl.body),
        Stmt::Struct(decl) => {
            1 + decl.methods.iter().map(|m| count_statements(&m.body)).sum::<usize>()
        }
        _ => 1,
    }
}

/// Deepest nesting of `If`/`While` blocks in a function body.
pub fn max_nesting_depth(stmts: &[Stmt]) -> usize {
    stmts.iter().map(|s| nesting_of(s, 0)).max().unwrap_or(0)
}

fn nesting_of(stmt: &Stmt, depth: usize) -> usize {
    match stmt {
        Stmt::If { then_block, else_block, .. } => {
            let inner_depth = depth + 1;
            let then_max = then_block.iter().map(|s| nesting_of(s, inner_depth)).max().unwrap_or(inner_depth);
            let else_max = else_block
                .as_ref()
                .map(|stmts| stmts.iter().map(|s| nesting_of(s, inner_depth)).max().unwrap_or(inner_depth))
                .unwrap_or(inner_depth);
            then_max.max(else_max)
        }
        Stmt::While { body, .. } => {
            let inner_depth = depth + 1;
            body.iter().map(|s| nesting_of(s, inner_depth)).max().unwrap_or(inner_depth)
        }
        Stmt::Block(inner) => inner.iter().map(|s| nesting_of(s, depth)).max().unwrap_or(depth),
        _ => depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_hir::Expr;

    #[test]
    fn straight_line_has_zero_nesting() {
        let stmts = vec![
            Stmt::Let { name: "x".to_string(), expr: Expr::number(1.0) },
            Stmt::Print(vec![Expr::var("x")]),
        ];
        assert_eq!(max_nesting_depth(&stmts), 0);
        assert_eq!(count_statements(&stmts), 2);
    }

    #[test]
    fn nested_if_in_while_is_depth_two() {
        let stmts = vec![Stmt::While {
            cond: Expr::Literal(slang_hir::Literal::Bool(true)),
            body: vec![Stmt::If {
                cond: Expr::var("x"),
                then_block: vec![Stmt::Break { span: None }],
                else_block: None,
            }],
        }];
        assert_eq!(max_nesting_depth(&stmts), 2);
    }
}
