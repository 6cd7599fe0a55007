//! Diagnostic pretty-printing of HLIR nodes (spec.md §4.1: "pretty-print
//! (diagnostic only)"). The textual form is human-readable, not a stable
//! machine format — only the CFG/analysis pretty-printers in `slang-cfg`
//! carry the determinism requirement from spec.md §6.

use crate::expr::{BinOp, Callee, Expr, Literal};
use crate::stmt::{CompilationUnit, FunctionDecl, LValue, Stmt, StructDecl};
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Render a compilation unit as indented pseudo-source, for `eprintln!`-style
/// debugging and CLI diagnostics.
pub fn pretty_unit(unit: &CompilationUnit) -> String {
    let mut out = String::new();
    for stmt in &unit.stmts {
        write_stmt(&mut out, stmt, 0);
    }
    out
}

pub fn pretty_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    write_stmt(&mut out, stmt, 0);
    out
}

pub fn pretty_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn pad(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_block(out: &mut String, stmts: &[Stmt], depth: usize) {
    for stmt in stmts {
        write_stmt(out, stmt, depth);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    pad(out, depth);
    match stmt {
        Stmt::Let { name, expr } => {
            let _ = writeln!(out, "let {} = {};", name, pretty_expr(expr));
        }
        Stmt::Assign { lhs, expr } => {
            let _ = writeln!(out, "{} = {};", pretty_lvalue(lhs), pretty_expr(expr));
        }
        Stmt::ExprStmt(expr) => {
            let _ = writeln!(out, "{};", pretty_expr(expr));
        }
        Stmt::Print(args) => {
            let rendered: Vec<String> = args.iter().map(pretty_expr).collect();
            let _ = writeln!(out, "print({});", rendered.join(", "));
        }
        Stmt::Return(Some(expr)) => {
            let _ = writeln!(out, "return {};", pretty_expr(expr));
        }
        Stmt::Return(None) => {
            let _ = writeln!(out, "return;");
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            let _ = writeln!(out, "if ({}) {{", pretty_expr(cond));
            write_block(out, then_block, depth + 1);
            pad(out, depth);
            if let Some(else_stmts) = else_block {
                let _ = writeln!(out, "}} else {{");
                write_block(out, else_stmts, depth + 1);
                pad(out, depth);
            }
            let _ = writeln!(out, "}}");
        }
        Stmt::While { cond, body } => {
            let _ = writeln!(out, "while ({}) {{", pretty_expr(cond));
            write_block(out, body, depth + 1);
            pad(out, depth);
            let _ = writeln!(out, "}}");
        }
        Stmt::Break { .. } => {
            let _ = writeln!(out, "break;");
        }
        Stmt::Continue { .. } => {
            let _ = writeln!(out, "continue;");
        }
        Stmt::Function(decl) => write_function(out, decl, depth),
        Stmt::Struct(decl) => write_struct(out, decl, depth),
        Stmt::Block(stmts) => {
            let _ = writeln!(out, "{{");
            write_block(out, stmts, depth + 1);
            pad(out, depth);
            let _ = writeln!(out, "}}");
        }
        Stmt::DerefAssign { lhs, rhs } => {
            let _ = writeln!(out, "*{} = {};", pretty_expr(lhs), pretty_expr(rhs));
        }
    }
}

fn write_function(out: &mut String, decl: &FunctionDecl, depth: usize) {
    let params: Vec<&str> = decl
        .receiver
        .iter()
        .map(|s| s.as_str())
        .chain(decl.params.iter().map(|s| s.as_str()))
        .collect();
    let _ = writeln!(out, "fun {}({}) {{", decl.name, params.join(", "));
    write_block(out, &decl.body, depth + 1);
    pad(out, depth);
    let _ = writeln!(out, "}}");
}

fn write_struct(out: &mut String, decl: &StructDecl, depth: usize) {
    let _ = writeln!(out, "struct {} {{", decl.id);
    for (name, init) in &decl.fields {
        pad(out, depth + 1);
        match init {
            Some(expr) => {
                let _ = writeln!(out, "{}: {},", name, pretty_expr(expr));
            }
            None => {
                let _ = writeln!(out, "{},", name);
            }
        }
    }
    for method in &decl.methods {
        write_function(out, method, depth + 1);
    }
    pad(out, depth);
    let _ = writeln!(out, "}}");
}

fn pretty_lvalue(lhs: &LValue) -> String {
    match lhs {
        LValue::Var(name) => name.clone(),
        LValue::Deref(expr) => format!("*{}", pretty_expr(expr)),
        LValue::Field { base, name } => format!("{}.{}", pretty_expr(base), name),
        LValue::Index { base, index } => format!("{}[{}]", pretty_expr(base), pretty_expr(index)),
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    out.push_str(&pretty_expr_inner(expr));
}

fn pretty_expr_inner(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) => name.clone(),
        Expr::Literal(lit) => pretty_literal(lit),
        Expr::Binary { op, left, right } => {
            format!("({} {} {})", pretty_expr(left), pretty_binop(*op), pretty_expr(right))
        }
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => format!(
            "({} ? {} : {})",
            pretty_expr(cond),
            pretty_expr(then_expr),
            pretty_expr(else_expr)
        ),
        Expr::Call { callee, args } => {
            let rendered: Vec<String> = args.iter().map(pretty_expr).collect();
            format!("{}({})", pretty_callee(callee), rendered.join(", "))
        }
        Expr::Record(fields) => {
            let rendered: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{}: {}", name, pretty_expr(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Expr::Array(items) => {
            let rendered: Vec<String> = items.iter().map(pretty_expr).collect();
            format!("[{}]", rendered.join(", "))
        }
        Expr::Index { base, index } => format!("{}[{}]", pretty_expr(base), pretty_expr(index)),
        Expr::Field { base, name } => format!("{}.{}", pretty_expr(base), name),
        Expr::Ref(inner) => format!("&{}", pretty_expr(inner)),
        Expr::Deref(inner) => format!("*{}", pretty_expr(inner)),
        Expr::Paren(inner) => format!("({})", pretty_expr(inner)),
        Expr::InlinedFunction { params, body } => {
            let mut inner = String::new();
            write_block(&mut inner, body, 1);
            format!("fun({}) {{\n{}}}", params.join(", "), inner)
        }
    }
}

fn pretty_callee(callee: &Callee) -> String {
    match callee {
        Callee::Named(name) => name.clone(),
        Callee::Expr(expr) => pretty_expr(expr),
    }
}

fn pretty_literal(lit: &Literal) -> String {
    match lit {
        Literal::Number(n) => n.to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Str(s) => format!("{:?}", s),
        Literal::None => "none".to_string(),
    }
}

fn pretty_binop(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::LtEq => "<=",
        BinOp::Gt => ">",
        BinOp::GtEq => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_let_and_print() {
        let unit = CompilationUnit {
            stmts: vec![
                Stmt::Let {
                    name: "x".to_string(),
                    expr: Expr::number(10.0),
                },
                Stmt::Print(vec![Expr::var("x")]),
            ],
        };
        let rendered = pretty_unit(&unit);
        assert_eq!(rendered, "let x = 10;\nprint(x);\n");
    }

    #[test]
    fn renders_if_else_with_indentation() {
        let stmt = Stmt::If {
            cond: Expr::var("x"),
            then_block: vec![Stmt::Assign {
                lhs: LValue::Var("x".to_string()),
                expr: Expr::number(2.0),
            }],
            else_block: Some(vec![Stmt::Assign {
                lhs: LValue::Var("x".to_string()),
                expr: Expr::number(3.0),
            }]),
        };
        let rendered = pretty_stmt(&stmt);
        assert_eq!(
            rendered,
            "if (x) {\n    x = 2;\n} else {\n    x = 3;\n}\n"
        );
    }
}
