//! Deterministic pretty-printing of CFGs and analysis results (spec.md §6:
//! "block id ordering, successor enumeration, and fact-set rendering must
//! be stable across runs for equal inputs").

use crate::cfg::{BlockId, Cfg, Terminator};
use crate::reaching_defs::DefSite;
use crate::solver::AnalysisResult;
use slang_hir::pretty_stmt;
use std::fmt::Write as _;

/// Indented-text rendering of a CFG: blocks in id-ascending order, each
/// with its statements, terminator, and successor/predecessor lists.
pub fn pretty_cfg(cfg: &Cfg) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "entry: {}", cfg.entry());
    let _ = writeln!(out, "exit: {}", cfg.exit());
    for id in cfg.block_ids() {
        let Some(block) = cfg.block(id) else {
            continue;
        };
        let _ = writeln!(out, "{}:", id);
        for stmt in &block.stmts {
            let rendered = pretty_stmt(stmt);
            for line in rendered.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        if let Some(terminator) = &block.terminator {
            let _ = writeln!(out, "    {}", pretty_terminator(terminator));
        }
        let preds: Vec<String> = block.predecessors.iter().map(BlockId::to_string).collect();
        let succs: Vec<String> = block.successors.iter().map(BlockId::to_string).collect();
        let _ = writeln!(out, "    preds: [{}]", preds.join(", "));
        let _ = writeln!(out, "    succs: [{}]", succs.join(", "));
    }
    out
}

fn pretty_terminator(terminator: &Terminator) -> String {
    match terminator {
        Terminator::Goto(target) => format!("goto {target}"),
        Terminator::Branch { then_block, else_block, .. } => {
            format!("branch then={then_block} else={else_block}")
        }
        Terminator::Return(Some(expr)) => format!("return {}", slang_hir::pretty_expr(expr)),
        Terminator::Return(None) => "return".to_string(),
        Terminator::Loop { body_block, exit_block, .. } => {
            format!("loop body={body_block} exit={exit_block}")
        }
        Terminator::Unreachable => "unreachable".to_string(),
    }
}

/// Render a reaching-definitions result: each block's IN/OUT set of
/// `(block, index)` sites, sorted by the canonical `(block-id,
/// statement-index)` key.
pub fn pretty_def_sites(cfg: &Cfg, result: &AnalysisResult<std::collections::BTreeSet<DefSite>>) -> String {
    let mut out = String::new();
    for id in cfg.block_ids() {
        let in_sites = result.in_fact(id).cloned().unwrap_or_default();
        let out_sites = result.out_fact(id).cloned().unwrap_or_default();
        let _ = writeln!(out, "{}: IN={{{}}} OUT={{{}}}", id, format_sites(&in_sites), format_sites(&out_sites));
    }
    out
}

fn format_sites(sites: &std::collections::BTreeSet<DefSite>) -> String {
    sites
        .iter()
        .map(|s| format!("({}, {})", s.block, s.index))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a live-variables result: each block's IN/OUT set of variable
/// names, sorted lexicographically.
pub fn pretty_live_vars(cfg: &Cfg, result: &AnalysisResult<std::collections::BTreeSet<String>>) -> String {
    let mut out = String::new();
    for id in cfg.block_ids() {
        let empty = std::collections::BTreeSet::new();
        let in_vars = result.in_fact(id).unwrap_or(&empty);
        let out_vars = result.out_fact(id).unwrap_or(&empty);
        let _ = writeln!(
            out,
            "{}: IN={{{}}} OUT={{{}}}",
            id,
            in_vars.iter().cloned().collect::<Vec<_>>().join(", "),
            out_vars.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    out
}
