//! Per-function and per-module complexity metrics over built CFGs.

pub mod complexity;

use serde::{Deserialize, Serialize};
use slang_cfg::Cfg;
use slang_hir::FunctionDecl;

/// Complexity metrics for a single function, computed from its CFG and HLIR
/// body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub cyclomatic_complexity: u32,
    pub statement_count: usize,
    pub parameter_count: usize,
    pub max_nesting_depth: usize,
    pub block_count: usize,
}

/// Bucketed counts of function complexity, following the conventional
/// low/medium/high/very-high cyclomatic-complexity bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub very_high: usize,
}

impl ComplexityDistribution {
    pub fn record(&mut self, cyclomatic_complexity: u32) {
        match cyclomatic_complexity {
            0..=5 => self.low += 1,
            6..=10 => self.medium += 1,
            11..=20 => self.high += 1,
            _ => self.very_high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.very_high
    }
}

/// Aggregate metrics across every function in a compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetrics {
    pub functions: Vec<FunctionMetrics>,
    pub total_statements: usize,
    pub average_cyclomatic_complexity: f64,
    pub max_cyclomatic_complexity: u32,
    pub complexity_distribution: ComplexityDistribution,
}

/// Compute `FunctionMetrics` for a single function given its already-built
/// CFG. A method's synthesized leading `receiver` parameter counts towards
/// `parameter_count` alongside its declared `params`.
pub fn function_metrics(decl: &FunctionDecl, cfg: &Cfg) -> FunctionMetrics {
    let receiver_count = usize::from(decl.receiver.is_some());
    FunctionMetrics {
        name: decl.name.clone(),
        cyclomatic_complexity: complexity::cyclomatic_complexity(cfg),
        statement_count: complexity::count_statements(&decl.body),
        parameter_count: decl.params.len() + receiver_count,
        max_nesting_depth: complexity::max_nesting_depth(&decl.body),
        block_count: cfg.len(),
    }
}

/// Aggregate a set of per-function metrics into module-level totals.
pub fn module_metrics(functions: Vec<FunctionMetrics>) -> ModuleMetrics {
    let mut distribution = ComplexityDistribution::default();
    for f in &functions {
        distribution.record(f.cyclomatic_complexity);
    }
    let total_statements = functions.iter().map(|f| f.statement_count).sum();
    let max_cyclomatic_complexity = functions.iter().map(|f| f.cyclomatic_complexity).max().unwrap_or(0);
    let average_cyclomatic_complexity = if functions.is_empty() {
        0.0
    } else {
        functions.iter().map(|f| f.cyclomatic_complexity as f64).sum::<f64>() / functions.len() as f64
    };

    ModuleMetrics {
        functions,
        total_statements,
        average_cyclomatic_complexity,
        max_cyclomatic_complexity,
        complexity_distribution: distribution,
    }
}
