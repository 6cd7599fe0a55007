//! Command-line driver for Slang CFG construction, dataflow analysis, and
//! complexity metrics.

mod config;
mod fixture;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::{AnalysisConfig, OutputFormat};
use slang_analysis::{function_metrics, module_metrics, PropertyVerifier};
use slang_cfg::{CfgBuilder, FixpointSolver, LiveVariables, ReachingDefinitions};
use slang_hir::{CompilationUnit, FunctionDecl};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "slang", about = "CFG construction and dataflow analysis for Slang", version)]
struct Cli {
    /// Path to a `slang.toml` configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build and print the CFG of a fixture (a whole unit, or one function).
    Build {
        fixture: PathBuf,
        #[arg(long)]
        function: Option<String>,
    },
    /// Solve reaching-definitions over a fixture's CFG.
    Reach {
        fixture: PathBuf,
        #[arg(long)]
        function: Option<String>,
    },
    /// Solve live-variables over a fixture's CFG.
    Live {
        fixture: PathBuf,
        #[arg(long)]
        function: Option<String>,
    },
    /// Report complexity metrics for every function in a fixture.
    Metrics { fixture: PathBuf },
    /// Verify CFG invariants and dataflow fixed points for a fixture.
    Verify {
        fixture: PathBuf,
        #[arg(long)]
        function: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// The CFG for a whole unit, or for one named function within it.
fn build_requested_cfg(unit: &CompilationUnit, function: Option<&str>) -> Result<slang_cfg::Cfg> {
    match function {
        Some(name) => {
            let decl = fixture::find_function(unit, name)
                .ok_or_else(|| anyhow::anyhow!("no function named `{name}` in fixture"))?;
            Ok(CfgBuilder::build_function(decl)?)
        }
        None => Ok(CfgBuilder::build_unit(unit)?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Command::Build { fixture, function } => run_build(&config.resolve_fixture(&fixture), function.as_deref(), format),
        Command::Reach { fixture, function } => {
            run_reach(&config.resolve_fixture(&fixture), function.as_deref(), format, config.iteration_cap)
        }
        Command::Live { fixture, function } => {
            run_live(&config.resolve_fixture(&fixture), function.as_deref(), format, config.iteration_cap)
        }
        Command::Metrics { fixture } => run_metrics(&config.resolve_fixture(&fixture), format),
        Command::Verify { fixture, function } => {
            run_verify(&config.resolve_fixture(&fixture), function.as_deref(), format, config.iteration_cap)
        }
    }
}

fn run_build(path: &PathBuf, function: Option<&str>, format: OutputFormat) -> Result<()> {
    let unit = fixture::load(path)?;
    let cfg = build_requested_cfg(&unit, function)?;
    info!(blocks = cfg.len(), "built CFG");
    match format {
        OutputFormat::Text => print!("{}", slang_cfg::pretty_cfg(&cfg)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&DebugCfg::from(&cfg))?),
    }
    Ok(())
}

fn run_reach(path: &PathBuf, function: Option<&str>, format: OutputFormat, iteration_cap: Option<usize>) -> Result<()> {
    let unit = fixture::load(path)?;
    let cfg = build_requested_cfg(&unit, function)?;
    let result = FixpointSolver::solve_with_cap(&ReachingDefinitions::new(&cfg), &cfg, iteration_cap)
        .context("solving reaching-definitions")?;
    match format {
        OutputFormat::Text => print!("{}", slang_cfg::pretty_def_sites(&cfg, &result)),
        OutputFormat::Json => bail!("json output is not yet supported for reaching-definitions results"),
    }
    Ok(())
}

fn run_live(path: &PathBuf, function: Option<&str>, format: OutputFormat, iteration_cap: Option<usize>) -> Result<()> {
    let unit = fixture::load(path)?;
    let cfg = build_requested_cfg(&unit, function)?;
    let result =
        FixpointSolver::solve_with_cap(&LiveVariables, &cfg, iteration_cap).context("solving live-variables")?;
    match format {
        OutputFormat::Text => print!("{}", slang_cfg::pretty_live_vars(&cfg, &result)),
        OutputFormat::Json => bail!("json output is not yet supported for live-variables results"),
    }
    Ok(())
}

fn run_metrics(path: &PathBuf, format: OutputFormat) -> Result<()> {
    let unit = fixture::load(path)?;
    let functions: Vec<&FunctionDecl> = fixture::all_functions(&unit);
    if functions.is_empty() {
        bail!("fixture declares no functions to report metrics for");
    }
    let mut per_function = Vec::with_capacity(functions.len());
    for decl in functions {
        let cfg = CfgBuilder::build_function(decl)?;
        per_function.push(function_metrics(decl, &cfg));
    }
    let module = module_metrics(per_function);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&module)?),
        OutputFormat::Text => {
            for f in &module.functions {
                println!(
                    "{}: cyclomatic={} blocks={} depth={} params={}",
                    f.name.bold(),
                    f.cyclomatic_complexity,
                    f.block_count,
                    f.max_nesting_depth,
                    f.parameter_count
                );
            }
            println!(
                "module: functions={} avg_cyclomatic={:.2} max_cyclomatic={}",
                module.functions.len(),
                module.average_cyclomatic_complexity,
                module.max_cyclomatic_complexity
            );
        }
    }
    Ok(())
}

fn run_verify(
    path: &PathBuf,
    function: Option<&str>,
    format: OutputFormat,
    iteration_cap: Option<usize>,
) -> Result<()> {
    let unit = fixture::load(path)?;
    let cfg = build_requested_cfg(&unit, function)?;
    let verifier = PropertyVerifier::new();
    let mut results = verifier.verify_cfg(&cfg);
    results.push(verifier.verify_fixed_point_with_cap(&ReachingDefinitions::new(&cfg), &cfg, iteration_cap));
    results.push(verifier.verify_fixed_point_with_cap(&LiveVariables, &cfg, iteration_cap));

    let all_hold = results.iter().all(|r| r.holds_bool());
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => {
            for r in &results {
                let line = match r.status {
                    slang_analysis::PropertyStatus::Holds => format!("{} {}", "PASS".green(), r.property),
                    slang_analysis::PropertyStatus::Violated => format!(
                        "{} {}: {}",
                        "FAIL".red(),
                        r.property,
                        r.detail.as_deref().unwrap_or("no detail")
                    ),
                };
                println!("{line}");
            }
        }
    }
    if !all_hold {
        bail!("one or more properties were violated");
    }
    Ok(())
}

/// Minimal JSON-serializable projection of a `Cfg` (the public type itself
/// deliberately has no `Serialize` impl, since its block map is private).
#[derive(serde::Serialize)]
struct DebugCfg {
    entry: String,
    exit: String,
    blocks: Vec<DebugBlock>,
}

#[derive(serde::Serialize)]
struct DebugBlock {
    id: String,
    statements: Vec<String>,
    successors: Vec<String>,
    predecessors: Vec<String>,
}

impl From<&slang_cfg::Cfg> for DebugCfg {
    fn from(cfg: &slang_cfg::Cfg) -> Self {
        let blocks = cfg
            .block_ids()
            .filter_map(|id| {
                let block = cfg.block(id)?;
                Some(DebugBlock {
                    id: id.to_string(),
                    statements: block.stmts.iter().map(slang_hir::pretty_stmt).collect(),
                    successors: block.successors.iter().map(ToString::to_string).collect(),
                    predecessors: block.predecessors.iter().map(ToString::to_string).collect(),
                })
            })
            .collect();
        DebugCfg { entry: cfg.entry().to_string(), exit: cfg.exit().to_string(), blocks }
    }
}
