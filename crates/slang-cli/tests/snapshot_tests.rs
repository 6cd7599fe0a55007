//! Snapshot tests over the checked-in fixtures: pretty-printed CFGs and
//! analysis results compared against the `.snap` files under
//! `tests/snapshots/` (spec.md §6's `*.received.txt`/`*.approved.txt`
//! workflow, realized with `insta`'s `.snap`/`.snap.new` pair instead of a
//! bespoke rename script).

use slang_cfg::{CfgBuilder, FixpointSolver, LiveVariables, ReachingDefinitions};
use slang_hir::{CompilationUnit, FunctionDecl, Stmt};
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

fn load_fixture(name: &str) -> CompilationUnit {
    let content = std::fs::read_to_string(fixture_path(name)).expect("fixture readable");
    serde_json::from_str(&content).expect("fixture parses as a CompilationUnit")
}

fn find_function<'a>(unit: &'a CompilationUnit, name: &str) -> &'a FunctionDecl {
    unit.stmts
        .iter()
        .find_map(|s| match s {
            Stmt::Function(decl) if decl.name == name => Some(decl),
            _ => None,
        })
        .unwrap_or_else(|| panic!("function `{name}` not found in fixture"))
}

#[test]
fn cfg_for_double() {
    let unit = load_fixture("straight_line.json");
    let decl = find_function(&unit, "double");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    insta::assert_snapshot!(slang_cfg::pretty_cfg(&cfg));
}

#[test]
fn cfg_for_sum_positive() {
    let unit = load_fixture("branch_and_loop.json");
    let decl = find_function(&unit, "sum_positive");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    insta::assert_snapshot!(slang_cfg::pretty_cfg(&cfg));
}

#[test]
fn reach_for_double() {
    let unit = load_fixture("straight_line.json");
    let decl = find_function(&unit, "double");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    let result = FixpointSolver::solve(&ReachingDefinitions::new(&cfg), &cfg).expect("solves");
    insta::assert_snapshot!(slang_cfg::pretty_def_sites(&cfg, &result));
}

#[test]
fn live_for_double() {
    let unit = load_fixture("straight_line.json");
    let decl = find_function(&unit, "double");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    let result = FixpointSolver::solve(&LiveVariables, &cfg).expect("solves");
    insta::assert_snapshot!(slang_cfg::pretty_live_vars(&cfg, &result));
}
