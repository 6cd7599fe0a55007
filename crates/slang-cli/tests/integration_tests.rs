//! End-to-end tests driving the `slang` binary and the library crates it
//! wraps, over the fixtures checked in alongside this crate.

use assert_cmd::Command;
use slang_analysis::{function_metrics, PropertyVerifier};
use slang_cfg::CfgBuilder;
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
fn straight_line_fixture_parses_and_builds_a_two_block_cfg() {
    let unit = load_fixture("straight_line.json");
    let decl = find_function(&unit, "double");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    assert_eq!(cfg.len(), 2);
    assert!(cfg.block(cfg.entry()).unwrap().predecessors.is_empty());
    assert!(cfg.block(cfg.exit()).unwrap().successors.is_empty());
}

#[test]
fn branch_and_loop_fixture_has_expected_complexity() {
    let unit = load_fixture("branch_and_loop.json");
    let decl = find_function(&unit, "sum_positive");
    let cfg = CfgBuilder::build_function(decl).expect("builds");
    let metrics = function_metrics(decl, &cfg);
    assert_eq!(metrics.block_count, 8);
    assert_eq!(metrics.cyclomatic_complexity, 3);
    assert_eq!(metrics.max_nesting_depth, 2);
    assert_eq!(metrics.parameter_count, 1);
}

#[test]
fn both_fixtures_satisfy_cfg_invariants() {
    let verifier = PropertyVerifier::new();
    for (fixture, function) in [("straight_line.json", "double"), ("branch_and_loop.json", "sum_positive")] {
        let unit = load_fixture(fixture);
        let decl = find_function(&unit, function);
        let cfg = CfgBuilder::build_function(decl).expect("builds");
        let results = verifier.verify_cfg(&cfg);
        assert!(results.iter().all(|r| r.holds_bool()), "{fixture} violated an invariant: {results:?}");
    }
}

#[test]
fn build_subcommand_prints_entry_and_exit_blocks() {
    Command::cargo_bin("slang")
        .expect("binary builds")
        .args(["build", &fixture_path("straight_line.json").to_string_lossy(), "--function", "double"])
        .assert()
        .success()
        .stdout(predicates::str::contains("entry: B0"))
        .stdout(predicates::str::contains("exit: B1"));
}

#[test]
fn verify_subcommand_reports_pass_for_a_well_formed_fixture() {
    Command::cargo_bin("slang")
        .expect("binary builds")
        .args(["verify", &fixture_path("branch_and_loop.json").to_string_lossy(), "--function", "sum_positive"])
        .assert()
        .success()
        .stdout(predicates::str::contains("cfg_invariants"));
}

#[test]
fn metrics_subcommand_reports_every_function() {
    Command::cargo_bin("slang")
        .expect("binary builds")
        .args(["metrics", &fixture_path("branch_and_loop.json").to_string_lossy(), "--format", "json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("sum_positive"));
}

#[test]
fn build_subcommand_errors_on_an_unknown_function() {
    Command::cargo_bin("slang")
        .expect("binary builds")
        .args(["build", &fixture_path("straight_line.json").to_string_lossy(), "--function", "missing"])
        .assert()
        .failure();
}

#[test]
fn slang_toml_resolves_a_bare_fixture_name_and_overrides_output_format() {
    let dir = tempfile::tempdir().expect("tempdir created");
    let config_path = dir.path().join("slang.toml");
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    std::fs::write(
        &config_path,
        format!(
            "output_format = \"json\"\nfixture_dir = \"{}\"\n",
            fixtures_dir.display()
        ),
    )
    .expect("config file written");

    Command::cargo_bin("slang")
        .expect("binary builds")
        .args(["--config", &config_path.to_string_lossy(), "metrics", "branch_and_loop.json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"sum_positive\""));
}
