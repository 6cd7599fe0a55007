//! `slang.toml` configuration, loadable from disk and overridable by CLI
//! flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Overrides `FixpointSolver`'s default iteration cap. `None` keeps the
    /// solver's own `10 * blocks * statements` bound.
    #[serde(default)]
    pub iteration_cap: Option<usize>,

    /// Base directory fixture paths given as a bare file name (no parent
    /// component) are resolved against.
    #[serde(default)]
    pub fixture_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            iteration_cap: None,
            fixture_dir: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Resolve a fixture path against `fixture_dir` when the given path is a
    /// bare file name; a path that already carries a directory component is
    /// used as-is.
    pub fn resolve_fixture(&self, fixture: &Path) -> PathBuf {
        let is_bare_name = fixture.parent().map_or(true, |p| p.as_os_str().is_empty());
        match &self.fixture_dir {
            Some(dir) if is_bare_name => dir.join(fixture),
            _ => fixture.to_path_buf(),
        }
    }
}
