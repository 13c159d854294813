//! CLI front door.
//!
//! Provides the command implementations behind the `rehoist` binary:
//! - `check` - report regex literals that are not hoisted
//! - `fix` - hoist them, writing files unless `--dry-run` is given
//!
//! ## Error Handling
//!
//! All functions return `Result<T, RehoistError>`. The `RehoistError` type
//! provides stable error codes for JSON output and exit codes.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rehoist_core::config::{Config, RehoistConfig, SourceTypeSetting};
use rehoist_core::error::RehoistError;
use rehoist_core::filter::FileFilterSpec;
use rehoist_core::output::{CheckResponse, DiagnosticInfo, FixResponse};
use rehoist_js::files::collect_source_files_in;
use tracing::{debug, info};

use crate::runner::{check_files, fix_source, RunOptions};

// ============================================================================
// Configuration
// ============================================================================

/// Settings given on the command line. They win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_name: Option<String>,
    pub max_passes: Option<u32>,
    pub source_type: Option<SourceTypeSetting>,
}

impl ConfigOverrides {
    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut RehoistConfig) {
        if let Some(base_name) = &self.base_name {
            config.base_name = base_name.clone();
        }
        if let Some(max_passes) = self.max_passes {
            config.max_passes = max_passes;
        }
        if let Some(source_type) = self.source_type {
            config.source_type = source_type;
        }
    }
}

/// Load the configuration for a run.
///
/// An explicit `config_path` must exist. Otherwise `rehoist.toml` in the
/// workspace root is used when present.
pub fn load_config(
    workspace_root: &Path,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<RehoistConfig, RehoistError> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::discover(workspace_root)?,
    };
    let mut settings = config.rehoist;
    overrides.apply(&mut settings);
    debug!(?settings, "resolved configuration");
    Ok(settings)
}

fn collect(
    workspace_root: &Path,
    paths: &[PathBuf],
    config: &RehoistConfig,
) -> Result<Vec<(String, String)>, RehoistError> {
    let filter = FileFilterSpec::new(&config.include, &config.exclude)?;
    let files = collect_source_files_in(workspace_root, paths, &filter)?;
    info!(files = files.len(), "collected files");
    Ok(files)
}

fn run_options(config: &RehoistConfig) -> Result<RunOptions, RehoistError> {
    let options = RunOptions::from_config(config);
    options.validate()?;
    Ok(options)
}

// ============================================================================
// Commands
// ============================================================================

/// Report every regex literal that is not hoisted.
pub fn run_check(
    workspace_root: &Path,
    paths: &[PathBuf],
    config: &RehoistConfig,
) -> Result<CheckResponse, RehoistError> {
    let options = run_options(config)?;
    let files = collect(workspace_root, paths, config)?;
    let analyses = check_files(&files, &options)?;

    let diagnostics = analyses
        .iter()
        .flat_map(|analysis| {
            analysis
                .diagnostics
                .iter()
                .map(|d| DiagnosticInfo::from_diagnostic(&analysis.path, d))
        })
        .collect();
    Ok(CheckResponse::new(files.len() as u32, diagnostics))
}

/// Hoist regex literals in every file, writing changed files unless
/// `dry_run` is set.
///
/// Every file is fixed in memory first. Nothing is written unless all of
/// them parse and fix cleanly.
pub fn run_fix(
    workspace_root: &Path,
    paths: &[PathBuf],
    config: &RehoistConfig,
    dry_run: bool,
) -> Result<FixResponse, RehoistError> {
    let options = run_options(config)?;
    let files = collect(workspace_root, paths, config)?;

    let outcomes = files
        .iter()
        .map(|(path, source)| fix_source(path, source, &options))
        .collect::<Result<Vec<_>, _>>()?;

    let mut results = Vec::new();
    let mut written = Vec::new();
    for outcome in outcomes {
        let path = &outcome.result.file;
        if outcome.result.changed() && !dry_run {
            fs::write(workspace_root.join(path), &outcome.output)
                .map_err(|e| RehoistError::apply(format!("failed to write: {}", e), path))?;
            info!(path = %path, fixes = outcome.result.fixes_applied, "wrote file");
            written.push(path.clone());
        }
        if outcome.result.changed() || !outcome.result.remaining.is_empty() {
            results.push(outcome.result);
        }
    }

    let files_written = if dry_run { None } else { Some(written) };
    Ok(FixResponse::new(results, dry_run, files_written))
}

// ============================================================================
// Text Output
// ============================================================================

fn format_diagnostic(out: &mut String, diag: &DiagnosticInfo) {
    let _ = writeln!(
        out,
        "{}:{}:{}: {} [{}]",
        diag.location.file, diag.location.line, diag.location.col, diag.message, diag.rule
    );
}

/// `file:line:col: message [rule]` lines followed by a summary line.
pub fn format_check_text(response: &CheckResponse) -> String {
    let mut out = String::new();
    for diag in &response.diagnostics {
        format_diagnostic(&mut out, diag);
    }
    let problems = response.diagnostics.len();
    let _ = writeln!(
        out,
        "{} problem{} in {} file{} checked",
        problems,
        plural(problems),
        response.files_checked,
        plural(response.files_checked as usize)
    );
    out
}

/// One line per changed file, unfixed diagnostics, then a summary line.
pub fn format_fix_text(response: &FixResponse) -> String {
    let mut out = String::new();
    let verb = if response.dry_run { "would fix" } else { "fixed" };
    for file in &response.files {
        if file.changed() {
            let _ = writeln!(
                out,
                "{} {} ({} fix{})",
                verb,
                file.file,
                file.fixes_applied,
                if file.fixes_applied == 1 { "" } else { "es" }
            );
        }
        for diag in &file.remaining {
            format_diagnostic(&mut out, diag);
        }
    }
    let summary = &response.summary;
    let _ = writeln!(
        out,
        "{} fix{} in {} file{}, {} remaining",
        summary.fixes_applied,
        if summary.fixes_applied == 1 { "" } else { "es" },
        summary.files_changed,
        plural(summary.files_changed as usize),
        summary.remaining
    );
    out
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
