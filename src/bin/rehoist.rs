//! Binary entry point for the rehoist CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Report regex literals that are not hoisted (exit 1 if any)
//! rehoist check src/
//!
//! # Hoist them in place
//! rehoist fix
//!
//! # Preview as JSON without writing
//! rehoist fix --dry-run --format json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rehoist::cli::{
    format_check_text, format_fix_text, load_config, run_check, run_fix, ConfigOverrides,
};
use rehoist_core::config::SourceTypeSetting;
use rehoist_core::error::{OutputErrorCode, RehoistError};
use rehoist_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Hoist regex literals to top-level constants.
///
/// A regex literal written inside a function is rebuilt on every call. rehoist
/// finds such literals in JavaScript files and moves each one into a
/// top-level `const`.
#[derive(Parser, Debug)]
#[command(name = "rehoist", version, about = "Hoist regex literals to top-level constants")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Config file (default: rehoist.toml in the workspace, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output. `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

/// Settings that override the config file.
#[derive(Args, Debug, Clone)]
struct RuleArgs {
    /// Base name of hoisted constants.
    #[arg(long)]
    base_name: Option<String>,

    /// Maximum fix passes per file.
    #[arg(long)]
    max_passes: Option<u32>,

    /// How files are parsed.
    #[arg(long, value_enum)]
    source_type: Option<SourceTypeArg>,
}

impl From<RuleArgs> for ConfigOverrides {
    fn from(args: RuleArgs) -> Self {
        ConfigOverrides {
            base_name: args.base_name,
            max_passes: args.max_passes,
            source_type: args.source_type.map(SourceTypeSetting::from),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceTypeArg {
    Auto,
    Script,
    Module,
}

impl From<SourceTypeArg> for SourceTypeSetting {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Auto => SourceTypeSetting::Auto,
            SourceTypeArg::Script => SourceTypeSetting::Script,
            SourceTypeArg::Module => SourceTypeSetting::Module,
        }
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Report regex literals that are not hoisted.
    ///
    /// Exits with 1 when any are found.
    Check {
        /// Files or directories to check (default: the whole workspace).
        paths: Vec<PathBuf>,
        #[command(flatten)]
        rule: RuleArgs,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Hoist regex literals (apply-by-default).
    ///
    /// Use --dry-run to preview changes without modifying files.
    Fix {
        /// Files or directories to fix (default: the whole workspace).
        paths: Vec<PathBuf>,
        #[command(flatten)]
        rule: RuleArgs,
        /// Preview changes without writing files.
        #[arg(long)]
        dry_run: bool,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    let format = match &cli.command {
        Command::Check { format, .. } | Command::Fix { format, .. } => *format,
    };
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            match format {
                Format::Json => {
                    let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                    let _ = io::stdout().flush();
                }
                Format::Text => eprintln!("error: {}", err),
            }
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber on stderr.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command, returning the exit code on success.
fn execute(cli: Cli) -> Result<ExitCode, RehoistError> {
    let workspace = match cli.global.workspace {
        Some(path) => path,
        None => std::env::current_dir()
            .map_err(|e| RehoistError::internal(format!("failed to get current directory: {}", e)))?,
    };
    if !workspace.is_dir() {
        return Err(RehoistError::file_not_found(workspace.display().to_string()));
    }

    match cli.command {
        Command::Check {
            paths,
            rule,
            format,
        } => {
            let config = load_config(&workspace, cli.global.config.as_deref(), &rule.into())?;
            let response = run_check(&workspace, &paths, &config)?;
            emit(format, &response, || format_check_text(&response))?;
            Ok(if response.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Fix {
            paths,
            rule,
            dry_run,
            format,
        } => {
            let config = load_config(&workspace, cli.global.config.as_deref(), &rule.into())?;
            let response = run_fix(&workspace, &paths, &config, dry_run)?;
            emit(format, &response, || format_fix_text(&response))?;
            Ok(if response.summary.remaining == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

/// Write a response to stdout in the requested format.
fn emit<T: serde::Serialize>(
    format: Format,
    response: &T,
    text: impl FnOnce() -> String,
) -> Result<(), RehoistError> {
    let mut stdout = io::stdout();
    match format {
        Format::Json => emit_response(response, &mut stdout),
        Format::Text => stdout.write_all(text().as_bytes()),
    }
    .map_err(|e| RehoistError::internal(format!("failed to write output: {}", e)))?;
    let _ = stdout.flush();
    Ok(())
}
