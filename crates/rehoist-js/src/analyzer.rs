// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Single-file analysis: parse, build scopes, run the hoist-regex rule.
//!
//! The grammar is picked from the file extension (see [`Dialect::from_path`]).

use rehoist_core::config::{RehoistConfig, SourceTypeSetting};
use rehoist_core::diagnostic::Diagnostic;
use rehoist_core::error::RehoistError;
use thiserror::Error;
use tracing::debug;

use crate::nodes::SourceType;
use crate::ops::hoist_regex::{HoistOptions, HoistRegex};
use crate::parser::{parse_with, prettify_error, Dialect, ParseOptions};
use crate::visitor::ScopeTree;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The source does not parse.
    #[error("{path}: {message}")]
    Parse {
        path: String,
        message: String,
        /// The error rendered against the offending source lines.
        pretty: String,
    },
}

/// Result type for analyzer operations.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

impl From<AnalyzeError> for RehoistError {
    fn from(err: AnalyzeError) -> Self {
        match err {
            AnalyzeError::Parse { path, message, .. } => RehoistError::ParseError {
                file: path,
                message,
            },
        }
    }
}

// ============================================================================
// Options
// ============================================================================

impl From<SourceTypeSetting> for SourceType {
    fn from(setting: SourceTypeSetting) -> Self {
        match setting {
            SourceTypeSetting::Auto => SourceType::Auto,
            SourceTypeSetting::Script => SourceType::Script,
            SourceTypeSetting::Module => SourceType::Module,
        }
    }
}

/// Options for [`analyze_source`].
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub source_type: SourceType,
    pub hoist: HoistOptions,
}

impl AnalyzeOptions {
    /// Options described by a loaded configuration.
    pub fn from_config(config: &RehoistConfig) -> Self {
        AnalyzeOptions {
            source_type: config.source_type.into(),
            hoist: HoistOptions::default().with_base_name(config.base_name.clone()),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Diagnostics for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    /// File path as given by the caller.
    pub path: String,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileAnalysis {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyze one source file.
///
/// # Example
///
/// ```
/// use rehoist_js::analyzer::{analyze_source, AnalyzeOptions};
///
/// let source = "function f(s) { return /ab/g.test(s); }";
/// let analysis = analyze_source("f.js", source, &AnalyzeOptions::default()).unwrap();
/// assert_eq!(analysis.diagnostics.len(), 1);
/// assert_eq!(analysis.diagnostics[0].line, 1);
/// assert_eq!(analysis.diagnostics[0].col, 24);
/// ```
pub fn analyze_source(
    path: &str,
    source: &str,
    options: &AnalyzeOptions,
) -> AnalyzeResult<FileAnalysis> {
    let parse_options = ParseOptions {
        source_type: options.source_type,
        dialect: Dialect::from_path(path),
    };
    let ast = parse_with(source, parse_options).map_err(|err| AnalyzeError::Parse {
        path: path.to_string(),
        message: err.to_string(),
        pretty: prettify_error(source, &err, path),
    })?;
    let scopes = ScopeTree::build(&ast);
    let diagnostics = HoistRegex::check(&ast, &scopes, &options.hoist);
    debug!(
        path,
        nodes = ast.len(),
        scopes = scopes.len(),
        diagnostics = diagnostics.len(),
        "analyzed file"
    );

    Ok(FileAnalysis {
        path: path.to_string(),
        diagnostics,
    })
}
