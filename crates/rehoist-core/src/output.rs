//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (files sorted by path,
//!    diagnostics in source order)
//! 3. **Nullable vs absent:** absent field means "not applicable"
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::error::{OutputErrorCode, RehoistError};
use crate::patch::{ContentHash, OutputEdit, Span};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// A position in a file, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the workspace root.
    pub file: String,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column.
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }
}

/// Diagnostic information for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// Rule key.
    pub rule: String,
    /// Message key within the rule.
    pub message_id: String,
    /// Human-readable message.
    pub message: String,
    /// Where the diagnostic applies.
    pub location: Location,
    /// Byte range of the offending node.
    pub span: Span,
    /// Whether a fix is available.
    pub fixable: bool,
}

impl DiagnosticInfo {
    /// Describe `diag` found in `file`.
    pub fn from_diagnostic(file: &str, diag: &Diagnostic) -> Self {
        DiagnosticInfo {
            rule: diag.rule.clone(),
            message_id: diag.message_id.clone(),
            message: diag.message.clone(),
            location: Location::new(file, diag.line, diag.col),
            span: diag.span,
            fixable: diag.is_fixable(),
        }
    }
}

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Stable error kind.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a RehoistError.
    pub fn from_error(err: &RehoistError) -> Self {
        let code = OutputErrorCode::from(err);
        let details = match err {
            RehoistError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            RehoistError::ParseError { file, .. } => Some(serde_json::json!({ "file": file })),
            RehoistError::ApplyError { file, .. } => {
                file.as_ref().map(|f| serde_json::json!({ "file": f }))
            }
            _ => None,
        };
        ErrorInfo {
            code: code.code(),
            kind: code.as_str().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Status: "ok" when clean, "diagnostics" otherwise.
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Number of files analyzed.
    pub files_checked: u32,
    /// Diagnostics across all files, grouped by file in path order.
    pub diagnostics: Vec<DiagnosticInfo>,
}

impl CheckResponse {
    /// Create a check response.
    pub fn new(files_checked: u32, diagnostics: Vec<DiagnosticInfo>) -> Self {
        let status = if diagnostics.is_empty() {
            "ok"
        } else {
            "diagnostics"
        };
        CheckResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files_checked,
            diagnostics,
        }
    }

    /// Returns true when no diagnostics were found.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Fix outcome for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFixResult {
    /// File path relative to the workspace root.
    pub file: String,
    /// Number of passes that applied at least one fix.
    pub passes: u32,
    /// Number of fixes applied.
    pub fixes_applied: u32,
    /// Edits applied, in pass order. Positions refer to the text each pass saw.
    pub edits: Vec<OutputEdit>,
    /// Hash of the fixed content.
    pub content_hash: ContentHash,
    /// Diagnostics still present after the last pass.
    pub remaining: Vec<DiagnosticInfo>,
}

impl FileFixResult {
    /// Returns true if the file content changed.
    pub fn changed(&self) -> bool {
        self.fixes_applied > 0
    }
}

/// Totals for a fix run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSummary {
    /// Files whose content changed.
    pub files_changed: u32,
    /// Fixes applied across all files.
    pub fixes_applied: u32,
    /// Diagnostics left unfixed.
    pub remaining: u32,
}

impl FixSummary {
    /// Sum up per-file results.
    pub fn from_results(results: &[FileFixResult]) -> Self {
        FixSummary {
            files_changed: results.iter().filter(|r| r.changed()).count() as u32,
            fixes_applied: results.iter().map(|r| r.fixes_applied).sum(),
            remaining: results.iter().map(|r| r.remaining.len() as u32).sum(),
        }
    }
}

/// Response for the `fix` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Whether files were left untouched.
    pub dry_run: bool,
    /// Totals.
    pub summary: FixSummary,
    /// Per-file results for files with fixes or remaining diagnostics.
    pub files: Vec<FileFixResult>,
    /// Files that were written (absent on dry runs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_written: Option<Vec<String>>,
}

impl FixResponse {
    /// Create a fix response.
    pub fn new(files: Vec<FileFixResult>, dry_run: bool, files_written: Option<Vec<String>>) -> Self {
        FixResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            summary: FixSummary::from_results(&files),
            files,
            files_written,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a RehoistError.
    pub fn from_error(err: &RehoistError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
