//! Error types and error code constants for rehoist.
//!
//! This module provides a unified error type (`RehoistError`) that bridges
//! domain-specific errors from different subsystems (parsing, file discovery,
//! configuration, fix application) into a common format suitable for JSON
//! output.
//!
//! ## Error Code Mapping
//!
//! - `1`: Diagnostics found (not an error; used by `check`)
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file or path not found)
//! - `4`: Apply errors (failed to apply or write fixes)
//! - `6`: Parse errors (source could not be parsed)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::editor::BatchEditError;
use crate::filter::FilterError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found).
    ResolutionError = 3,
    /// Apply errors (failed to apply or write changes).
    ApplyError = 4,
    /// Source could not be parsed.
    ParseError = 6,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Stable string name used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputErrorCode::InvalidArguments => "InvalidArguments",
            OutputErrorCode::ResolutionError => "ResolutionError",
            OutputErrorCode::ApplyError => "ApplyError",
            OutputErrorCode::ParseError => "ParseError",
            OutputErrorCode::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum RehoistError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Source could not be parsed.
    #[error("parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    /// Failed to apply changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&RehoistError> for OutputErrorCode {
    fn from(err: &RehoistError) -> Self {
        match err {
            RehoistError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            RehoistError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            RehoistError::ParseError { .. } => OutputErrorCode::ParseError,
            RehoistError::ApplyError { .. } => OutputErrorCode::ApplyError,
            RehoistError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<ConfigError> for RehoistError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => RehoistError::FileNotFound {
                path: path.display().to_string(),
            },
            other => RehoistError::InvalidArguments {
                message: other.to_string(),
            },
        }
    }
}

impl From<FilterError> for RehoistError {
    fn from(err: FilterError) -> Self {
        RehoistError::InvalidArguments {
            message: err.to_string(),
        }
    }
}

impl From<BatchEditError> for RehoistError {
    fn from(err: BatchEditError) -> Self {
        RehoistError::ApplyError {
            message: err.to_string(),
            file: None,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl RehoistError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        RehoistError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        RehoistError::FileNotFound { path: path.into() }
    }

    /// Create an apply error for `file`.
    pub fn apply(message: impl Into<String>, file: impl Into<String>) -> Self {
        RehoistError::ApplyError {
            message: message.into(),
            file: Some(file.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        RehoistError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn file_not_found_maps_to_resolution_error() {
            let err = RehoistError::file_not_found("missing.js");
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn parse_error_maps_to_parse_error() {
            let err = RehoistError::ParseError {
                file: "a.js".to_string(),
                message: "unexpected token".to_string(),
            };
            assert_eq!(err.error_code().code(), 6);
        }

        #[test]
        fn batch_edit_error_bridges_to_apply_error() {
            let err: RehoistError = BatchEditError::EmptyEdits.into();
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
            assert_eq!(err.to_string(), "apply error: no edits to apply");
        }

        #[test]
        fn invalid_args_maps_to_2() {
            let err = RehoistError::invalid_args("bad base name");
            assert_eq!(err.error_code().code(), 2);
            assert_eq!(err.error_code().as_str(), "InvalidArguments");
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn internal_error_display() {
            let err = RehoistError::internal("unexpected state");
            assert_eq!(err.to_string(), "internal error: unexpected state");
        }

        #[test]
        fn code_display_shows_number() {
            assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
        }
    }
}
