//! Check and fix drivers.
//!
//! `check` analyzes each file once. `fix` runs passes over one file:
//!
//! 1. Analyze the current text
//! 2. Apply every fix that does not conflict with an earlier one
//! 3. Re-analyze the rewritten text and repeat
//!
//! The loop stops when a pass applies nothing, when the text stops changing,
//! or after `max_passes`. All hoist fixes in a file share one insertion
//! point, so each pass applies exactly one of them and the next pass picks a
//! fresh name against the updated scopes.

use rehoist_core::config::RehoistConfig;
use rehoist_core::error::RehoistError;
use rehoist_core::fixer::apply_fix_pass;
use rehoist_core::output::{DiagnosticInfo, FileFixResult};
use rehoist_core::patch::{ContentHash, Fix, OutputEdit};
use rehoist_js::analyzer::{analyze_source, AnalyzeError, AnalyzeOptions, FileAnalysis};
use tracing::{debug, error, warn};

/// Settings for a check or fix run.
#[derive(Debug)]
pub struct RunOptions {
    pub analyze: AnalyzeOptions,
    /// Upper bound on fix passes per file.
    pub max_passes: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions::from_config(&RehoistConfig::default())
    }
}

impl RunOptions {
    /// Options described by `config`. The base name is not validated here.
    pub fn from_config(config: &RehoistConfig) -> Self {
        RunOptions {
            analyze: AnalyzeOptions::from_config(config),
            max_passes: config.max_passes,
        }
    }

    /// Check settings that the config layer cannot judge on its own.
    pub fn validate(&self) -> Result<(), RehoistError> {
        self.analyze
            .hoist
            .validate()
            .map_err(|e| RehoistError::invalid_args(e.to_string()))?;
        if self.max_passes == 0 {
            return Err(RehoistError::invalid_args("max_passes must be at least 1"));
        }
        Ok(())
    }
}

/// Analyze one file, reporting parse errors with their source excerpt.
pub fn analyze(path: &str, source: &str, options: &RunOptions) -> Result<FileAnalysis, RehoistError> {
    analyze_source(path, source, &options.analyze).map_err(|err| {
        let AnalyzeError::Parse { pretty, .. } = &err;
        error!("{}", pretty);
        RehoistError::from(err)
    })
}

/// Analyze every file. Files are `(path, content)` pairs.
pub fn check_files(
    files: &[(String, String)],
    options: &RunOptions,
) -> Result<Vec<FileAnalysis>, RehoistError> {
    files
        .iter()
        .map(|(path, source)| analyze(path, source, options))
        .collect()
}

/// Result of fixing one file.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Fixed text.
    pub output: String,
    pub result: FileFixResult,
}

/// Apply fixes to `source` in passes until nothing is left to apply.
pub fn fix_source(path: &str, source: &str, options: &RunOptions) -> Result<FixOutcome, RehoistError> {
    let mut current = source.to_string();
    let mut hash = ContentHash::compute(current.as_bytes());
    let mut analysis = analyze(path, &current, options)?;
    let mut passes = 0;
    let mut fixes_applied = 0;
    let mut edits = Vec::new();

    while passes < options.max_passes {
        let fixes: Vec<Fix> = analysis
            .diagnostics
            .iter()
            .filter_map(|d| d.fix.clone())
            .collect();
        if fixes.is_empty() {
            break;
        }

        let pass = apply_fix_pass(&current, &fixes)
            .map_err(|e| RehoistError::apply(e.to_string(), path))?;
        if !pass.changed() {
            break;
        }
        let new_hash = ContentHash::compute(pass.output.as_bytes());
        if new_hash == hash {
            debug!(path, "fix pass left the text unchanged");
            break;
        }

        passes += 1;
        fixes_applied += pass.applied.len() as u32;
        debug!(
            path,
            pass = passes,
            applied = pass.applied.len(),
            deferred = pass.deferred.len(),
            "fix pass"
        );
        edits.extend(pass.edits.iter().map(|e| OutputEdit::from_edit(&current, e)));
        current = pass.output;
        hash = new_hash;
        analysis = analyze(path, &current, options)?;
    }

    if !analysis.is_clean() {
        warn!(
            path,
            remaining = analysis.diagnostics.len(),
            max_passes = options.max_passes,
            "diagnostics remain after the last fix pass"
        );
    }

    let remaining = analysis
        .diagnostics
        .iter()
        .map(|d| DiagnosticInfo::from_diagnostic(path, d))
        .collect();
    Ok(FixOutcome {
        output: current,
        result: FileFixResult {
            file: path.to_string(),
            passes,
            fixes_applied,
            edits,
            content_hash: hash,
            remaining,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_serializes_hoists() {
        let source = "function f(a, b) {\n  return /x/.test(a) && /y/.test(b);\n}\n";
        let outcome = fix_source("f.js", source, &RunOptions::default()).unwrap();
        assert_eq!(
            outcome.output,
            "\nconst REGEX = /x/;\nconst REGEX_1 = /y/;function f(a, b) {\n  return REGEX.test(a) && REGEX_1.test(b);\n}\n"
        );
        assert_eq!(outcome.result.passes, 2);
        assert_eq!(outcome.result.fixes_applied, 2);
        assert_eq!(outcome.result.edits.len(), 4);
        assert!(outcome.result.remaining.is_empty());
        assert_eq!(
            outcome.result.content_hash,
            ContentHash::compute(outcome.output.as_bytes())
        );
    }

    #[test]
    fn test_clean_source_is_untouched() {
        let source = "const R = /x/;\n";
        let outcome = fix_source("f.js", source, &RunOptions::default()).unwrap();
        assert_eq!(outcome.output, source);
        assert_eq!(outcome.result.passes, 0);
        assert!(!outcome.result.changed());
    }

    #[test]
    fn test_max_passes_leaves_remaining() {
        let options = RunOptions {
            max_passes: 1,
            ..RunOptions::default()
        };
        let outcome = fix_source("f.js", "a(/x/);\nb(/y/);\n", &options).unwrap();
        assert_eq!(outcome.result.passes, 1);
        assert_eq!(outcome.result.remaining.len(), 1);
        assert_eq!(outcome.result.remaining[0].location.file, "f.js");
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = fix_source("bad.js", "function (", &RunOptions::default()).unwrap_err();
        assert_eq!(err.error_code().code(), 6);
    }

    #[test]
    fn test_validate() {
        assert!(RunOptions::default().validate().is_ok());
        let mut options = RunOptions::default();
        options.analyze.hoist.base_name = "class".to_string();
        assert_eq!(options.validate().unwrap_err().error_code().code(), 2);
    }

    #[test]
    fn test_check_files_in_order() {
        let files = vec![
            ("a.js".to_string(), "x(/a/);".to_string()),
            ("b.js".to_string(), "const B = /b/;".to_string()),
        ];
        let analyses = check_files(&files, &RunOptions::default()).unwrap();
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].diagnostics.len(), 1);
        assert!(analyses[1].is_clean());
    }
}
