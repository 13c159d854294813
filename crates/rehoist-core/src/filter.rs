//! Include/exclude filtering for discovered source files.
//!
//! ## Semantics
//!
//! 1. Default exclusions (`.git`, `node_modules`, `dist`, `target`) always apply
//! 2. User exclusions are applied next
//! 3. If inclusions are given, a path must match at least one of them
//!
//! Patterns use standard glob syntax (`*`, `**`, `?`, `[abc]`) and are matched
//! against paths relative to the workspace root. On the command line a
//! pattern prefixed with `!` is an exclusion.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;

/// Default directory exclusions that always apply.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "**/.git/**",
    "**/node_modules/**",
    "**/dist/**",
    "**/target/**",
];

/// Error type for file filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid glob pattern syntax.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Compiled file filter.
#[derive(Debug)]
pub struct FileFilterSpec {
    /// Inclusion patterns. `None` includes everything.
    inclusions: Option<GlobSet>,
    /// User exclusion patterns.
    exclusions: GlobSet,
    default_exclusions: GlobSet,
}

impl FileFilterSpec {
    /// Build a filter from separate inclusion and exclusion lists.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, FilterError> {
        let inclusions = if include.is_empty() {
            None
        } else {
            Some(build_glob_set(include)?)
        };
        let defaults: Vec<String> = DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect();
        Ok(FileFilterSpec {
            inclusions,
            exclusions: build_glob_set(exclude)?,
            default_exclusions: build_glob_set(&defaults)?,
        })
    }

    /// Parse command-line patterns, where `!pattern` is an exclusion.
    ///
    /// ```
    /// use rehoist_core::filter::FileFilterSpec;
    /// use std::path::Path;
    ///
    /// let spec = FileFilterSpec::parse(&["src/**".to_string(), "!src/vendor/**".to_string()]).unwrap();
    /// assert!(spec.matches(Path::new("src/app.js")));
    /// assert!(!spec.matches(Path::new("src/vendor/lib.js")));
    /// ```
    pub fn parse(args: &[String]) -> Result<Self, FilterError> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for arg in args {
            match arg.strip_prefix('!') {
                Some(pattern) => exclude.push(pattern.to_string()),
                None => include.push(arg.clone()),
            }
        }
        Self::new(&include, &exclude)
    }

    /// Filter that applies only the default exclusions.
    pub fn defaults() -> Result<Self, FilterError> {
        Self::new(&[], &[])
    }

    /// Check if a workspace-relative path passes the filter.
    pub fn matches(&self, path: &Path) -> bool {
        if self.default_exclusions.is_match(path) {
            return false;
        }
        if self.exclusions.is_match(path) {
            return false;
        }
        match &self.inclusions {
            Some(inclusions) => inclusions.is_match(path),
            None => true,
        }
    }

    /// Check if this filter has any inclusion patterns.
    pub fn has_inclusions(&self) -> bool {
        self.inclusions.is_some()
    }

    /// Check if this filter has any user exclusion patterns.
    pub fn has_exclusions(&self) -> bool {
        !self.exclusions.is_empty()
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, FilterError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| FilterError::InvalidPattern {
        pattern: "<combined>".to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_exclude_vendor_dirs() {
        let spec = FileFilterSpec::defaults().unwrap();
        assert!(spec.matches(Path::new("src/app.js")));
        assert!(!spec.matches(Path::new("node_modules/lib/index.js")));
        assert!(!spec.matches(Path::new("packages/a/node_modules/x.js")));
        assert!(!spec.matches(Path::new("dist/bundle.js")));
        assert!(!spec.matches(Path::new(".git/hooks/x.js")));
    }

    #[test]
    fn test_inclusions_restrict() {
        let spec = FileFilterSpec::new(&strings(&["src/**/*.js"]), &[]).unwrap();
        assert!(spec.has_inclusions());
        assert!(spec.matches(Path::new("src/a/b.js")));
        assert!(!spec.matches(Path::new("lib/b.js")));
    }

    #[test]
    fn test_exclusions_win_over_inclusions() {
        let spec =
            FileFilterSpec::new(&strings(&["src/**"]), &strings(&["src/gen/**"])).unwrap();
        assert!(spec.has_exclusions());
        assert!(spec.matches(Path::new("src/a.js")));
        assert!(!spec.matches(Path::new("src/gen/a.js")));
    }

    #[test]
    fn test_parse_bang_prefix() {
        let spec = FileFilterSpec::parse(&strings(&["!test/**"])).unwrap();
        assert!(!spec.has_inclusions());
        assert!(spec.has_exclusions());
        assert!(spec.matches(Path::new("src/a.js")));
        assert!(!spec.matches(Path::new("test/a.js")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileFilterSpec::new(&strings(&["src/[a"]), &[]).unwrap_err();
        assert!(err.to_string().contains("src/[a"));
    }
}
