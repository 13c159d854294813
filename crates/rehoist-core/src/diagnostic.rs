//! Diagnostics produced by analysis rules.

use serde::{Deserialize, Serialize};

use crate::patch::{Fix, Span};
use crate::text::byte_offset_to_position_str;

/// One finding, optionally carrying a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable rule key (e.g. `hoist-regex`).
    pub rule: String,
    /// Stable message key within the rule (e.g. `hoistRegex`).
    pub message_id: String,
    /// Human-readable message.
    pub message: String,
    /// Byte range of the offending node.
    pub span: Span,
    /// 1-indexed line of `span.start`.
    pub line: u32,
    /// 1-indexed column of `span.start`.
    pub col: u32,
    /// Suggested fix, if the rule can produce one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create a diagnostic, computing its line and column from `source`.
    pub fn new(
        source: &str,
        rule: impl Into<String>,
        message_id: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        let (line, col) = byte_offset_to_position_str(source, span.start);
        Diagnostic {
            rule: rule.into(),
            message_id: message_id.into(),
            message: message.into(),
            span,
            line,
            col,
            fix: None,
        }
    }

    /// Attach a fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns true if a fix is attached.
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Edit;

    #[test]
    fn test_diagnostic_position() {
        let source = "function f() {\n  return /a/;\n}";
        let diag = Diagnostic::new(source, "hoist-regex", "hoistRegex", "msg", Span::new(24, 27));
        assert_eq!((diag.line, diag.col), (2, 10));
        assert!(!diag.is_fixable());

        let diag = diag.with_fix(Fix::new(vec![Edit::replace(Span::new(24, 27), "REGEX")]));
        assert!(diag.is_fixable());
    }
}
