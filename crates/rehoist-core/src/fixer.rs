//! Merging independently computed fixes into one application pass.
//!
//! Fixes from different diagnostics are computed against the same original
//! text and may touch the same region. A pass accepts fixes in order of their
//! covering span and skips any fix whose covering span starts at or before the
//! end of the last accepted one. Skipped fixes are deferred to the next pass,
//! which re-analyzes the rewritten text.

use tracing::trace;

use crate::editor::{BatchEditError, BatchSpanEditor};
use crate::patch::{Edit, Fix, Span};

/// Outcome of one fix pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPass {
    /// Source after applying the accepted fixes.
    pub output: String,
    /// Indices (into the input slice) of fixes that were applied.
    pub applied: Vec<usize>,
    /// Indices of fixes deferred because they conflicted with an applied fix.
    pub deferred: Vec<usize>,
    /// The edits that were applied, in application order of their fixes.
    pub edits: Vec<Edit>,
}

impl FixPass {
    /// Returns true if at least one fix was applied.
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply as many non-conflicting fixes as possible to `source`.
///
/// Empty fixes are ignored. Malformed fixes (internally overlapping edits)
/// are deferred rather than applied.
pub fn apply_fix_pass(source: &str, fixes: &[Fix]) -> Result<FixPass, BatchEditError> {
    let mut order: Vec<(usize, Span)> = fixes
        .iter()
        .enumerate()
        .filter_map(|(i, fix)| fix.covering_span().map(|span| (i, span)))
        .collect();
    order.sort_by_key(|(i, span)| (span.start, span.end, *i));

    let mut applied = Vec::new();
    let mut deferred = Vec::new();
    let mut last_end: Option<usize> = None;
    for (index, span) in order {
        let conflicts = last_end.is_some_and(|end| span.start <= end);
        if conflicts || !fixes[index].is_well_formed() {
            trace!(fix = index, %span, "deferring fix");
            deferred.push(index);
            continue;
        }
        last_end = Some(span.end);
        applied.push(index);
    }

    let edits: Vec<Edit> = applied
        .iter()
        .flat_map(|&i| fixes[i].edits.iter().cloned())
        .collect();

    let output = if edits.is_empty() {
        source.to_string()
    } else {
        let mut editor = BatchSpanEditor::new(source);
        editor.add_all(edits.iter().cloned());
        editor.apply()?
    };

    Ok(FixPass {
        output,
        applied,
        deferred,
        edits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoist_fix(insert_at: usize, literal: Span, name: &str, text: &str) -> Fix {
        Fix::new(vec![
            Edit::insert(insert_at, format!("\nconst {} = {};", name, text)),
            Edit::replace(literal, name),
        ])
    }

    #[test]
    fn test_single_fix_applies() {
        let source = "f(/a/);";
        let pass = apply_fix_pass(source, &[hoist_fix(0, Span::new(2, 5), "REGEX", "/a/")]).unwrap();
        assert_eq!(pass.output, "\nconst REGEX = /a/;f(REGEX);");
        assert_eq!(pass.applied, vec![0]);
        assert!(pass.deferred.is_empty());
        assert!(pass.changed());
    }

    #[test]
    fn test_fixes_sharing_insertion_point_are_serialized() {
        let source = "f(/a/); g(/b/);";
        let fixes = vec![
            hoist_fix(0, Span::new(10, 13), "REGEX", "/b/"),
            hoist_fix(0, Span::new(2, 5), "REGEX", "/a/"),
        ];
        let pass = apply_fix_pass(source, &fixes).unwrap();
        // The fix with the smaller covering span goes first.
        assert_eq!(pass.applied, vec![1]);
        assert_eq!(pass.deferred, vec![0]);
        assert_eq!(pass.output, "\nconst REGEX = /a/;f(REGEX); g(/b/);");
    }

    #[test]
    fn test_disjoint_fixes_apply_together() {
        let source = "aaaa bbbb";
        let fixes = vec![
            Fix::new(vec![Edit::replace(Span::new(5, 9), "B")]),
            Fix::new(vec![Edit::replace(Span::new(0, 4), "A")]),
        ];
        let pass = apply_fix_pass(source, &fixes).unwrap();
        assert_eq!(pass.applied, vec![1, 0]);
        assert_eq!(pass.output, "A B");
    }

    #[test]
    fn test_no_fixes_is_noop() {
        let pass = apply_fix_pass("x", &[Fix::default()]).unwrap();
        assert_eq!(pass.output, "x");
        assert!(!pass.changed());
        assert!(pass.deferred.is_empty());
    }

    #[test]
    fn test_malformed_fix_deferred() {
        let fix = Fix::new(vec![
            Edit::replace(Span::new(0, 4), "x"),
            Edit::insert(2, "y"),
        ]);
        let pass = apply_fix_pass("abcdef", &[fix]).unwrap();
        assert_eq!(pass.deferred, vec![0]);
        assert_eq!(pass.output, "abcdef");
    }
}
