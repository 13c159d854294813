//! Patch IR: spans, edits and fixes.
//!
//! A [`Fix`] is an ordered list of [`Edit`]s produced for one diagnostic and
//! applied atomically. Edits inside one fix never overlap; adjacency (one edit
//! ends where the next begins) is allowed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash type for content verification (SHA-256, stored as hex string for JSON compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into source text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Zero-width span at `offset`.
    pub fn empty(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Two spans overlap if they share any byte positions.
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Edits
// ============================================================================

/// An atomic text change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// Insert text at an absolute byte position.
    Insert { position: usize, text: String },
    /// Replace the bytes in `span` with `text`.
    Replace { span: Span, text: String },
}

impl Edit {
    /// Create an insertion edit.
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Edit::Insert {
            position,
            text: text.into(),
        }
    }

    /// Create a replacement edit.
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Edit::Replace {
            span,
            text: text.into(),
        }
    }

    /// The span this edit consumes. Zero-width for insertions.
    pub fn span(&self) -> Span {
        match self {
            Edit::Insert { position, .. } => Span::empty(*position),
            Edit::Replace { span, .. } => *span,
        }
    }

    /// Byte offset where the new text begins.
    pub fn insertion_point(&self) -> usize {
        self.span().start
    }

    /// Returns true for [`Edit::Insert`].
    pub fn is_insertion(&self) -> bool {
        matches!(self, Edit::Insert { .. })
    }

    /// The text written by this edit.
    pub fn text(&self) -> &str {
        match self {
            Edit::Insert { text, .. } | Edit::Replace { text, .. } => text,
        }
    }
}

/// Check whether two edit spans conflict.
///
/// A zero-width insertion conflicts with a replacement only when it falls
/// strictly inside it. With `allow_adjacent` false, touching spans conflict too.
pub fn edit_spans_conflict(a: &Span, b: &Span, allow_adjacent: bool) -> bool {
    if a.is_empty() && b.is_empty() {
        return false;
    }
    if a.is_empty() {
        return (b.start < a.start && a.start < b.end) || (!allow_adjacent && b.contains(a));
    }
    if b.is_empty() {
        return (a.start < b.start && b.start < a.end) || (!allow_adjacent && a.contains(b));
    }
    if allow_adjacent {
        a.overlaps(b)
    } else {
        a.start <= b.end && b.start <= a.end
    }
}

// ============================================================================
// Fix
// ============================================================================

/// An ordered set of edits implementing one diagnostic's suggested correction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Edits in emission order.
    pub edits: Vec<Edit>,
}

impl Fix {
    /// Create a fix from edits.
    pub fn new(edits: Vec<Edit>) -> Self {
        Fix { edits }
    }

    /// Smallest span covering every edit in this fix.
    pub fn covering_span(&self) -> Option<Span> {
        self.edits
            .iter()
            .map(Edit::span)
            .reduce(|acc, span| acc.cover(&span))
    }

    /// Returns true if no two edits of this fix conflict.
    pub fn is_well_formed(&self) -> bool {
        for (i, a) in self.edits.iter().enumerate() {
            for b in &self.edits[i + 1..] {
                if edit_spans_conflict(&a.span(), &b.span(), true) {
                    return false;
                }
            }
        }
        true
    }
}

// ============================================================================
// Output
// ============================================================================

/// A single applied edit as it appears in output (for JSON serialization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEdit {
    /// Byte range being replaced (zero-width for insertions).
    pub span: Span,
    /// Original text.
    pub old_text: String,
    /// Replacement text.
    pub new_text: String,
    /// 1-indexed line number (for display).
    pub line: u32,
    /// 1-indexed column (for display).
    pub col: u32,
}

impl OutputEdit {
    /// Describe `edit` against the source it applies to.
    pub fn from_edit(source: &str, edit: &Edit) -> Self {
        let span = edit.span();
        let (line, col) = crate::text::byte_offset_to_position_str(source, span.start);
        OutputEdit {
            span,
            old_text: source.get(span.start..span.end).unwrap_or_default().to_string(),
            new_text: edit.text().to_string(),
            line,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_overlap_and_adjacency() {
        let a = Span::new(0, 5);
        let b = Span::new(5, 8);
        let c = Span::new(4, 6);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert_eq!(a.cover(&b), Span::new(0, 8));
        assert_eq!(format!("{}", a), "[0, 5)");
    }

    #[test]
    #[should_panic(expected = "must be <= end")]
    fn test_span_rejects_inverted_range() {
        let _ = Span::new(3, 1);
    }

    #[test]
    fn test_insertion_inside_replacement_conflicts() {
        let replace = Span::new(10, 20);
        assert!(edit_spans_conflict(&Span::empty(15), &replace, true));
        assert!(!edit_spans_conflict(&Span::empty(10), &replace, true));
        assert!(!edit_spans_conflict(&Span::empty(20), &replace, true));
        assert!(edit_spans_conflict(&Span::empty(20), &replace, false));
        assert!(!edit_spans_conflict(&Span::empty(3), &Span::empty(3), true));
    }

    #[test]
    fn test_fix_covering_span() {
        let fix = Fix::new(vec![
            Edit::insert(4, "\nconst REGEX = /a/;"),
            Edit::replace(Span::new(30, 33), "REGEX"),
        ]);
        assert_eq!(fix.covering_span(), Some(Span::new(4, 33)));
        assert!(fix.is_well_formed());
        assert_eq!(Fix::default().covering_span(), None);
    }

    #[test]
    fn test_fix_with_insert_inside_replacement_is_malformed() {
        let fix = Fix::new(vec![
            Edit::insert(12, "x"),
            Edit::replace(Span::new(10, 20), "y"),
        ]);
        assert!(!fix.is_well_formed());
    }

    #[test]
    fn test_output_edit_from_replace() {
        let source = "a\nfoo(/x/);";
        let edit = Edit::replace(Span::new(6, 9), "REGEX");
        let out = OutputEdit::from_edit(source, &edit);
        assert_eq!(out.old_text, "/x/");
        assert_eq!(out.new_text, "REGEX");
        assert_eq!((out.line, out.col), (2, 5));
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = ContentHash::compute(b"const REGEX = /a/;");
        let b = ContentHash::compute(b"const REGEX = /a/;");
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
        assert_ne!(a, ContentHash::compute(b"other"));
    }
}
