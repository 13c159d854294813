//! Batch edit infrastructure for applying multiple span-based edits atomically.
//!
//! [`BatchSpanEditor`] collects [`Edit`]s against one source text, validates
//! them (bounds, overlap) and applies them in reverse position order so that
//! earlier spans stay valid while later text changes length.
//!
//! # Example
//!
//! ```
//! use rehoist_core::editor::BatchSpanEditor;
//! use rehoist_core::patch::{Edit, Span};
//!
//! let source = "foo(/a/);";
//!
//! let mut editor = BatchSpanEditor::new(source);
//! editor.add(Edit::insert(0, "const REGEX = /a/;\n"));
//! editor.add(Edit::replace(Span::new(4, 7), "REGEX"));
//!
//! let result = editor.apply().unwrap();
//! assert_eq!(result, "const REGEX = /a/;\nfoo(REGEX);");
//! ```

use std::cmp::Ordering;

use thiserror::Error;

use crate::patch::{edit_spans_conflict, Edit, Span};

/// Error type for batch edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchEditError {
    /// Two edits have overlapping spans.
    #[error("overlapping edits: {edit1_span} and {edit2_span}")]
    OverlappingEdits { edit1_span: Span, edit2_span: Span },

    /// An edit span extends beyond source length.
    #[error("span {span} is out of bounds for source of length {source_len}")]
    SpanOutOfBounds { span: Span, source_len: usize },

    /// An edit span does not fall on a UTF-8 character boundary.
    #[error("span {span} is not on a character boundary")]
    NotCharBoundary { span: Span },

    /// No edits to apply.
    #[error("no edits to apply")]
    EmptyEdits,
}

/// Result type for batch edit operations.
pub type BatchEditResult<T> = Result<T, BatchEditError>;

/// Options for controlling edit application behavior.
#[derive(Debug, Clone)]
pub struct BatchEditOptions {
    /// If true, adjacent edits (one ends where another starts) are allowed.
    /// Default: true
    pub allow_adjacent: bool,

    /// If true, empty edit list returns original source instead of error.
    /// Default: false
    pub allow_empty: bool,
}

impl Default for BatchEditOptions {
    fn default() -> Self {
        Self {
            allow_adjacent: true,
            allow_empty: false,
        }
    }
}

/// A batch editor that collects edits and applies them atomically.
pub struct BatchSpanEditor<'src> {
    source: &'src str,
    edits: Vec<Edit>,
    options: BatchEditOptions,
}

impl<'src> BatchSpanEditor<'src> {
    /// Create a new BatchSpanEditor for the given source.
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, BatchEditOptions::default())
    }

    /// Create a new BatchSpanEditor with custom options.
    pub fn with_options(source: &'src str, options: BatchEditOptions) -> Self {
        Self {
            source,
            edits: Vec::new(),
            options,
        }
    }

    /// Add an edit to the batch.
    pub fn add(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits.
    pub fn add_all(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Returns the number of edits currently queued.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if no edits are queued.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Validate edits without applying them.
    pub fn validate(&self) -> BatchEditResult<()> {
        if self.edits.is_empty() && !self.options.allow_empty {
            return Err(BatchEditError::EmptyEdits);
        }

        let source_len = self.source.len();
        for edit in &self.edits {
            let span = edit.span();
            if span.end > source_len {
                return Err(BatchEditError::SpanOutOfBounds { span, source_len });
            }
            if !self.source.is_char_boundary(span.start) || !self.source.is_char_boundary(span.end)
            {
                return Err(BatchEditError::NotCharBoundary { span });
            }
        }

        for (i, a) in self.edits.iter().enumerate() {
            for b in &self.edits[i + 1..] {
                if edit_spans_conflict(&a.span(), &b.span(), self.options.allow_adjacent) {
                    return Err(BatchEditError::OverlappingEdits {
                        edit1_span: a.span(),
                        edit2_span: b.span(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply all queued edits and return the transformed source.
    ///
    /// Edits are applied in reverse position order to preserve span validity.
    /// At equal positions replacements are applied before insertions, so an
    /// insertion lands in front of the replaced text. Insertions sharing a
    /// position keep their queue order.
    ///
    /// # Errors
    ///
    /// - `BatchEditError::OverlappingEdits` if any two edits overlap
    /// - `BatchEditError::SpanOutOfBounds` if any span exceeds source length
    /// - `BatchEditError::EmptyEdits` if no edits and `allow_empty` is false
    pub fn apply(mut self) -> BatchEditResult<String> {
        self.validate()?;
        if self.edits.is_empty() {
            return Ok(self.source.to_string());
        }

        let mut ordered: Vec<(usize, Edit)> = self.edits.drain(..).enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| {
            match b.insertion_point().cmp(&a.insertion_point()) {
                Ordering::Equal => match (a.is_insertion(), b.is_insertion()) {
                    (false, true) => Ordering::Less,
                    (true, false) => Ordering::Greater,
                    // Later-queued insertions go first so earlier ones end up in front.
                    _ => ib.cmp(ia),
                },
                other => other,
            }
        });

        let mut result = self.source.to_string();
        for (_, edit) in &ordered {
            match edit {
                Edit::Insert { position, text } => result.insert_str(*position, text),
                Edit::Replace { span, text } => result.replace_range(span.start..span.end, text),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_single_span() {
        let mut editor = BatchSpanEditor::new("x = /a/;");
        editor.add(Edit::replace(Span::new(4, 7), "REGEX"));
        assert_eq!(editor.apply().unwrap(), "x = REGEX;");
    }

    #[test]
    fn test_insert_and_replace_apply_together() {
        let source = "import a from 'a';\nfoo(/b/);";
        let mut editor = BatchSpanEditor::new(source);
        editor.add(Edit::insert(18, "\nconst REGEX = /b/;"));
        editor.add(Edit::replace(Span::new(23, 26), "REGEX"));
        assert_eq!(
            editor.apply().unwrap(),
            "import a from 'a';\nconst REGEX = /b/;\nfoo(REGEX);"
        );
    }

    #[test]
    fn test_insert_at_replacement_start_lands_in_front() {
        let source = "/a/.test(s);";
        let mut editor = BatchSpanEditor::new(source);
        editor.add(Edit::insert(0, "\nconst REGEX = /a/;"));
        editor.add(Edit::replace(Span::new(0, 3), "REGEX"));
        assert_eq!(
            editor.apply().unwrap(),
            "\nconst REGEX = /a/;REGEX.test(s);"
        );
    }

    #[test]
    fn test_insert_at_replacement_end_is_adjacent() {
        let source = "x || /a/";
        let mut editor = BatchSpanEditor::new(source);
        editor.add(Edit::insert(8, "\nconst REGEX = /a/;"));
        editor.add(Edit::replace(Span::new(5, 8), "REGEX"));
        assert_eq!(editor.apply().unwrap(), "x || REGEX\nconst REGEX = /a/;");
    }

    #[test]
    fn test_insertions_at_same_point_keep_queue_order() {
        let mut editor = BatchSpanEditor::new("end");
        editor.add(Edit::insert(0, "a"));
        editor.add(Edit::insert(0, "b"));
        assert_eq!(editor.apply().unwrap(), "abend");
    }

    #[test]
    fn test_overlapping_replacements_rejected() {
        let mut editor = BatchSpanEditor::new("abcdefgh");
        editor.add(Edit::replace(Span::new(0, 4), "x"));
        editor.add(Edit::replace(Span::new(2, 6), "y"));
        assert!(matches!(
            editor.apply(),
            Err(BatchEditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn test_insert_inside_replacement_rejected() {
        let mut editor = BatchSpanEditor::new("abcdefgh");
        editor.add(Edit::replace(Span::new(0, 4), "x"));
        editor.add(Edit::insert(2, "y"));
        assert!(editor.validate().is_err());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut editor = BatchSpanEditor::new("abc");
        editor.add(Edit::replace(Span::new(1, 10), "x"));
        assert_eq!(
            editor.apply(),
            Err(BatchEditError::SpanOutOfBounds {
                span: Span::new(1, 10),
                source_len: 3
            })
        );
    }

    #[test]
    fn test_empty_edits() {
        assert_eq!(
            BatchSpanEditor::new("abc").apply(),
            Err(BatchEditError::EmptyEdits)
        );
        let options = BatchEditOptions {
            allow_empty: true,
            ..Default::default()
        };
        assert_eq!(
            BatchSpanEditor::with_options("abc", options).apply().unwrap(),
            "abc"
        );
    }

    #[test]
    fn test_non_char_boundary_rejected() {
        let mut editor = BatchSpanEditor::new("é");
        editor.add(Edit::insert(1, "x"));
        assert_eq!(
            editor.validate(),
            Err(BatchEditError::NotCharBoundary {
                span: Span::empty(1)
            })
        );
    }
}
