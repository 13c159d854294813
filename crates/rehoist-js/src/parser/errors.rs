// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::{max, min};

use rehoist_core::patch::Span;
use rehoist_core::text::{byte_offset_to_position_str, line_start};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("{message}")]
    SyntaxError { message: String, span: Span },
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
    #[error("parser unavailable: {0}")]
    Unavailable(String),
}

impl ParserError {
    pub(crate) fn syntax(message: impl Into<String>, span: Span) -> Self {
        ParserError::SyntaxError {
            message: message.into(),
            span,
        }
    }

    /// Location of the error in the source.
    pub fn span(&self) -> Span {
        match self {
            ParserError::SyntaxError { span, .. } | ParserError::NestingTooDeep { span, .. } => {
                *span
            }
            ParserError::Unavailable(_) => Span::empty(0),
        }
    }
}

pub type ParseResult<T> = Result<T, ParserError>;

/// Render a parse error as an annotated source snippet.
///
/// One line of context is shown before and after the offending line.
pub fn prettify_error(source: &str, err: &ParserError, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let span = err.span();
    let context = 1;
    let (line, _) = byte_offset_to_position_str(source, span.start);
    let line = line as usize;
    let first_line = max(1, line.saturating_sub(context));

    let mut start_offset = line_start(source, span.start.min(source.len()));
    for _ in first_line..line {
        start_offset = line_start(source, start_offset.saturating_sub(1));
    }
    let mut end_offset = span.end.min(source.len());
    for _ in 0..=context {
        end_offset = match source[end_offset..].find('\n') {
            Some(i) => end_offset + i + 1,
            None => source.len(),
        };
    }
    let snippet = &source[start_offset..end_offset];

    let start = span.start.min(source.len()) - start_offset;
    let end = span.end.min(source.len()) - start_offset;
    let end = if start == end {
        min(end + 1, snippet.len() + 1)
    } else {
        end
    };

    Renderer::plain()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(snippet)
                    .line_start(first_line)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&err.to_string())]),
            ),
        )
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_span() {
        let err = ParserError::syntax("expected `)`", Span::new(3, 4));
        assert_eq!(err.span(), Span::new(3, 4));
        assert_eq!(err.to_string(), "expected `)`");

        let err = ParserError::NestingTooDeep {
            limit: 8,
            span: Span::new(0, 2),
        };
        assert_eq!(err.span(), Span::new(0, 2));
        assert_eq!(err.to_string(), "nesting exceeds 8 levels");
    }

    #[test]
    fn test_prettify_error_shows_context() {
        let source = "let a = 1;\nlet b = (;\nlet c = 3;\nlet d = 4;\n";
        let err = ParserError::syntax("unexpected token `;`", Span::new(20, 21));
        let pretty = prettify_error(source, &err, "app.js");
        assert!(pretty.contains("app.js"));
        assert!(pretty.contains("let b = (;"));
        assert!(pretty.contains("let a = 1;"));
        assert!(pretty.contains("let c = 3;"));
        assert!(!pretty.contains("let d = 4;"));
        assert!(pretty.contains("unexpected token `;`"));
    }

    #[test]
    fn test_prettify_error_at_end_of_input() {
        let source = "f(";
        let err = ParserError::syntax("unexpected end of input", Span::empty(2));
        let pretty = prettify_error(source, &err, "x.js");
        assert!(pretty.contains("unexpected end of input"));
    }
}
