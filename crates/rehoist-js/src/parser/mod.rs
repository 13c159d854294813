// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JavaScript and TypeScript parsing.
//!
//! Source text is parsed with tree-sitter using the JavaScript, TypeScript
//! or TSX grammar, then lowered into the arena [`Ast`]. Before lowering, the
//! concrete tree is walked once with a cursor:
//!
//! - the first `ERROR` or missing node becomes a [`ParserError::SyntaxError`]
//! - a tree nested deeper than [`MAX_NESTING_DEPTH`] is rejected with
//!   [`ParserError::NestingTooDeep`], which bounds the recursion of lowering
//!   and of every visitor walk
//!
//! After lowering, `import` and `export` declarations are accepted at the top
//! level (or directly inside a TypeScript namespace) and only in modules.

mod errors;
mod lower;

pub use errors::{prettify_error, ParseResult, ParserError};

use std::path::Path;

use rehoist_core::patch::Span;
use tracing::trace;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::nodes::{Ast, NodeKind, SourceType};

/// Deepest concrete syntax tree accepted.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Grammar used to parse a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    JavaScript,
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl Dialect {
    /// Dialect for a file path, by extension.
    ///
    /// `.ts`, `.mts` and `.cts` are TypeScript, `.tsx` is TSX, and anything
    /// else (`.jsx` included) is JavaScript.
    pub fn from_path(path: impl AsRef<Path>) -> Dialect {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("ts" | "mts" | "cts") => Dialect::TypeScript,
            Some("tsx") => Dialect::Tsx,
            _ => Dialect::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Options for [`parse_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub source_type: SourceType,
    pub dialect: Dialect,
}

/// Parse JavaScript `source` into a syntax tree.
///
/// ```
/// use rehoist_js::parser::parse;
/// use rehoist_js::nodes::SourceType;
///
/// let ast = parse("const REGEX = /ab/g;", SourceType::Auto).unwrap();
/// assert_eq!(ast.program_body().len(), 1);
/// ```
pub fn parse(source: &str, source_type: SourceType) -> ParseResult<Ast> {
    parse_with(
        source,
        ParseOptions {
            source_type,
            dialect: Dialect::JavaScript,
        },
    )
}

/// Parse `source` in the given dialect.
pub fn parse_with(source: &str, options: ParseOptions) -> ParseResult<Ast> {
    let tree = parse_tree(source, options.dialect)?;
    check_tree(source, &tree)?;
    let ast = lower::lower_program(source, tree.root_node(), options.source_type)?;
    check_module_items(&ast)?;
    trace!(nodes = ast.len(), dialect = ?options.dialect, "parsed program");
    Ok(ast)
}

fn parse_tree(source: &str, dialect: Dialect) -> ParseResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParserError::Unavailable(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ParserError::Unavailable("the parse was cancelled".to_string()))
}

// ============================================================================
// Tree checks
// ============================================================================

/// Walk the whole tree in pre-order, rejecting excess depth and reporting
/// the first syntax error.
fn check_tree(source: &str, tree: &Tree) -> ParseResult<()> {
    let has_error = tree.root_node().has_error();
    let mut cursor = tree.walk();
    let mut depth = 0usize;
    loop {
        let node = cursor.node();
        if depth > MAX_NESTING_DEPTH {
            return Err(ParserError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: Span::new(node.start_byte(), node.end_byte()),
            });
        }
        if has_error && (node.is_error() || node.is_missing()) {
            return Err(syntax_error(source, node));
        }

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
            depth -= 1;
        }
    }
}

fn syntax_error(source: &str, node: Node<'_>) -> ParserError {
    let span = Span::new(node.start_byte(), node.end_byte());
    if node.is_missing() {
        return ParserError::syntax(format!("missing `{}`", node.kind()), span);
    }

    // Report the first token the parser could not place.
    let mut leaf = node;
    while let Some(child) = leaf.child(0) {
        leaf = child;
    }
    let first_line = |start: usize, end: usize| {
        source
            .get(start..end)
            .unwrap_or_default()
            .lines()
            .next()
            .unwrap_or_default()
    };
    let mut text = first_line(leaf.start_byte(), leaf.end_byte());
    if text.is_empty() {
        text = first_line(span.start, span.end);
    }
    if text.is_empty() {
        return ParserError::syntax("unexpected end of input", Span::empty(span.start));
    }
    let shown: String = text.chars().take(40).collect();
    ParserError::syntax(format!("unexpected `{}`", shown), span)
}

/// Import and export declarations, including TypeScript forms that lowered
/// to generic syntax.
fn is_module_item(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::ImportDeclaration { .. }
            | NodeKind::ExportNamedDeclaration { .. }
            | NodeKind::ExportDefaultDeclaration { .. }
            | NodeKind::ExportAllDeclaration { .. }
            | NodeKind::Syntax {
                kind: "export_statement",
                ..
            }
    )
}

fn check_module_items(ast: &Ast) -> ParseResult<()> {
    for (id, node) in ast.iter() {
        if !is_module_item(&node.kind) {
            continue;
        }
        let parent = node.parent.map(|p| ast.kind(p));
        match parent {
            Some(NodeKind::Program { .. }) => {
                if ast.source_type() == SourceType::Script {
                    return Err(ParserError::syntax(
                        "import and export declarations may only appear in a module",
                        ast.span(id),
                    ));
                }
            }
            Some(NodeKind::TsModuleBlock { .. }) => {}
            _ => {
                return Err(ParserError::syntax(
                    "import and export declarations may only appear at the top level",
                    ast.span(id),
                ));
            }
        }
    }
    Ok(())
}
