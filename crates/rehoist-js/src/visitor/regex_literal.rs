// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! RegexLiteralCollector visitor: every regular expression literal in a tree.

use rehoist_core::patch::Span;

use super::dispatch::walk_program;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Ast, LiteralValue, NodeId, NodeKind};

/// A regular expression literal found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteralInfo {
    /// The `Literal` node.
    pub node: NodeId,
    pub pattern: String,
    pub flags: String,
    /// Exact source text, slashes and flags included.
    pub text: String,
    pub span: Span,
}

/// Collects regex literals in source order.
///
/// # Example
///
/// ```
/// use rehoist_js::nodes::SourceType;
/// use rehoist_js::parser::parse;
/// use rehoist_js::visitor::RegexLiteralCollector;
///
/// let ast = parse("a.replace(/x/g, y).match(/z/);", SourceType::Auto).unwrap();
/// let found = RegexLiteralCollector::collect(&ast);
/// let texts: Vec<_> = found.iter().map(|r| r.text.as_str()).collect();
/// assert_eq!(texts, ["/x/g", "/z/"]);
/// ```
#[derive(Debug, Default)]
pub struct RegexLiteralCollector {
    literals: Vec<RegexLiteralInfo>,
}

impl RegexLiteralCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `ast` and return its regex literals in source order.
    pub fn collect(ast: &Ast) -> Vec<RegexLiteralInfo> {
        let mut collector = RegexLiteralCollector::new();
        walk_program(&mut collector, ast);
        collector.literals
    }

    pub fn into_literals(self) -> Vec<RegexLiteralInfo> {
        self.literals
    }
}

impl Visitor for RegexLiteralCollector {
    fn visit_literal(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        if let NodeKind::Literal {
            value: LiteralValue::Regex { pattern, flags },
        } = ast.kind(id)
        {
            self.literals.push(RegexLiteralInfo {
                node: id,
                pattern: pattern.clone(),
                flags: flags.clone(),
                text: ast.node_text(id).to_string(),
                span: ast.span(id),
            });
        }
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::SourceType;
    use crate::parser::parse;

    fn texts(source: &str) -> Vec<String> {
        let ast = parse(source, SourceType::Auto).unwrap();
        RegexLiteralCollector::collect(&ast)
            .into_iter()
            .map(|r| r.text)
            .collect()
    }

    #[test]
    fn test_collects_in_source_order() {
        let source = "const A = /a/;\nfunction f(x = /b/) {\n  return () => `${/c/}` + /d/i.source;\n}\nclass K { m() { return /e/; } }";
        assert_eq!(texts(source), vec!["/a/", "/b/", "/c/", "/d/i", "/e/"]);
    }

    #[test]
    fn test_ignores_other_literals_and_division() {
        assert!(texts("x = 'a/b/c' + 4 / 2 / 1 + `/t/`;").is_empty());
    }

    #[test]
    fn test_pattern_and_flags() {
        let ast = parse("s.split(/[,/]\\s*/gu);", SourceType::Auto).unwrap();
        let found = RegexLiteralCollector::collect(&ast);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pattern, "[,/]\\s*");
        assert_eq!(found[0].flags, "gu");
        assert_eq!(found[0].span, Span::new(8, 19));
        assert_eq!(found[0].text, "/[,/]\\s*/gu");
    }
}
