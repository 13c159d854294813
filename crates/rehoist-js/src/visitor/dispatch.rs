// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for syntax tree traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited left-to-right, top-to-bottom
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::traits::{VisitResult, Visitor};
use crate::nodes::{Ast, NodeId, NodeKind};

/// Node categories that have a dedicated hook pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Program,
    Function,
    Class,
    Block,
    CatchClause,
    For,
    Switch,
    VariableDeclaration,
    VariableDeclarator,
    ImportDeclaration,
    TsDeclaration,
    Identifier,
    Literal,
}

fn hook_for(kind: &NodeKind) -> Option<Hook> {
    let hook = match kind {
        NodeKind::Program { .. } => Hook::Program,
        NodeKind::FunctionDeclaration(_)
        | NodeKind::FunctionExpression(_)
        | NodeKind::ArrowFunctionExpression { .. } => Hook::Function,
        NodeKind::ClassDeclaration(_) | NodeKind::ClassExpression(_) => Hook::Class,
        NodeKind::BlockStatement { .. }
        | NodeKind::StaticBlock { .. }
        | NodeKind::TsModuleBlock { .. } => Hook::Block,
        NodeKind::CatchClause { .. } => Hook::CatchClause,
        NodeKind::ForStatement { .. }
        | NodeKind::ForInStatement { .. }
        | NodeKind::ForOfStatement { .. } => Hook::For,
        NodeKind::SwitchStatement { .. } => Hook::Switch,
        NodeKind::VariableDeclaration { .. } => Hook::VariableDeclaration,
        NodeKind::VariableDeclarator { .. } => Hook::VariableDeclarator,
        NodeKind::ImportDeclaration { .. } => Hook::ImportDeclaration,
        NodeKind::TsTypeDeclaration { .. }
        | NodeKind::TsEnumDeclaration { .. }
        | NodeKind::TsModuleDeclaration { .. } => Hook::TsDeclaration,
        NodeKind::Identifier { .. } => Hook::Identifier,
        NodeKind::Literal { .. } => Hook::Literal,
        _ => return None,
    };
    Some(hook)
}

fn call_visit<V: Visitor + ?Sized>(visitor: &mut V, hook: Hook, ast: &Ast, id: NodeId) -> VisitResult {
    match hook {
        Hook::Program => visitor.visit_program(ast, id),
        Hook::Function => visitor.visit_function(ast, id),
        Hook::Class => visitor.visit_class(ast, id),
        Hook::Block => visitor.visit_block(ast, id),
        Hook::CatchClause => visitor.visit_catch_clause(ast, id),
        Hook::For => visitor.visit_for(ast, id),
        Hook::Switch => visitor.visit_switch(ast, id),
        Hook::VariableDeclaration => visitor.visit_variable_declaration(ast, id),
        Hook::VariableDeclarator => visitor.visit_variable_declarator(ast, id),
        Hook::ImportDeclaration => visitor.visit_import_declaration(ast, id),
        Hook::TsDeclaration => visitor.visit_ts_declaration(ast, id),
        Hook::Identifier => visitor.visit_identifier(ast, id),
        Hook::Literal => visitor.visit_literal(ast, id),
    }
}

fn call_leave<V: Visitor + ?Sized>(visitor: &mut V, hook: Hook, ast: &Ast, id: NodeId) {
    match hook {
        Hook::Program => visitor.leave_program(ast, id),
        Hook::Function => visitor.leave_function(ast, id),
        Hook::Class => visitor.leave_class(ast, id),
        Hook::Block => visitor.leave_block(ast, id),
        Hook::CatchClause => visitor.leave_catch_clause(ast, id),
        Hook::For => visitor.leave_for(ast, id),
        Hook::Switch => visitor.leave_switch(ast, id),
        Hook::VariableDeclaration => visitor.leave_variable_declaration(ast, id),
        Hook::VariableDeclarator => visitor.leave_variable_declarator(ast, id),
        Hook::ImportDeclaration => visitor.leave_import_declaration(ast, id),
        Hook::TsDeclaration => visitor.leave_ts_declaration(ast, id),
        Hook::Identifier => visitor.leave_identifier(ast, id),
        Hook::Literal => visitor.leave_literal(ast, id),
    }
}

/// Walk the whole program.
pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast) -> VisitResult {
    walk_node(visitor, ast, ast.root())
}

/// Walk a node and its subtree.
///
/// Traversal order:
/// 1. `visit_node`, then the kind-specific `visit_*`
/// 2. Walk each child in source order
/// 3. The kind-specific `leave_*`, then `leave_node`
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) -> VisitResult {
    let hook = hook_for(ast.kind(id));

    let mut result = visitor.visit_node(ast, id);
    if result == VisitResult::Stop {
        return VisitResult::Stop;
    }
    if let Some(hook) = hook {
        result = result.merge(call_visit(visitor, hook, ast, id));
    }

    match result {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for child in ast.children(id) {
                if walk_node(visitor, ast, child) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }

    if let Some(hook) = hook {
        call_leave(visitor, hook, ast, id);
    }
    visitor.leave_node(ast, id);
    VisitResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::SourceType;
    use crate::parser::parse;

    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
        stop_at: Option<&'static str>,
        skip: Option<&'static str>,
    }

    impl Visitor for EventLog {
        fn visit_node(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
            let name = ast.kind(id).name();
            self.events.push(format!("enter {}", name));
            if self.stop_at == Some(name) {
                return VisitResult::Stop;
            }
            if self.skip == Some(name) {
                return VisitResult::SkipChildren;
            }
            VisitResult::Continue
        }

        fn leave_node(&mut self, ast: &Ast, id: NodeId) {
            self.events.push(format!("leave {}", ast.kind(id).name()));
        }

        fn visit_literal(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
            self.events.push(format!("literal {}", ast.node_text(id)));
            VisitResult::Continue
        }
    }

    #[test]
    fn test_pre_and_post_order() {
        let ast = parse("x = /a/;", SourceType::Auto).unwrap();
        let mut log = EventLog::default();
        assert_eq!(walk_program(&mut log, &ast), VisitResult::Continue);
        assert_eq!(
            log.events,
            vec![
                "enter Program",
                "enter ExpressionStatement",
                "enter AssignmentExpression",
                "enter Identifier",
                "leave Identifier",
                "enter Literal",
                "literal /a/",
                "leave Literal",
                "leave AssignmentExpression",
                "leave ExpressionStatement",
                "leave Program",
            ]
        );
    }

    #[test]
    fn test_skip_children_still_leaves() {
        let ast = parse("f(/a/); g(/b/);", SourceType::Auto).unwrap();
        let mut log = EventLog {
            skip: Some("CallExpression"),
            ..Default::default()
        };
        walk_program(&mut log, &ast);
        assert!(!log.events.iter().any(|e| e.starts_with("literal")));
        assert_eq!(
            log.events.iter().filter(|e| *e == "leave CallExpression").count(),
            2
        );
    }

    #[test]
    fn test_stop_halts_traversal() {
        let ast = parse("f(/a/); g(/b/);", SourceType::Auto).unwrap();
        let mut log = EventLog {
            stop_at: Some("Literal"),
            ..Default::default()
        };
        assert_eq!(walk_program(&mut log, &ast), VisitResult::Stop);
        assert_eq!(log.events.last().map(String::as_str), Some("enter Literal"));
        assert!(!log.events.iter().any(|e| e == "leave CallExpression"));
        assert!(!log.events.iter().any(|e| e == "leave Program"));
    }

    #[test]
    fn test_merge() {
        assert_eq!(
            VisitResult::Continue.merge(VisitResult::SkipChildren),
            VisitResult::SkipChildren
        );
        assert_eq!(
            VisitResult::SkipChildren.merge(VisitResult::Stop),
            VisitResult::Stop
        );
        assert_eq!(
            VisitResult::Continue.merge(VisitResult::Continue),
            VisitResult::Continue
        );
    }
}
