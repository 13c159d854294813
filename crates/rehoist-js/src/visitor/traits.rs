// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for syntax tree traversal.

use crate::nodes::{Ast, NodeId};

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called.
    Stop,
}

impl VisitResult {
    /// Combine the results of two hooks called for the same node.
    ///
    /// `Stop` wins over `SkipChildren`, which wins over `Continue`.
    pub fn merge(self, other: VisitResult) -> VisitResult {
        match (self, other) {
            (VisitResult::Stop, _) | (_, VisitResult::Stop) => VisitResult::Stop,
            (VisitResult::SkipChildren, _) | (_, VisitResult::SkipChildren) => {
                VisitResult::SkipChildren
            }
            _ => VisitResult::Continue,
        }
    }
}

/// Generate `visit_*`/`leave_*` pairs with default implementations.
///
/// # Usage
///
/// ```ignore
/// visitor_methods! {
///     /// Function declarations, expressions and arrows.
///     visit_function, leave_function;
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $visit:ident, $leave:ident
        );* $(;)?
    ) => {
        $(
            $(#[$meta])*
            #[doc = ""]
            #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
            #[allow(unused_variables)]
            fn $visit(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
                VisitResult::Continue
            }

            $(#[$meta])*
            #[doc = ""]
            #[doc = "Called after all children have been visited, even if `SkipChildren` was returned."]
            #[allow(unused_variables)]
            fn $leave(&mut self, ast: &Ast, id: NodeId) {}
        )*
    };
}

/// Read-only visitor over an [`Ast`].
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order
///
/// For every node the walker calls [`Visitor::visit_node`] first, then the
/// kind-specific hook (if the node has one). On the way out the specific
/// `leave_*` runs before [`Visitor::leave_node`].
///
/// # Example
///
/// ```
/// use rehoist_js::nodes::{Ast, NodeId, SourceType};
/// use rehoist_js::parser::parse;
/// use rehoist_js::visitor::{walk_program, VisitResult, Visitor};
///
/// struct IdentifierCounter {
///     count: usize,
/// }
///
/// impl Visitor for IdentifierCounter {
///     fn visit_identifier(&mut self, _ast: &Ast, _id: NodeId) -> VisitResult {
///         self.count += 1;
///         VisitResult::Continue
///     }
/// }
///
/// let ast = parse("a = b + c;", SourceType::Auto).unwrap();
/// let mut counter = IdentifierCounter { count: 0 };
/// walk_program(&mut counter, &ast);
/// assert_eq!(counter.count, 3);
/// ```
pub trait Visitor {
    visitor_methods! {
        /// Any node.
        visit_node, leave_node;
        /// The `Program` root.
        visit_program, leave_program;
        /// Function declarations, function expressions and arrow functions.
        visit_function, leave_function;
        /// Class declarations and class expressions.
        visit_class, leave_class;
        /// Block statements, class static blocks and TypeScript namespace bodies.
        visit_block, leave_block;
        /// A `catch` clause.
        visit_catch_clause, leave_catch_clause;
        /// `for`, `for-in` and `for-of` statements.
        visit_for, leave_for;
        /// A `switch` statement.
        visit_switch, leave_switch;
        /// A `var`, `let` or `const` declaration.
        visit_variable_declaration, leave_variable_declaration;
        /// One declarator of a variable declaration.
        visit_variable_declarator, leave_variable_declarator;
        /// An `import` declaration.
        visit_import_declaration, leave_import_declaration;
        /// A TypeScript type alias, interface, overload signature, enum or
        /// namespace.
        visit_ts_declaration, leave_ts_declaration;
        /// An identifier in any role.
        visit_identifier, leave_identifier;
        /// A literal (string, number, boolean, null or regex).
        visit_literal, leave_literal;
    }
}
