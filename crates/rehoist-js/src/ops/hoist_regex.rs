// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The hoist-regex rule.
//!
//! Every regular expression literal that is not the initializer of a
//! top-level `const` is reported, with a fix that moves it into a new
//! top-level constant:
//!
//! 1. Walk the tree and collect regex literals in source order
//! 2. Skip literals that are already hoisted
//! 3. Pick a name (`REGEX`, `REGEX_1`, ...) that is free in the occurrence
//!    scope and the module scope
//! 4. Find the insertion point: after the last top-level regex constant,
//!    else after the last import, else at the start of the file
//! 5. Emit two edits as one fix:
//!    - Insert `\nconst NAME = /literal/;` at the insertion point
//!    - Replace the literal with `NAME`
//!
//! Fixes are computed independently against the same tree. Because they
//! share the insertion point, applying them is serialized by the fixer.

use std::collections::HashSet;
use std::fmt;

use rehoist_core::diagnostic::Diagnostic;
use rehoist_core::patch::{Edit, Fix, Span};
use tracing::{debug, trace};

use crate::nodes::{Ast, DeclKind, NodeId, NodeKind};
use crate::validation::{validate_js_identifier, ValidationResult};
use crate::visitor::{RegexLiteralCollector, ScopeId, ScopeTree};

/// Stable rule key.
pub const RULE_NAME: &str = "hoist-regex";

/// Message key of the only diagnostic this rule emits.
pub const MESSAGE_ID: &str = "hoistRegex";

pub const MESSAGE: &str = "Regex literals should be hoisted to the top level.";

/// Default base name for hoisted constants.
pub const DEFAULT_BASE_NAME: &str = "REGEX";

// ============================================================================
// Wrapper predicate
// ============================================================================

/// Recognizes a top-level statement that wraps a declaration, such as
/// `export const X = ...`.
///
/// A declaration inside one wrapper level directly under the program counts
/// as top level.
pub trait WrapperPredicate: fmt::Debug + Send + Sync {
    /// The declaration wrapped by `node`, if `node` is a wrapper.
    fn wrapped_declaration(&self, ast: &Ast, node: NodeId) -> Option<NodeId>;
}

/// `export <declaration>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportNamedWrapper;

impl WrapperPredicate for ExportNamedWrapper {
    fn wrapped_declaration(&self, ast: &Ast, node: NodeId) -> Option<NodeId> {
        match ast.kind(node) {
            NodeKind::ExportNamedDeclaration {
                declaration: Some(declaration),
                ..
            } => Some(*declaration),
            _ => None,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Options for [`HoistRegex`].
#[derive(Debug)]
pub struct HoistOptions {
    /// First candidate name; collisions get `_1`, `_2`, ... appended.
    pub base_name: String,
    pub wrapper: Box<dyn WrapperPredicate>,
}

impl Default for HoistOptions {
    fn default() -> Self {
        HoistOptions {
            base_name: DEFAULT_BASE_NAME.to_string(),
            wrapper: Box::new(ExportNamedWrapper),
        }
    }
}

impl HoistOptions {
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn with_wrapper(mut self, wrapper: impl WrapperPredicate + 'static) -> Self {
        self.wrapper = Box::new(wrapper);
        self
    }

    /// Check that `base_name` can be declared as a constant.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_js_identifier(&self.base_name)
    }
}

// ============================================================================
// Hoist status
// ============================================================================

/// Returns true if `literal` initializes a `const` declared at top level.
///
/// The declarator must be the literal's parent, its declaration must be
/// `const`, and the declaration must sit directly in the program or inside
/// one wrapper that does. A missing parent anywhere means "not hoisted".
pub fn is_hoisted(ast: &Ast, literal: NodeId, wrapper: &dyn WrapperPredicate) -> bool {
    let Some(declarator) = ast.parent(literal) else {
        return false;
    };
    if !matches!(
        ast.kind(declarator),
        NodeKind::VariableDeclarator { init: Some(init), .. } if *init == literal
    ) {
        return false;
    }

    let Some(declaration) = ast.parent(declarator) else {
        return false;
    };
    if !matches!(
        ast.kind(declaration),
        NodeKind::VariableDeclaration {
            kind: DeclKind::Const,
            ..
        }
    ) {
        return false;
    }

    let Some(container) = ast.parent(declaration) else {
        return false;
    };
    if is_program(ast, container) {
        return true;
    }
    wrapper.wrapped_declaration(ast, container) == Some(declaration)
        && ast.parent(container).is_some_and(|p| is_program(ast, p))
}

fn is_program(ast: &Ast, id: NodeId) -> bool {
    matches!(ast.kind(id), NodeKind::Program { .. })
}

// ============================================================================
// Name allocation
// ============================================================================

/// Snapshot of the names a hoisted constant must not collide with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameScope {
    module_bindings: HashSet<String>,
    occurrence_bindings: HashSet<String>,
    occurrence_references: HashSet<String>,
}

impl NameScope {
    pub fn new<'a>(
        module_bindings: impl IntoIterator<Item = &'a str>,
        occurrence_bindings: impl IntoIterator<Item = &'a str>,
        occurrence_references: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        NameScope {
            module_bindings: module_bindings.into_iter().map(str::to_string).collect(),
            occurrence_bindings: occurrence_bindings.into_iter().map(str::to_string).collect(),
            occurrence_references: occurrence_references
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Names visible from `occurrence`: its own bindings and references, plus
    /// the bindings of its module (or global) scope.
    pub fn from_scope_tree(scopes: &ScopeTree, occurrence: ScopeId) -> Self {
        let module = scopes.scope(scopes.module_scope(occurrence));
        let scope = scopes.scope(occurrence);
        NameScope::new(
            module.binding_names(),
            scope.binding_names(),
            scope.reference_names(),
        )
    }

    /// Returns true if declaring `name` could collide with an existing name.
    pub fn is_taken(&self, name: &str) -> bool {
        self.module_bindings.contains(name)
            || self.occurrence_references.contains(name)
            || self.occurrence_bindings.contains(name)
    }
}

/// First free name among `base`, `base_1`, `base_2`, ...
///
/// Always terminates: a scope snapshot holds finitely many names.
pub fn allocate_name(base: &str, names: &NameScope) -> String {
    if !names.is_taken(base) {
        return base.to_string();
    }
    let mut count: u32 = 1;
    loop {
        let candidate = format!("{}_{}", base, count);
        if !names.is_taken(&candidate) {
            return candidate;
        }
        count += 1;
    }
}

// ============================================================================
// Insertion point
// ============================================================================

/// Byte offset where a new hoisted constant goes.
///
/// After the last top-level `const` (bare or wrapped) with a regex literal
/// initializer; otherwise after the last `import`; otherwise after the file
/// header (a byte order mark and a `#!` line), which must stay first.
pub fn find_insertion_point(ast: &Ast, wrapper: &dyn WrapperPredicate) -> usize {
    let body = ast.program_body();
    if let Some(last_regex_const) = body
        .iter()
        .rev()
        .find(|stmt| declares_regex_constant(ast, **stmt, wrapper))
    {
        return ast.span(*last_regex_const).end;
    }
    body.iter()
        .rev()
        .find(|stmt| matches!(ast.kind(**stmt), NodeKind::ImportDeclaration { .. }))
        .map(|import| ast.span(*import).end)
        .unwrap_or_else(|| ast.header_end())
}

fn declares_regex_constant(ast: &Ast, statement: NodeId, wrapper: &dyn WrapperPredicate) -> bool {
    let declaration = match ast.kind(statement) {
        NodeKind::VariableDeclaration { .. } => statement,
        _ => match wrapper.wrapped_declaration(ast, statement) {
            Some(inner) => inner,
            None => return false,
        },
    };
    let NodeKind::VariableDeclaration {
        kind: DeclKind::Const,
        declarations,
    } = ast.kind(declaration)
    else {
        return false;
    };
    declarations.iter().any(|declarator| {
        matches!(
            ast.kind(*declarator),
            NodeKind::VariableDeclarator { init: Some(init), .. } if ast.kind(*init).is_regex_literal()
        )
    })
}

// ============================================================================
// Fix
// ============================================================================

/// The two edits that hoist one literal.
pub fn hoist_fix(insert_at: usize, name: &str, literal_text: &str, literal_span: Span) -> Fix {
    Fix::new(vec![
        Edit::insert(insert_at, format!("\nconst {} = {};", name, literal_text)),
        Edit::replace(literal_span, name),
    ])
}

// ============================================================================
// Rule
// ============================================================================

/// The hoist-regex rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoistRegex;

impl HoistRegex {
    /// Report every regex literal that is not hoisted, each with its fix.
    ///
    /// Diagnostics come out in source order. Each fix is computed against
    /// `ast` alone, independently of the others.
    pub fn check(ast: &Ast, scopes: &ScopeTree, options: &HoistOptions) -> Vec<Diagnostic> {
        let wrapper = options.wrapper.as_ref();
        let mut insertion_point = None;
        let mut diagnostics = Vec::new();

        for literal in RegexLiteralCollector::collect(ast) {
            if is_hoisted(ast, literal.node, wrapper) {
                trace!(literal = %literal.text, "already hoisted");
                continue;
            }

            let occurrence = scopes.scope_of(ast, literal.node);
            let names = NameScope::from_scope_tree(scopes, occurrence);
            let name = allocate_name(&options.base_name, &names);
            let insert_at =
                *insertion_point.get_or_insert_with(|| find_insertion_point(ast, wrapper));
            debug!(
                literal = %literal.text,
                span = %literal.span,
                name = %name,
                insert_at,
                "regex literal not hoisted"
            );

            let fix = hoist_fix(insert_at, &name, &literal.text, literal.span);
            diagnostics.push(
                Diagnostic::new(ast.source(), RULE_NAME, MESSAGE_ID, MESSAGE, literal.span)
                    .with_fix(fix),
            );
        }
        diagnostics
    }
}
