// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! ScopeCollector visitor for JavaScript scope analysis.
//!
//! This module provides a [`ScopeCollector`] visitor that traverses an [`Ast`]
//! and builds a [`ScopeTree`]: every scope with its kind, parent, bindings and
//! the references made directly inside it.
//!
//! # JavaScript Scoping Rules
//!
//! - **Global**: the top level of every file
//! - **Module**: child of the global scope for module sources; top-level
//!   declarations of a module live here
//! - **Function**: functions, function expressions and arrows (parameters
//!   and the body share this scope)
//! - **Block**, **Catch**, **For**, **Switch**: lexical scopes for `let`,
//!   `const` and `class`
//! - **Class** and **ClassStaticBlock**: class bodies
//! - **TsModule**: the body of a TypeScript `namespace` or `module`
//!
//! `var` declarations are hoisted to the nearest function, static block,
//! namespace, module or global scope. Function, class, type, interface, enum
//! and namespace declarations bind in the scope they appear in. The names of function and class *expressions* bind inside
//! their own scope.
//!
//! # Usage
//!
//! ```
//! use rehoist_js::nodes::SourceType;
//! use rehoist_js::parser::parse;
//! use rehoist_js::visitor::{ScopeKind, ScopeTree};
//!
//! let ast = parse("let a = 1; function f(b) { return a + b; }", SourceType::Auto).unwrap();
//! let scopes = ScopeTree::build(&ast);
//! let root = scopes.scope(scopes.root());
//! assert_eq!(root.kind, ScopeKind::Global);
//! assert!(root.has_binding("a"));
//! assert!(root.has_binding("f"));
//! ```

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::dispatch::walk_program;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Ast, DeclKind, NodeId, NodeKind, SourceType, TsDeclarationKind};

/// Index of a scope in its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// The kind of a JavaScript scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    Block,
    Catch,
    Class,
    ClassStaticBlock,
    For,
    Switch,
    TsModule,
}

impl ScopeKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::Catch => "catch",
            ScopeKind::Class => "class",
            ScopeKind::ClassStaticBlock => "class-static-block",
            ScopeKind::For => "for",
            ScopeKind::Switch => "switch",
            ScopeKind::TsModule => "ts-module",
        }
    }

    /// Scopes that receive hoisted `var` declarations.
    fn is_var_scope(&self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::ClassStaticBlock
                | ScopeKind::TsModule
        )
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Import,
    CatchParameter,
    /// A TypeScript type alias or interface.
    Type,
    Enum,
    Namespace,
    /// The implicit `arguments` object of a non-arrow function.
    ImplicitArguments,
}

impl From<DeclKind> for BindingKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Var => BindingKind::Var,
            DeclKind::Let => BindingKind::Let,
            DeclKind::Const => BindingKind::Const,
        }
    }
}

/// A name declared in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    /// The binding identifier; `None` for implicit bindings.
    pub node: Option<NodeId>,
}

/// An identifier used in expression position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub node: NodeId,
    /// Assignment target, update operand or initialized declarator.
    pub is_write: bool,
}

/// One scope of the tree.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// The node that created this scope.
    pub node: NodeId,
    pub parent: Option<ScopeId>,
    pub bindings: Vec<Binding>,
    /// References occurring directly in this scope (not in child scopes).
    pub references: Vec<Reference>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, node: NodeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            node,
            parent,
            bindings: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Returns true if `name` is declared in this scope.
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Returns true if `name` is referenced directly in this scope.
    pub fn has_reference(&self, name: &str) -> bool {
        self.references.iter().any(|r| r.name == name)
    }

    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    pub fn reference_names(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.name.as_str())
    }
}

/// All scopes of one program.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    /// Innermost scope created by each scope-creating node.
    by_node: HashMap<NodeId, ScopeId>,
}

impl ScopeTree {
    /// Analyze `ast`.
    pub fn build(ast: &Ast) -> ScopeTree {
        ScopeCollector::collect(ast)
    }

    /// The global scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The innermost scope created by `node`, if it creates one.
    pub fn scope_for_node(&self, node: NodeId) -> Option<ScopeId> {
        self.by_node.get(&node).copied()
    }

    /// The innermost scope enclosing `node`.
    pub fn scope_of(&self, ast: &Ast, node: NodeId) -> ScopeId {
        std::iter::once(node)
            .chain(ast.ancestors(node))
            .find_map(|n| self.scope_for_node(n))
            .unwrap_or_else(|| self.root())
    }

    /// `scope` followed by its ancestors, innermost first.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&s| self.scope(s).parent)
    }

    /// Walk up from `scope` to the first module or global scope.
    ///
    /// Stops at the outermost scope if neither kind is found.
    pub fn module_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let info = self.scope(current);
            if matches!(info.kind, ScopeKind::Module | ScopeKind::Global) {
                return current;
            }
            match info.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}

/// How an identifier is used, judged from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRole {
    /// Reads or writes a variable.
    Reference { is_write: bool },
    /// Property names, labels and other non-variable names.
    NotAReference,
}

/// Classify an identifier that is not a binding site.
pub fn identifier_role(ast: &Ast, id: NodeId) -> IdentifierRole {
    let Some(parent) = ast.parent(id) else {
        return IdentifierRole::Reference { is_write: false };
    };

    let not_a_reference = match ast.kind(parent) {
        NodeKind::MemberExpression {
            property, computed, ..
        } => *property == id && !computed,
        NodeKind::Property {
            key,
            computed,
            shorthand,
            ..
        } => *key == id && !computed && !shorthand,
        NodeKind::MethodDefinition { key, computed, .. }
        | NodeKind::PropertyDefinition { key, computed, .. } => *key == id && !computed,
        NodeKind::LabeledStatement { label, .. } => *label == id,
        NodeKind::TsEnumMember { id: member, .. } => *member == id,
        NodeKind::BreakStatement { .. }
        | NodeKind::ContinueStatement { .. }
        | NodeKind::MetaProperty { .. }
        | NodeKind::ExportAllDeclaration { .. } => true,
        NodeKind::ImportSpecifier { imported, local } => *imported == id && imported != local,
        NodeKind::ExportSpecifier { local, exported } => {
            let reexport = ast.parent(parent).is_some_and(|decl| {
                matches!(
                    ast.kind(decl),
                    NodeKind::ExportNamedDeclaration {
                        source: Some(_),
                        ..
                    }
                )
            });
            reexport || (*exported == id && exported != local)
        }
        _ => false,
    };
    if not_a_reference {
        return IdentifierRole::NotAReference;
    }

    IdentifierRole::Reference {
        is_write: is_assignment_target(ast, id),
    }
}

/// Climb through destructuring patterns to see whether `id` is assigned.
fn is_assignment_target(ast: &Ast, id: NodeId) -> bool {
    let mut child = id;
    while let Some(parent) = ast.parent(child) {
        match ast.kind(parent) {
            NodeKind::AssignmentExpression { left, .. } => return *left == child,
            NodeKind::UpdateExpression { .. } => return true,
            NodeKind::ForInStatement { left, .. } | NodeKind::ForOfStatement { left, .. } => {
                return *left == child
            }
            NodeKind::ArrayPattern { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::RestElement { .. }
            | NodeKind::TsExpression { .. } => {}
            NodeKind::AssignmentPattern { left, .. } if *left == child => {}
            NodeKind::Property { value, .. }
                if *value == child
                    && ast
                        .parent(parent)
                        .is_some_and(|p| matches!(ast.kind(p), NodeKind::ObjectPattern { .. })) => {}
            _ => return false,
        }
        child = parent;
    }
    false
}

/// Identifiers bound by a declaration pattern, in source order.
///
/// Default values and computed keys are expressions and are not included.
pub fn bound_identifiers(ast: &Ast, pattern: NodeId) -> Vec<NodeId> {
    fn collect(ast: &Ast, id: NodeId, out: &mut Vec<NodeId>) {
        match ast.kind(id) {
            NodeKind::Identifier { .. } => out.push(id),
            NodeKind::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    collect(ast, *element, out);
                }
            }
            NodeKind::ObjectPattern { properties } => {
                for property in properties {
                    collect(ast, *property, out);
                }
            }
            NodeKind::Property { value, .. } => collect(ast, *value, out),
            NodeKind::AssignmentPattern { left, .. } => collect(ast, *left, out),
            NodeKind::RestElement { argument } => collect(ast, *argument, out),
            _ => {}
        }
    }

    let mut out = Vec::new();
    collect(ast, pattern, &mut out);
    out
}

/// A visitor that builds a [`ScopeTree`].
///
/// Bindings are recorded when their declaration is visited, before the
/// walker reaches the binding identifiers themselves; those identifiers are
/// then skipped when references are collected.
#[derive(Debug, Default)]
pub struct ScopeCollector {
    scopes: Vec<Scope>,
    by_node: HashMap<NodeId, ScopeId>,
    /// Stack of open scopes, innermost last.
    stack: Vec<ScopeId>,
    /// Binding kind and target scope of the enclosing variable declarations.
    declarations: Vec<(BindingKind, ScopeId)>,
    /// Identifiers already recorded as bindings.
    binding_sites: HashSet<NodeId>,
}

impl ScopeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the scope tree of `ast`.
    pub fn collect(ast: &Ast) -> ScopeTree {
        let mut collector = ScopeCollector::new();
        walk_program(&mut collector, ast);
        trace!(scopes = collector.scopes.len(), "collected scopes");
        collector.into_tree()
    }

    pub fn into_tree(self) -> ScopeTree {
        ScopeTree {
            scopes: self.scopes,
            by_node: self.by_node,
        }
    }

    fn enter_scope(&mut self, kind: ScopeKind, node: NodeId) {
        let id = ScopeId(self.scopes.len());
        let parent = self.stack.last().copied();
        self.scopes.push(Scope::new(id, kind, node, parent));
        self.by_node.insert(node, id);
        self.stack.push(id);
    }

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    /// Nearest scope that receives `var` declarations.
    fn var_scope(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|s| self.scopes[s.0].kind.is_var_scope())
            .unwrap_or(ScopeId(0))
    }

    fn declare(&mut self, ast: &Ast, scope: ScopeId, identifier: NodeId, kind: BindingKind) {
        let Some(name) = ast.identifier_name(identifier) else {
            return;
        };
        self.binding_sites.insert(identifier);
        self.scopes[scope.0].bindings.push(Binding {
            name: name.to_string(),
            kind,
            node: Some(identifier),
        });
    }

    fn declare_pattern(&mut self, ast: &Ast, scope: ScopeId, pattern: NodeId, kind: BindingKind) {
        for identifier in bound_identifiers(ast, pattern) {
            self.declare(ast, scope, identifier, kind);
        }
    }

    fn declare_implicit_arguments(&mut self) {
        let scope = self.current();
        self.scopes[scope.0].bindings.push(Binding {
            name: "arguments".to_string(),
            kind: BindingKind::ImplicitArguments,
            node: None,
        });
    }

    fn add_reference(&mut self, ast: &Ast, identifier: NodeId, is_write: bool) {
        let Some(name) = ast.identifier_name(identifier) else {
            return;
        };
        let scope = self.current();
        self.scopes[scope.0].references.push(Reference {
            name: name.to_string(),
            node: identifier,
            is_write,
        });
    }
}

impl Visitor for ScopeCollector {
    fn visit_program(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        self.enter_scope(ScopeKind::Global, id);
        if ast.source_type() == SourceType::Module {
            self.enter_scope(ScopeKind::Module, id);
        }
        VisitResult::Continue
    }

    fn visit_function(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        match ast.kind(id) {
            NodeKind::FunctionDeclaration(function) => {
                if let Some(name) = function.id {
                    self.declare(ast, self.current(), name, BindingKind::Function);
                }
                self.enter_scope(ScopeKind::Function, id);
                self.declare_implicit_arguments();
                for param in &function.params {
                    self.declare_pattern(ast, self.current(), *param, BindingKind::Parameter);
                }
            }
            NodeKind::FunctionExpression(function) => {
                self.enter_scope(ScopeKind::Function, id);
                if let Some(name) = function.id {
                    self.declare(ast, self.current(), name, BindingKind::Function);
                }
                self.declare_implicit_arguments();
                for param in &function.params {
                    self.declare_pattern(ast, self.current(), *param, BindingKind::Parameter);
                }
            }
            NodeKind::ArrowFunctionExpression { params, .. } => {
                self.enter_scope(ScopeKind::Function, id);
                for param in params {
                    self.declare_pattern(ast, self.current(), *param, BindingKind::Parameter);
                }
            }
            _ => {}
        }
        VisitResult::Continue
    }

    fn visit_class(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        match ast.kind(id) {
            NodeKind::ClassDeclaration(class) => {
                if let Some(name) = class.id {
                    self.declare(ast, self.current(), name, BindingKind::Class);
                }
                self.enter_scope(ScopeKind::Class, id);
            }
            NodeKind::ClassExpression(class) => {
                self.enter_scope(ScopeKind::Class, id);
                if let Some(name) = class.id {
                    self.declare(ast, self.current(), name, BindingKind::Class);
                }
            }
            _ => {}
        }
        VisitResult::Continue
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        match ast.kind(id) {
            NodeKind::StaticBlock { .. } => self.enter_scope(ScopeKind::ClassStaticBlock, id),
            NodeKind::TsModuleBlock { .. } => self.enter_scope(ScopeKind::TsModule, id),
            _ => {
                // A function body shares the function's scope.
                let is_function_body = ast.parent(id).is_some_and(|p| match ast.kind(p) {
                    NodeKind::FunctionDeclaration(f) | NodeKind::FunctionExpression(f) => {
                        f.body == id
                    }
                    NodeKind::ArrowFunctionExpression { body, .. } => *body == id,
                    _ => false,
                });
                if !is_function_body {
                    self.enter_scope(ScopeKind::Block, id);
                }
            }
        }
        VisitResult::Continue
    }

    fn visit_catch_clause(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        self.enter_scope(ScopeKind::Catch, id);
        if let NodeKind::CatchClause {
            param: Some(param), ..
        } = ast.kind(id)
        {
            self.declare_pattern(ast, self.current(), *param, BindingKind::CatchParameter);
        }
        VisitResult::Continue
    }

    fn visit_for(&mut self, _ast: &Ast, id: NodeId) -> VisitResult {
        self.enter_scope(ScopeKind::For, id);
        VisitResult::Continue
    }

    fn visit_switch(&mut self, _ast: &Ast, id: NodeId) -> VisitResult {
        self.enter_scope(ScopeKind::Switch, id);
        VisitResult::Continue
    }

    fn visit_variable_declaration(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        if let NodeKind::VariableDeclaration { kind, .. } = ast.kind(id) {
            let scope = match kind {
                DeclKind::Var => self.var_scope(),
                DeclKind::Let | DeclKind::Const => self.current(),
            };
            self.declarations.push(((*kind).into(), scope));
        }
        VisitResult::Continue
    }

    fn leave_variable_declaration(&mut self, _ast: &Ast, _id: NodeId) {
        self.declarations.pop();
    }

    fn visit_variable_declarator(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        let NodeKind::VariableDeclarator { id: pattern, init } = ast.kind(id) else {
            return VisitResult::Continue;
        };
        let (kind, scope) = self
            .declarations
            .last()
            .copied()
            .unwrap_or((BindingKind::Var, self.var_scope()));
        let identifiers = bound_identifiers(ast, *pattern);
        for identifier in &identifiers {
            self.declare(ast, scope, *identifier, kind);
        }
        if init.is_some() {
            for identifier in identifiers {
                self.add_reference(ast, identifier, true);
            }
        }
        VisitResult::Continue
    }

    fn visit_import_declaration(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        let NodeKind::ImportDeclaration { specifiers, .. } = ast.kind(id) else {
            return VisitResult::Continue;
        };
        let scope = self.current();
        for specifier in specifiers {
            let local = match ast.kind(*specifier) {
                NodeKind::ImportSpecifier { local, .. }
                | NodeKind::ImportDefaultSpecifier { local }
                | NodeKind::ImportNamespaceSpecifier { local } => *local,
                _ => continue,
            };
            self.declare(ast, scope, local, BindingKind::Import);
        }
        VisitResult::Continue
    }

    fn visit_ts_declaration(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        let (name, kind) = match ast.kind(id) {
            NodeKind::TsTypeDeclaration {
                kind: TsDeclarationKind::FunctionSignature,
                id: name,
            } => (*name, BindingKind::Function),
            NodeKind::TsTypeDeclaration { id: name, .. } => (*name, BindingKind::Type),
            NodeKind::TsEnumDeclaration { id: name, .. } => (*name, BindingKind::Enum),
            NodeKind::TsModuleDeclaration { id: name, .. } => (*name, BindingKind::Namespace),
            _ => return VisitResult::Continue,
        };
        // `module "m"` names no binding; `declare` skips non-identifiers.
        self.declare(ast, self.current(), name, kind);
        VisitResult::Continue
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId) -> VisitResult {
        if self.binding_sites.contains(&id) {
            return VisitResult::Continue;
        }
        if let IdentifierRole::Reference { is_write } = identifier_role(ast, id) {
            self.add_reference(ast, id, is_write);
        }
        VisitResult::Continue
    }

    fn leave_node(&mut self, _ast: &Ast, id: NodeId) {
        while let Some(top) = self.stack.last() {
            if self.scopes[top.0].node != id {
                break;
            }
            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_with, Dialect, ParseOptions};

    fn build(source: &str) -> (Ast, ScopeTree) {
        let ast = parse(source, SourceType::Auto).unwrap();
        let scopes = ScopeTree::build(&ast);
        (ast, scopes)
    }

    fn names(iter: impl Iterator<Item = impl AsRef<str>>) -> Vec<String> {
        iter.map(|s| s.as_ref().to_string()).collect()
    }

    fn find_kind(scopes: &ScopeTree, kind: ScopeKind) -> &Scope {
        scopes
            .scopes()
            .iter()
            .find(|s| s.kind == kind)
            .unwrap_or_else(|| panic!("no {} scope", kind))
    }

    #[test]
    fn test_script_has_only_global_scope() {
        let (_, scopes) = build("const a = 1;");
        assert_eq!(scopes.len(), 1);
        let root = scopes.scope(scopes.root());
        assert_eq!(root.kind, ScopeKind::Global);
        assert_eq!(names(root.binding_names()), vec!["a"]);
        assert_eq!(root.bindings[0].kind, BindingKind::Const);
    }

    #[test]
    fn test_module_scope_holds_top_level_bindings() {
        let (_, scopes) = build("import x, { y as z } from 'm';\nconst a = 1;");
        assert_eq!(scopes.len(), 2);
        assert!(scopes.scope(scopes.root()).bindings.is_empty());
        let module = find_kind(&scopes, ScopeKind::Module);
        assert_eq!(module.parent, Some(scopes.root()));
        assert_eq!(names(module.binding_names()), vec!["x", "z", "a"]);
        assert!(!module.has_reference("y"));
    }

    #[test]
    fn test_function_scope() {
        let (_, scopes) = build("function f(a, { b }, ...c) { var d; let e; return arguments; }");
        let root = scopes.scope(scopes.root());
        assert_eq!(names(root.binding_names()), vec!["f"]);
        let function = find_kind(&scopes, ScopeKind::Function);
        assert_eq!(
            names(function.binding_names()),
            vec!["arguments", "a", "b", "c", "d", "e"]
        );
        assert!(function.has_reference("arguments"));
        // The body block shares the function scope.
        assert!(scopes.scopes().iter().all(|s| s.kind != ScopeKind::Block));
    }

    #[test]
    fn test_arrow_has_no_arguments() {
        let (_, scopes) = build("const g = (x) => x;");
        let function = find_kind(&scopes, ScopeKind::Function);
        assert_eq!(names(function.binding_names()), vec!["x"]);
        assert!(function.has_reference("x"));
    }

    #[test]
    fn test_var_hoists_out_of_blocks() {
        let (_, scopes) = build("{ let a; var b; }");
        let root = scopes.scope(scopes.root());
        assert_eq!(names(root.binding_names()), vec!["b"]);
        let block = find_kind(&scopes, ScopeKind::Block);
        assert_eq!(names(block.binding_names()), vec!["a"]);
    }

    #[test]
    fn test_catch_and_for_scopes() {
        let (_, scopes) = build("try {} catch (e) {}\nfor (let i = 0; i < 1; i++) {}");
        let catch = find_kind(&scopes, ScopeKind::Catch);
        assert_eq!(names(catch.binding_names()), vec!["e"]);
        let for_scope = find_kind(&scopes, ScopeKind::For);
        assert_eq!(names(for_scope.binding_names()), vec!["i"]);
        let writes: Vec<bool> = for_scope.references.iter().map(|r| r.is_write).collect();
        // `i = 0` (initializer), `i < 1`, `i++`.
        assert_eq!(writes, vec![true, false, true]);
    }

    #[test]
    fn test_reference_roles() {
        let (_, scopes) = build("a = b;\nc.d;\ne[f];\n({ g: h, i });\nlabel: for (;;) break label;\nnew.target;");
        let root = scopes.scope(scopes.root());
        let refs: Vec<(String, bool)> = root
            .references
            .iter()
            .map(|r| (r.name.clone(), r.is_write))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("a".to_string(), true),
                ("b".to_string(), false),
                ("c".to_string(), false),
                ("e".to_string(), false),
                ("f".to_string(), false),
                ("h".to_string(), false),
                ("i".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_destructuring_assignment_writes() {
        let (_, scopes) = build("[a, { b: c = 1 }, ...d] = x;");
        let root = scopes.scope(scopes.root());
        let writes: Vec<&str> = root
            .references
            .iter()
            .filter(|r| r.is_write)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(writes, vec!["a", "c", "d"]);
        assert!(root.has_reference("x"));
        assert!(!root.has_reference("b"));
    }

    #[test]
    fn test_initialized_declarator_writes_reference() {
        let (_, scopes) = build("const r = 1;\nlet s;");
        let root = scopes.scope(scopes.root());
        assert_eq!(root.references.len(), 1);
        assert_eq!(root.references[0].name, "r");
        assert!(root.references[0].is_write);
    }

    #[test]
    fn test_function_and_class_expression_names() {
        let (_, scopes) = build("const f = function g() {};\nconst K = class L {};\nclass M {}");
        let root = scopes.scope(scopes.root());
        assert_eq!(names(root.binding_names()), vec!["f", "K", "M"]);
        let function = find_kind(&scopes, ScopeKind::Function);
        assert!(function.has_binding("g"));
        let classes: Vec<&Scope> = scopes
            .scopes()
            .iter()
            .filter(|s| s.kind == ScopeKind::Class)
            .collect();
        assert_eq!(classes.len(), 2);
        assert!(classes[0].has_binding("L"));
        assert!(classes[1].bindings.is_empty());
    }

    #[test]
    fn test_export_specifiers() {
        let (_, scopes) = build("const a = 1;\nexport { a as b };\nexport { c } from 'm';");
        let module = find_kind(&scopes, ScopeKind::Module);
        assert!(module.has_reference("a"));
        assert!(!module.has_reference("b"));
        assert!(!module.has_reference("c"));
    }

    #[test]
    fn test_scope_of_and_module_scope() {
        let (ast, scopes) =
            build("export function f() {\n  if (x) {\n    return () => /a/;\n  }\n}");
        let regex = ast
            .iter()
            .find(|(_, node)| node.kind.is_regex_literal())
            .map(|(id, _)| id)
            .unwrap();
        let scope = scopes.scope_of(&ast, regex);
        assert_eq!(scopes.scope(scope).kind, ScopeKind::Function);
        let kinds: Vec<ScopeKind> = scopes
            .chain(scope)
            .map(|s| scopes.scope(s).kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ScopeKind::Function,
                ScopeKind::Block,
                ScopeKind::Function,
                ScopeKind::Module,
                ScopeKind::Global,
            ]
        );
        let module = scopes.module_scope(scope);
        assert_eq!(scopes.scope(module).kind, ScopeKind::Module);
        assert!(scopes.scope(module).has_binding("f"));
    }

    #[test]
    fn test_typescript_declarations() {
        let source = "type T = string;\ninterface I { a: T }\nenum E { A, B = 2 }\nnamespace N {\n  var v = 1;\n  export const w = v;\n}\ndeclare function d(x: number): void;\nlet y = (z as any)!;\n(q as any) = 1;";
        let ast = parse_with(
            source,
            ParseOptions {
                source_type: SourceType::Auto,
                dialect: Dialect::TypeScript,
            },
        )
        .unwrap();
        let scopes = ScopeTree::build(&ast);
        let root = scopes.scope(scopes.root());
        let kinds: Vec<(String, BindingKind)> = root
            .bindings
            .iter()
            .map(|b| (b.name.clone(), b.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("T".to_string(), BindingKind::Type),
                ("I".to_string(), BindingKind::Type),
                ("E".to_string(), BindingKind::Enum),
                ("N".to_string(), BindingKind::Namespace),
                ("d".to_string(), BindingKind::Function),
                ("y".to_string(), BindingKind::Let),
            ]
        );
        // Enum members and type references are not variable references.
        assert!(!root.has_reference("A"));
        assert!(!root.has_reference("B"));
        assert!(root.has_reference("z"));
        assert!(root
            .references
            .iter()
            .any(|r| r.name == "q" && r.is_write));

        let namespace = find_kind(&scopes, ScopeKind::TsModule);
        assert_eq!(names(namespace.binding_names()), vec!["v", "w"]);
        assert!(namespace.has_reference("v"));
    }

    #[test]
    fn test_identifier_role() {
        let ast = parse("o.p = q;", SourceType::Auto).unwrap();
        let roles: Vec<(String, IdentifierRole)> = ast
            .iter()
            .filter_map(|(id, _)| {
                ast.identifier_name(id)
                    .map(|name| (name.to_string(), identifier_role(&ast, id)))
            })
            .collect();
        assert!(roles.contains(&("o".to_string(), IdentifierRole::Reference { is_write: false })));
        assert!(roles.contains(&("p".to_string(), IdentifierRole::NotAReference)));
        assert!(roles.contains(&("q".to_string(), IdentifierRole::Reference { is_write: false })));
    }
}
