// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lowering from the tree-sitter concrete syntax tree to the arena [`Ast`].
//!
//! Grammar kinds map onto ESTree shapes. Punctuation, comments and type
//! annotations are dropped, and parentheses disappear the way they do in
//! ESTree. Kinds without a dedicated shape become [`NodeKind::Syntax`] with
//! their runtime children lowered, so regex literals and identifiers inside
//! JSX or ambient declarations are still seen by the visitors.
//!
//! Lowering recurses once per tree level. The caller rejects trees deeper
//! than [`super::MAX_NESTING_DEPTH`] before lowering starts.

use std::mem;

use rehoist_core::patch::Span;
use tree_sitter::Node;

use super::errors::{ParseResult, ParserError};
use super::is_module_item;
use crate::nodes::{
    Ast, Class, DeclKind, Function, LiteralValue, Node as ArenaNode, NodeId, NodeKind,
    PropertyKind, SourceType, TsDeclarationKind, TsExpressionKind,
};

/// Lower a `program` node.
pub(super) fn lower_program(
    source: &str,
    root: Node<'_>,
    source_type: SourceType,
) -> ParseResult<Ast> {
    let mut lowerer = Lowerer {
        source,
        nodes: Vec::new(),
    };
    let root = lowerer.program(root, source_type)?;
    Ok(Ast::new(source, lowerer.nodes, root))
}

// ============================================================================
// Tree helpers
// ============================================================================

fn node_span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn malformed(node: Node<'_>) -> ParserError {
    ParserError::syntax(format!("malformed `{}`", node.kind()), node_span(node))
}

/// Type annotations and other syntax with no runtime meaning.
fn is_type_syntax(kind: &str) -> bool {
    kind.ends_with("_type")
        || kind.ends_with("_annotation")
        || matches!(
            kind,
            "type_arguments"
                | "type_parameters"
                | "type_parameter"
                | "type_identifier"
                | "nested_type_identifier"
                | "type_predicate"
                | "type_query"
                | "asserts"
                | "implements_clause"
                | "accessibility_modifier"
                | "override_modifier"
                | "index_signature"
                | "method_signature"
                | "property_signature"
                | "call_signature"
                | "construct_signature"
                | "abstract_method_signature"
        )
}

/// Every child except comments.
fn all_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).filter(|c| !c.is_extra()).collect();
    children
}

/// Named children except comments and type syntax.
fn runtime_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|c| !c.is_extra() && !is_type_syntax(c.kind()))
        .collect();
    children
}

fn first_runtime_child(node: Node<'_>) -> ParseResult<Node<'_>> {
    runtime_children(node)
        .into_iter()
        .next()
        .ok_or_else(|| malformed(node))
}

fn field<'t>(node: Node<'t>, name: &str) -> ParseResult<Node<'t>> {
    node.child_by_field_name(name)
        .ok_or_else(|| malformed(node))
}

/// Returns true if `node` has the anonymous token `token` as a direct child.
fn has_token(node: Node<'_>, token: &str) -> bool {
    all_children(node)
        .iter()
        .any(|c| !c.is_named() && c.kind() == token)
}

// ============================================================================
// Lowerer
// ============================================================================

struct Lowerer<'src> {
    source: &'src str,
    nodes: Vec<ArenaNode>,
}

impl<'src> Lowerer<'src> {
    fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            kind,
            span,
            parent: None,
        });
        id
    }

    fn text(&self, node: Node<'_>) -> &'src str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn program(&mut self, root: Node<'_>, requested: SourceType) -> ParseResult<NodeId> {
        let mut body = Vec::new();
        for child in runtime_children(root) {
            if child.kind() == "hash_bang_line" {
                continue;
            }
            body.push(self.lower(child)?);
        }

        let has_module_items = body
            .iter()
            .any(|id| is_module_item(&self.nodes[id.0].kind));
        let source_type = match requested {
            SourceType::Auto if has_module_items => SourceType::Module,
            SourceType::Auto => SourceType::Script,
            other => other,
        };
        Ok(self.alloc(
            NodeKind::Program { body, source_type },
            Span::new(0, self.source.len()),
        ))
    }

    /// Lower any statement, declaration or expression.
    ///
    /// Every arm hands off to a helper so this frame stays small: it sits on
    /// the stack once per tree level.
    fn lower(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        match node.kind() {
            // Statements
            "expression_statement" => self.expression_statement(node),
            "variable_declaration" | "lexical_declaration" => self.variable_declaration(node),
            "function_declaration" | "generator_function_declaration" => {
                self.function_declaration(node)
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.class_declaration(node, Vec::new())
            }
            "statement_block" => self.block(node),
            "empty_statement" => self.leaf(node, NodeKind::EmptyStatement),
            "debugger_statement" => self.leaf(node, NodeKind::DebuggerStatement),
            "return_statement" => self.return_statement(node),
            "throw_statement" => self.throw_statement(node),
            "if_statement" => self.if_statement(node),
            "for_statement" => self.for_statement(node),
            "for_in_statement" => self.for_in_statement(node),
            "while_statement" => self.while_statement(node),
            "do_statement" => self.do_statement(node),
            "break_statement" | "continue_statement" => self.jump_statement(node),
            "try_statement" => self.try_statement(node),
            "switch_statement" => self.switch_statement(node),
            "labeled_statement" => self.labeled_statement(node),
            "with_statement" => self.with_statement(node),
            "import_statement" => self.import_statement(node),
            "export_statement" => self.export_statement(node),

            // TypeScript declarations
            "type_alias_declaration" => self.ts_type_declaration(node, TsDeclarationKind::TypeAlias),
            "interface_declaration" => self.ts_type_declaration(node, TsDeclarationKind::Interface),
            "function_signature" => {
                self.ts_type_declaration(node, TsDeclarationKind::FunctionSignature)
            }
            "enum_declaration" => self.ts_enum(node),
            "internal_module" | "module" => self.ts_module(node),

            // Expressions
            "identifier"
            | "undefined"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "statement_identifier"
            | "type_identifier" => self.identifier(node),
            "private_property_identifier" => self.private_identifier(node),
            "this" => self.leaf(node, NodeKind::ThisExpression),
            "super" => self.leaf(node, NodeKind::Super),
            "number" | "string" | "true" | "false" | "null" | "regex" => self.literal(node),
            "template_string" => self.template(node),
            "parenthesized_expression" => self.parenthesized(node),
            "sequence_expression" => self.sequence(node),
            "object" => self.object(node),
            "array" => self.array(node),
            "function_expression" | "function" | "generator_function" => {
                self.function_expression(node)
            }
            "arrow_function" => self.arrow_function(node),
            "class" => self.class_expression(node),
            "call_expression" => self.call(node),
            "new_expression" => self.new_expression(node),
            "member_expression" => self.member(node),
            "subscript_expression" => self.subscript(node),
            "assignment_expression" | "augmented_assignment_expression" => self.assignment(node),
            "binary_expression" => self.binary(node),
            "unary_expression" => self.unary(node),
            "update_expression" => self.update(node),
            "ternary_expression" => self.conditional(node),
            "await_expression" => self.await_expression(node),
            "yield_expression" => self.yield_expression(node),
            "spread_element" => self.spread(node),
            "meta_property" => self.meta_property(node),
            "decorator" => self.decorator(node),
            "as_expression" => self.ts_expression(node, TsExpressionKind::As),
            "satisfies_expression" => self.ts_expression(node, TsExpressionKind::Satisfies),
            "non_null_expression" => self.ts_expression(node, TsExpressionKind::NonNull),
            "type_assertion" => self.ts_expression(node, TsExpressionKind::TypeAssertion),
            "instantiation_expression" => {
                self.ts_expression(node, TsExpressionKind::Instantiation)
            }

            // Patterns reached from expression positions
            "object_pattern" | "array_pattern" | "assignment_pattern" | "rest_pattern" => {
                self.pattern(node)
            }

            _ => self.syntax(node),
        }
    }

    fn lower_opt(&mut self, node: Option<Node<'_>>) -> ParseResult<Option<NodeId>> {
        node.map(|n| self.lower(n)).transpose()
    }

    fn lower_all(&mut self, nodes: Vec<Node<'_>>) -> ParseResult<Vec<NodeId>> {
        nodes.into_iter().map(|n| self.lower(n)).collect()
    }

    fn leaf(&mut self, node: Node<'_>, kind: NodeKind) -> ParseResult<NodeId> {
        Ok(self.alloc(kind, node_span(node)))
    }

    /// Syntax with no dedicated shape.
    fn syntax(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let children = self.lower_all(runtime_children(node))?;
        Ok(self.alloc(
            NodeKind::Syntax {
                kind: node.kind(),
                children,
            },
            node_span(node),
        ))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn expression_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let expression = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::ExpressionStatement { expression }, node_span(node)))
    }

    fn variable_declaration(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let kind = if node.kind() == "variable_declaration" {
            DeclKind::Var
        } else {
            let keyword = node.child_by_field_name("kind").or_else(|| node.child(0));
            match keyword.map(|k| k.kind()) {
                Some("const") => DeclKind::Const,
                // `let`, and `using` which never counts as a constant here.
                _ => DeclKind::Let,
            }
        };

        let mut declarations = Vec::new();
        for child in runtime_children(node) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            let id = self.pattern(field(child, "name")?)?;
            let init = self.lower_opt(child.child_by_field_name("value"))?;
            declarations.push(self.alloc(NodeKind::VariableDeclarator { id, init }, node_span(child)));
        }
        Ok(self.alloc(
            NodeKind::VariableDeclaration { kind, declarations },
            node_span(node),
        ))
    }

    fn block(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let body = self.lower_all(runtime_children(node))?;
        Ok(self.alloc(NodeKind::BlockStatement { body }, node_span(node)))
    }

    fn return_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let argument = self.lower_opt(runtime_children(node).into_iter().next())?;
        Ok(self.alloc(NodeKind::ReturnStatement { argument }, node_span(node)))
    }

    fn throw_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let argument = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::ThrowStatement { argument }, node_span(node)))
    }

    fn if_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let test = self.lower(field(node, "condition")?)?;
        let consequent = self.lower(field(node, "consequence")?)?;
        let alternate = match node.child_by_field_name("alternative") {
            // `else_clause` wraps the statement.
            Some(clause) => Some(self.lower(first_runtime_child(clause)?)?),
            None => None,
        };
        Ok(self.alloc(
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            },
            node_span(node),
        ))
    }

    /// Initializer or condition of a `for` head; `;` alone means none.
    fn for_clause(&mut self, node: Option<Node<'_>>) -> ParseResult<Option<NodeId>> {
        let Some(node) = node else {
            return Ok(None);
        };
        match node.kind() {
            "empty_statement" | ";" => Ok(None),
            "expression_statement" => Ok(Some(self.lower(first_runtime_child(node)?)?)),
            _ => Ok(Some(self.lower(node)?)),
        }
    }

    fn for_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let init = self.for_clause(node.child_by_field_name("initializer"))?;
        let test = self.for_clause(node.child_by_field_name("condition"))?;
        let update = self.lower_opt(node.child_by_field_name("increment"))?;
        let body = self.lower(field(node, "body")?)?;
        Ok(self.alloc(
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            },
            node_span(node),
        ))
    }

    fn for_in_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let left_node = field(node, "left")?;
        let keyword = all_children(node)
            .into_iter()
            .find(|c| !c.is_named() && matches!(c.kind(), "var" | "let" | "const"));

        let left = match keyword {
            Some(keyword) => {
                let kind = match keyword.kind() {
                    "var" => DeclKind::Var,
                    "const" => DeclKind::Const,
                    _ => DeclKind::Let,
                };
                let id = self.pattern(left_node)?;
                let init = self.lower_opt(node.child_by_field_name("value"))?;
                let end = match init {
                    Some(init) => self.nodes[init.0].span.end,
                    None => left_node.end_byte(),
                };
                let declarator = self.alloc(
                    NodeKind::VariableDeclarator { id, init },
                    Span::new(left_node.start_byte(), end),
                );
                self.alloc(
                    NodeKind::VariableDeclaration {
                        kind,
                        declarations: vec![declarator],
                    },
                    Span::new(keyword.start_byte(), end),
                )
            }
            None => self.pattern(left_node)?,
        };
        let right = self.lower(field(node, "right")?)?;
        let body = self.lower(field(node, "body")?)?;

        let kind = if has_token(node, "of") {
            NodeKind::ForOfStatement {
                left,
                right,
                body,
                is_await: has_token(node, "await"),
            }
        } else {
            NodeKind::ForInStatement { left, right, body }
        };
        Ok(self.alloc(kind, node_span(node)))
    }

    fn while_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let test = self.lower(field(node, "condition")?)?;
        let body = self.lower(field(node, "body")?)?;
        Ok(self.alloc(NodeKind::WhileStatement { test, body }, node_span(node)))
    }

    fn do_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let body = self.lower(field(node, "body")?)?;
        let test = self.lower(field(node, "condition")?)?;
        Ok(self.alloc(NodeKind::DoWhileStatement { body, test }, node_span(node)))
    }

    fn jump_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let label = self.lower_opt(node.child_by_field_name("label"))?;
        let kind = if node.kind() == "break_statement" {
            NodeKind::BreakStatement { label }
        } else {
            NodeKind::ContinueStatement { label }
        };
        Ok(self.alloc(kind, node_span(node)))
    }

    fn try_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let block = self.lower(field(node, "body")?)?;
        let handler = match node.child_by_field_name("handler") {
            Some(clause) => {
                let param = match clause.child_by_field_name("parameter") {
                    Some(param) => Some(self.pattern(param)?),
                    None => None,
                };
                let body = self.lower(field(clause, "body")?)?;
                Some(self.alloc(NodeKind::CatchClause { param, body }, node_span(clause)))
            }
            None => None,
        };
        let finalizer = match node.child_by_field_name("finalizer") {
            Some(clause) => Some(self.lower(field(clause, "body")?)?),
            None => None,
        };
        Ok(self.alloc(
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            },
            node_span(node),
        ))
    }

    fn switch_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let discriminant = self.lower(field(node, "value")?)?;
        let mut cases = Vec::new();
        for case in runtime_children(field(node, "body")?) {
            let test_node = case.child_by_field_name("value");
            let test = self.lower_opt(test_node)?;
            let statements: Vec<Node<'_>> = runtime_children(case)
                .into_iter()
                .filter(|c| test_node.map(|t| t.id()) != Some(c.id()))
                .collect();
            let consequent = self.lower_all(statements)?;
            cases.push(self.alloc(NodeKind::SwitchCase { test, consequent }, node_span(case)));
        }
        Ok(self.alloc(
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            },
            node_span(node),
        ))
    }

    fn labeled_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let label = self.lower(field(node, "label")?)?;
        let body = self.lower(field(node, "body")?)?;
        Ok(self.alloc(NodeKind::LabeledStatement { label, body }, node_span(node)))
    }

    fn with_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let object = self.lower(field(node, "object")?)?;
        let body = self.lower(field(node, "body")?)?;
        Ok(self.alloc(NodeKind::WithStatement { object, body }, node_span(node)))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Identifier or string naming an import or export.
    fn module_export_name(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        match node.kind() {
            "string" => self.literal(node),
            _ => self.identifier(node),
        }
    }

    fn import_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let mut specifiers = Vec::new();
        let mut source = node.child_by_field_name("source");
        for child in runtime_children(node) {
            match child.kind() {
                "import_clause" => self.import_clause(child, &mut specifiers)?,
                // TypeScript `import x = require("m")`.
                "import_require_clause" => {
                    if let Some(local) = runtime_children(child)
                        .into_iter()
                        .find(|c| c.kind() == "identifier")
                    {
                        let local = self.identifier(local)?;
                        specifiers.push(self.alloc(
                            NodeKind::ImportDefaultSpecifier { local },
                            node_span(child),
                        ));
                    }
                    source = source.or_else(|| child.child_by_field_name("source"));
                }
                _ => {}
            }
        }
        let Some(source) = source else {
            return self.syntax(node);
        };
        let source = self.literal(source)?;
        Ok(self.alloc(
            NodeKind::ImportDeclaration { specifiers, source },
            node_span(node),
        ))
    }

    fn import_clause(&mut self, clause: Node<'_>, specifiers: &mut Vec<NodeId>) -> ParseResult<()> {
        for child in runtime_children(clause) {
            match child.kind() {
                "identifier" => {
                    let local = self.identifier(child)?;
                    specifiers.push(
                        self.alloc(NodeKind::ImportDefaultSpecifier { local }, node_span(child)),
                    );
                }
                "namespace_import" => {
                    let local = self.identifier(first_runtime_child(child)?)?;
                    specifiers.push(self.alloc(
                        NodeKind::ImportNamespaceSpecifier { local },
                        node_span(child),
                    ));
                }
                "named_imports" => {
                    for specifier in runtime_children(child) {
                        if specifier.kind() != "import_specifier" {
                            continue;
                        }
                        let imported = self.module_export_name(field(specifier, "name")?)?;
                        let local = match specifier.child_by_field_name("alias") {
                            Some(alias) => self.identifier(alias)?,
                            None => imported,
                        };
                        specifiers.push(self.alloc(
                            NodeKind::ImportSpecifier { imported, local },
                            node_span(specifier),
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn export_statement(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let span = node_span(node);
        let is_default = has_token(node, "default");
        let decorators = self.decorators_of(node)?;

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let declaration = match declaration.kind() {
                "class_declaration" | "abstract_class_declaration" => {
                    self.class_declaration(declaration, decorators)?
                }
                _ => self.lower(declaration)?,
            };
            let kind = if is_default {
                NodeKind::ExportDefaultDeclaration { declaration }
            } else {
                NodeKind::ExportNamedDeclaration {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                    source: None,
                }
            };
            return Ok(self.alloc(kind, span));
        }

        if let Some(value) = node.child_by_field_name("value") {
            if is_default {
                let declaration = self.lower(value)?;
                return Ok(self.alloc(NodeKind::ExportDefaultDeclaration { declaration }, span));
            }
            return self.syntax(node);
        }

        let source = match node.child_by_field_name("source") {
            Some(source) => Some(self.literal(source)?),
            None => None,
        };
        let children = runtime_children(node);

        if let Some(clause) = children.iter().find(|c| c.kind() == "export_clause") {
            let mut specifiers = Vec::new();
            for specifier in runtime_children(*clause) {
                if specifier.kind() != "export_specifier" {
                    continue;
                }
                let local = self.module_export_name(field(specifier, "name")?)?;
                let exported = match specifier.child_by_field_name("alias") {
                    Some(alias) => self.module_export_name(alias)?,
                    None => local,
                };
                specifiers.push(self.alloc(
                    NodeKind::ExportSpecifier { local, exported },
                    node_span(specifier),
                ));
            }
            return Ok(self.alloc(
                NodeKind::ExportNamedDeclaration {
                    declaration: None,
                    specifiers,
                    source,
                },
                span,
            ));
        }

        if let Some(source) = source {
            let exported = match children.iter().find(|c| c.kind() == "namespace_export") {
                Some(namespace) => {
                    let name = runtime_children(*namespace)
                        .into_iter()
                        .last()
                        .ok_or_else(|| malformed(*namespace))?;
                    Some(self.module_export_name(name)?)
                }
                None => None,
            };
            return Ok(self.alloc(NodeKind::ExportAllDeclaration { exported, source }, span));
        }

        // TypeScript `export = x` and `export as namespace N`.
        self.syntax(node)
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn function(&mut self, node: Node<'_>) -> ParseResult<Function> {
        let id = match node.child_by_field_name("name") {
            Some(name) => Some(self.identifier(name)?),
            None => None,
        };
        let params = self.parameters(field(node, "parameters")?)?;
        let body = self.lower(field(node, "body")?)?;
        Ok(Function {
            id,
            params,
            body,
            is_async: has_token(node, "async"),
            is_generator: has_token(node, "*"),
        })
    }

    fn function_declaration(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let function = self.function(node)?;
        Ok(self.alloc(NodeKind::FunctionDeclaration(function), node_span(node)))
    }

    fn function_expression(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let function = self.function(node)?;
        Ok(self.alloc(NodeKind::FunctionExpression(function), node_span(node)))
    }

    fn parameters(&mut self, node: Node<'_>) -> ParseResult<Vec<NodeId>> {
        let mut params = Vec::new();
        for child in runtime_children(node) {
            match child.kind() {
                "decorator" => {}
                "required_parameter" | "optional_parameter" => {
                    if let Some(param) = self.ts_parameter(child)? {
                        params.push(param);
                    }
                }
                _ => params.push(self.pattern(child)?),
            }
        }
        Ok(params)
    }

    /// A TypeScript parameter; `None` for the `this` pseudo-parameter.
    fn ts_parameter(&mut self, node: Node<'_>) -> ParseResult<Option<NodeId>> {
        let pattern = field(node, "pattern")?;
        if pattern.kind() == "this" {
            return Ok(None);
        }
        let left = self.pattern(pattern)?;
        match node.child_by_field_name("value") {
            Some(value) => {
                let right = self.lower(value)?;
                Ok(Some(self.alloc(
                    NodeKind::AssignmentPattern { left, right },
                    node_span(node),
                )))
            }
            None => Ok(Some(left)),
        }
    }

    fn arrow_function(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let params = match node.child_by_field_name("parameter") {
            Some(param) => vec![self.pattern(param)?],
            None => self.parameters(field(node, "parameters")?)?,
        };
        let body_node = field(node, "body")?;
        let expression = body_node.kind() != "statement_block";
        let body = self.lower(body_node)?;
        Ok(self.alloc(
            NodeKind::ArrowFunctionExpression {
                params,
                body,
                expression,
                is_async: has_token(node, "async"),
            },
            node_span(node),
        ))
    }

    fn decorators_of(&mut self, node: Node<'_>) -> ParseResult<Vec<NodeId>> {
        let decorators: Vec<Node<'_>> = runtime_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .collect();
        self.lower_all(decorators)
    }

    fn decorator(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let expression = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::Decorator { expression }, node_span(node)))
    }

    /// `decorators` come from an enclosing `export` statement.
    fn class(&mut self, node: Node<'_>, mut decorators: Vec<NodeId>) -> ParseResult<Class> {
        decorators.extend(self.decorators_of(node)?);
        let id = match node.child_by_field_name("name") {
            Some(name) => Some(self.identifier(name)?),
            None => None,
        };
        let super_class = match runtime_children(node)
            .into_iter()
            .find(|c| c.kind() == "class_heritage")
        {
            Some(heritage) => self.class_heritage(heritage)?,
            None => None,
        };
        let body = self.class_body(field(node, "body")?)?;
        Ok(Class {
            decorators,
            id,
            super_class,
            body,
        })
    }

    fn class_declaration(&mut self, node: Node<'_>, decorators: Vec<NodeId>) -> ParseResult<NodeId> {
        let class = self.class(node, decorators)?;
        Ok(self.alloc(NodeKind::ClassDeclaration(class), node_span(node)))
    }

    fn class_expression(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let class = self.class(node, Vec::new())?;
        Ok(self.alloc(NodeKind::ClassExpression(class), node_span(node)))
    }

    /// The `extends` expression, if any. `implements` lists are types.
    fn class_heritage(&mut self, node: Node<'_>) -> ParseResult<Option<NodeId>> {
        let Some(child) = runtime_children(node).into_iter().next() else {
            return Ok(None);
        };
        let value = match child.kind() {
            "extends_clause" => match child.child_by_field_name("value") {
                Some(value) => value,
                None => first_runtime_child(child)?,
            },
            _ => child,
        };
        Ok(Some(self.lower(value)?))
    }

    fn class_body(&mut self, node: Node<'_>) -> ParseResult<Vec<NodeId>> {
        let mut members = Vec::new();
        // TypeScript puts member decorators in the body, ahead of the member.
        let mut pending = Vec::new();
        for child in runtime_children(node) {
            match child.kind() {
                "decorator" => pending.push(self.decorator(child)?),
                "method_definition" => {
                    let decorators = mem::take(&mut pending);
                    members.push(self.class_method(child, decorators)?);
                }
                "field_definition" | "public_field_definition" => {
                    let decorators = mem::take(&mut pending);
                    members.push(self.class_field(child, decorators)?);
                }
                "class_static_block" => {
                    pending.clear();
                    let body = self.lower_all(runtime_children(field(child, "body")?))?;
                    members.push(self.alloc(NodeKind::StaticBlock { body }, node_span(child)));
                }
                _ => pending.clear(),
            }
        }
        Ok(members)
    }

    fn property_key(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        match node.kind() {
            "computed_property_name" => self.lower(first_runtime_child(node)?),
            "property_identifier" | "identifier" => self.identifier(node),
            "private_property_identifier" => self.private_identifier(node),
            _ => self.lower(node),
        }
    }

    /// Key, function value, kind, `computed` and `static` of a method.
    fn method(
        &mut self,
        node: Node<'_>,
        in_class: bool,
    ) -> ParseResult<(NodeId, NodeId, PropertyKind, bool, bool)> {
        let name = field(node, "name")?;
        let mut kind = PropertyKind::Method;
        let mut is_static = false;
        let mut is_async = false;
        let mut is_generator = false;
        for child in all_children(node) {
            if child.id() == name.id() {
                break;
            }
            match child.kind() {
                "static" => is_static = true,
                "static get" => {
                    is_static = true;
                    kind = PropertyKind::Get;
                }
                "get" => kind = PropertyKind::Get,
                "set" => kind = PropertyKind::Set,
                "async" => is_async = true,
                "*" => is_generator = true,
                _ => {}
            }
        }

        let computed = name.kind() == "computed_property_name";
        if in_class && !computed && !is_static && kind == PropertyKind::Method {
            if self.text(name) == "constructor" {
                kind = PropertyKind::Constructor;
            }
        }
        let key = self.property_key(name)?;

        let params_node = field(node, "parameters")?;
        let body_node = field(node, "body")?;
        let params = self.parameters(params_node)?;
        let body = self.lower(body_node)?;
        let value = self.alloc(
            NodeKind::FunctionExpression(Function {
                id: None,
                params,
                body,
                is_async,
                is_generator,
            }),
            Span::new(params_node.start_byte(), body_node.end_byte()),
        );
        Ok((key, value, kind, computed, is_static))
    }

    fn class_method(&mut self, node: Node<'_>, mut decorators: Vec<NodeId>) -> ParseResult<NodeId> {
        decorators.extend(self.decorators_of(node)?);
        let (key, value, kind, computed, is_static) = self.method(node, true)?;
        Ok(self.alloc(
            NodeKind::MethodDefinition {
                decorators,
                key,
                value,
                kind,
                computed,
                is_static,
            },
            node_span(node),
        ))
    }

    fn class_field(&mut self, node: Node<'_>, mut decorators: Vec<NodeId>) -> ParseResult<NodeId> {
        decorators.extend(self.decorators_of(node)?);
        let key_node = match node.child_by_field_name("property") {
            Some(key) => key,
            None => field(node, "name")?,
        };
        let computed = key_node.kind() == "computed_property_name";
        let key = self.property_key(key_node)?;
        let value = self.lower_opt(node.child_by_field_name("value"))?;
        Ok(self.alloc(
            NodeKind::PropertyDefinition {
                decorators,
                key,
                value,
                computed,
                is_static: has_token(node, "static"),
            },
            node_span(node),
        ))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn identifier(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let name = decode_identifier(self.text(node));
        Ok(self.alloc(NodeKind::Identifier { name }, node_span(node)))
    }

    fn private_identifier(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let text = self.text(node);
        let name = decode_identifier(text.strip_prefix('#').unwrap_or(text));
        Ok(self.alloc(NodeKind::PrivateIdentifier { name }, node_span(node)))
    }

    fn literal(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let text = self.text(node);
        let value = match node.kind() {
            "regex" => {
                let part = |name: &str| {
                    node.child_by_field_name(name)
                        .map(|n| self.text(n))
                        .unwrap_or_default()
                        .to_string()
                };
                LiteralValue::Regex {
                    pattern: part("pattern"),
                    flags: part("flags"),
                }
            }
            "string" => LiteralValue::String(unquote_string(text)),
            "number" => parse_number(text),
            "true" => LiteralValue::Boolean(true),
            "false" => LiteralValue::Boolean(false),
            "null" => LiteralValue::Null,
            _ => return self.syntax(node),
        };
        Ok(self.alloc(NodeKind::Literal { value }, node_span(node)))
    }

    fn template(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        // Quasis cover the text between the backticks and substitutions.
        let end = node.end_byte().saturating_sub(1);
        let mut offset = (node.start_byte() + 1).min(end);
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        for child in runtime_children(node) {
            if child.kind() != "template_substitution" {
                continue;
            }
            quasis.push(self.alloc(
                NodeKind::TemplateElement { tail: false },
                Span::new(offset, child.start_byte()),
            ));
            expressions.push(self.lower(first_runtime_child(child)?)?);
            offset = child.end_byte();
        }
        quasis.push(self.alloc(
            NodeKind::TemplateElement { tail: true },
            Span::new(offset, end.max(offset)),
        ));
        Ok(self.alloc(
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            },
            node_span(node),
        ))
    }

    fn parenthesized(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        self.lower(first_runtime_child(node)?)
    }

    fn sequence(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let mut expressions = Vec::new();
        // Older grammars nest the tail as a right-hand sequence.
        let mut next = Some(node);
        while let Some(sequence) = next.take() {
            for child in runtime_children(sequence) {
                if child.kind() == "sequence_expression" {
                    next = Some(child);
                } else {
                    expressions.push(self.lower(child)?);
                }
            }
        }
        Ok(self.alloc(NodeKind::SequenceExpression { expressions }, node_span(node)))
    }

    fn object(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let mut properties = Vec::new();
        for child in runtime_children(node) {
            let span = node_span(child);
            let property = match child.kind() {
                "pair" => {
                    let key_node = field(child, "key")?;
                    let computed = key_node.kind() == "computed_property_name";
                    let key = self.property_key(key_node)?;
                    let value = self.lower(field(child, "value")?)?;
                    self.alloc(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed,
                            shorthand: false,
                        },
                        span,
                    )
                }
                "shorthand_property_identifier" => {
                    let id = self.identifier(child)?;
                    self.alloc(
                        NodeKind::Property {
                            key: id,
                            value: id,
                            kind: PropertyKind::Init,
                            computed: false,
                            shorthand: true,
                        },
                        span,
                    )
                }
                "method_definition" => {
                    let (key, value, kind, computed, _) = self.method(child, false)?;
                    self.alloc(
                        NodeKind::Property {
                            key,
                            value,
                            kind,
                            computed,
                            shorthand: false,
                        },
                        span,
                    )
                }
                _ => self.lower(child)?,
            };
            properties.push(property);
        }
        Ok(self.alloc(NodeKind::ObjectExpression { properties }, node_span(node)))
    }

    /// Elements of an array or array pattern. Elisions become `None`; a
    /// trailing comma adds nothing.
    fn elements(&mut self, node: Node<'_>, as_pattern: bool) -> ParseResult<Vec<Option<NodeId>>> {
        let mut elements = Vec::new();
        let mut current = None;
        for child in all_children(node) {
            if child.kind() == "," {
                elements.push(current.take());
            } else if child.is_named() && !is_type_syntax(child.kind()) {
                current = Some(if as_pattern {
                    self.pattern(child)?
                } else {
                    self.lower(child)?
                });
            }
        }
        if current.is_some() {
            elements.push(current);
        }
        Ok(elements)
    }

    fn array(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let elements = self.elements(node, false)?;
        Ok(self.alloc(NodeKind::ArrayExpression { elements }, node_span(node)))
    }

    fn arguments(&mut self, node: Node<'_>) -> ParseResult<Vec<NodeId>> {
        self.lower_all(runtime_children(node))
    }

    fn call(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let span = node_span(node);
        let function = field(node, "function")?;
        let arguments = field(node, "arguments")?;

        if arguments.kind() == "template_string" {
            let tag = self.lower(function)?;
            let quasi = self.template(arguments)?;
            return Ok(self.alloc(NodeKind::TaggedTemplateExpression { tag, quasi }, span));
        }
        if function.kind() == "import" {
            let source = self.lower(first_runtime_child(arguments)?)?;
            return Ok(self.alloc(NodeKind::ImportExpression { source }, span));
        }

        let callee = self.lower(function)?;
        let arguments = self.arguments(arguments)?;
        let optional = node.child_by_field_name("optional_chain").is_some();
        Ok(self.alloc(
            NodeKind::CallExpression {
                callee,
                arguments,
                optional,
            },
            span,
        ))
    }

    fn new_expression(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let callee = self.lower(field(node, "constructor")?)?;
        let arguments = match node.child_by_field_name("arguments") {
            Some(arguments) => self.arguments(arguments)?,
            None => Vec::new(),
        };
        Ok(self.alloc(NodeKind::NewExpression { callee, arguments }, node_span(node)))
    }

    fn member(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let span = node_span(node);
        let object_node = field(node, "object")?;
        let property_node = field(node, "property")?;
        let property = self.property_key(property_node)?;

        if object_node.kind() == "import" {
            // `import.meta` in grammars without a dedicated node.
            let meta = self.alloc(
                NodeKind::Identifier {
                    name: "import".to_string(),
                },
                node_span(object_node),
            );
            return Ok(self.alloc(NodeKind::MetaProperty { meta, property }, span));
        }

        let object = self.lower(object_node)?;
        let optional =
            node.child_by_field_name("optional_chain").is_some() || has_token(node, "?.");
        Ok(self.alloc(
            NodeKind::MemberExpression {
                object,
                property,
                computed: false,
                optional,
            },
            span,
        ))
    }

    fn subscript(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let object = self.lower(field(node, "object")?)?;
        let property = self.lower(field(node, "index")?)?;
        let optional =
            node.child_by_field_name("optional_chain").is_some() || has_token(node, "?.");
        Ok(self.alloc(
            NodeKind::MemberExpression {
                object,
                property,
                computed: true,
                optional,
            },
            node_span(node),
        ))
    }

    fn operator(&self, node: Node<'_>, default: &str) -> String {
        node.child_by_field_name("operator")
            .map(|op| self.text(op))
            .unwrap_or(default)
            .to_string()
    }

    fn assignment(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let operator = self.operator(node, "=");
        let left = self.pattern(field(node, "left")?)?;
        let right = self.lower(field(node, "right")?)?;
        Ok(self.alloc(
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            },
            node_span(node),
        ))
    }

    fn binary(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let operator = self.operator(node, "");
        let left = self.lower(field(node, "left")?)?;
        let right = self.lower(field(node, "right")?)?;
        let kind = if matches!(operator.as_str(), "&&" | "||" | "??") {
            NodeKind::LogicalExpression {
                operator,
                left,
                right,
            }
        } else {
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
        };
        Ok(self.alloc(kind, node_span(node)))
    }

    fn unary(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let operator = self.operator(node, "");
        let argument = self.lower(field(node, "argument")?)?;
        Ok(self.alloc(
            NodeKind::UnaryExpression { operator, argument },
            node_span(node),
        ))
    }

    fn update(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let operator_node = field(node, "operator")?;
        let argument_node = field(node, "argument")?;
        let operator = self.text(operator_node).to_string();
        let prefix = operator_node.start_byte() < argument_node.start_byte();
        let argument = self.lower(argument_node)?;
        Ok(self.alloc(
            NodeKind::UpdateExpression {
                operator,
                prefix,
                argument,
            },
            node_span(node),
        ))
    }

    fn conditional(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let test = self.lower(field(node, "condition")?)?;
        let consequent = self.lower(field(node, "consequence")?)?;
        let alternate = self.lower(field(node, "alternative")?)?;
        Ok(self.alloc(
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            },
            node_span(node),
        ))
    }

    fn await_expression(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let argument = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::AwaitExpression { argument }, node_span(node)))
    }

    fn yield_expression(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let argument = self.lower_opt(runtime_children(node).into_iter().next())?;
        Ok(self.alloc(
            NodeKind::YieldExpression {
                argument,
                delegate: has_token(node, "*"),
            },
            node_span(node),
        ))
    }

    fn spread(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let argument = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::SpreadElement { argument }, node_span(node)))
    }

    /// `new.target` and `import.meta`.
    fn meta_property(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let children = all_children(node);
        let (Some(first), Some(last)) = (children.first(), children.last()) else {
            return Err(malformed(node));
        };
        let meta = self.identifier(*first)?;
        let property = self.identifier(*last)?;
        Ok(self.alloc(NodeKind::MetaProperty { meta, property }, node_span(node)))
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    fn pattern(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let span = node_span(node);
        match node.kind() {
            "identifier" | "undefined" | "shorthand_property_identifier_pattern" => {
                self.identifier(node)
            }
            "object_pattern" => {
                let mut properties = Vec::new();
                for child in runtime_children(node) {
                    properties.push(self.object_pattern_property(child)?);
                }
                Ok(self.alloc(NodeKind::ObjectPattern { properties }, span))
            }
            "array_pattern" => {
                let elements = self.elements(node, true)?;
                Ok(self.alloc(NodeKind::ArrayPattern { elements }, span))
            }
            "assignment_pattern" => {
                let left = self.pattern(field(node, "left")?)?;
                let right = self.lower(field(node, "right")?)?;
                Ok(self.alloc(NodeKind::AssignmentPattern { left, right }, span))
            }
            "rest_pattern" => {
                let argument = self.pattern(first_runtime_child(node)?)?;
                Ok(self.alloc(NodeKind::RestElement { argument }, span))
            }
            "parenthesized_expression" => self.pattern(first_runtime_child(node)?),
            _ => self.lower(node),
        }
    }

    fn object_pattern_property(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let span = node_span(node);
        let (key, value, computed, shorthand) = match node.kind() {
            "pair_pattern" => {
                let key_node = field(node, "key")?;
                let computed = key_node.kind() == "computed_property_name";
                let key = self.property_key(key_node)?;
                let value = self.pattern(field(node, "value")?)?;
                (key, value, computed, false)
            }
            "shorthand_property_identifier_pattern" => {
                let id = self.identifier(node)?;
                (id, id, false, true)
            }
            // `{ a = 1 }`: the key is the identifier the default applies to.
            "object_assignment_pattern" => {
                let left = self.pattern(field(node, "left")?)?;
                let right = self.lower(field(node, "right")?)?;
                let value = self.alloc(NodeKind::AssignmentPattern { left, right }, span);
                (left, value, false, true)
            }
            _ => return self.pattern(node),
        };
        Ok(self.alloc(
            NodeKind::Property {
                key,
                value,
                kind: PropertyKind::Init,
                computed,
                shorthand,
            },
            span,
        ))
    }

    // =========================================================================
    // TypeScript
    // =========================================================================

    fn ts_expression(&mut self, node: Node<'_>, kind: TsExpressionKind) -> ParseResult<NodeId> {
        let expression = self.lower(first_runtime_child(node)?)?;
        Ok(self.alloc(NodeKind::TsExpression { kind, expression }, node_span(node)))
    }

    fn ts_type_declaration(&mut self, node: Node<'_>, kind: TsDeclarationKind) -> ParseResult<NodeId> {
        let id = self.identifier(field(node, "name")?)?;
        Ok(self.alloc(NodeKind::TsTypeDeclaration { kind, id }, node_span(node)))
    }

    fn ts_enum(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let id = self.identifier(field(node, "name")?)?;
        let mut members = Vec::new();
        for member in runtime_children(field(node, "body")?) {
            let (name, initializer) = if member.kind() == "enum_assignment" {
                let name = self.property_key(field(member, "name")?)?;
                let value = self.lower(field(member, "value")?)?;
                (name, Some(value))
            } else {
                (self.property_key(member)?, None)
            };
            members.push(self.alloc(
                NodeKind::TsEnumMember {
                    id: name,
                    initializer,
                },
                node_span(member),
            ));
        }
        Ok(self.alloc(NodeKind::TsEnumDeclaration { id, members }, node_span(node)))
    }

    fn ts_module(&mut self, node: Node<'_>) -> ParseResult<NodeId> {
        let name = field(node, "name")?;
        let id = match name.kind() {
            "identifier" => self.identifier(name)?,
            _ => self.lower(name)?,
        };
        let body = match node.child_by_field_name("body") {
            Some(block) => {
                let statements = self.lower_all(runtime_children(block))?;
                Some(self.alloc(
                    NodeKind::TsModuleBlock { body: statements },
                    node_span(block),
                ))
            }
            None => None,
        };
        Ok(self.alloc(NodeKind::TsModuleDeclaration { id, body }, node_span(node)))
    }
}

// ============================================================================
// Literal values
// ============================================================================

/// Resolve `\uXXXX` and `\u{X}` escapes in an identifier.
fn decode_identifier(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        chars.next(); // 'u'
        let hex: String = if chars.peek() == Some(&'{') {
            chars.next();
            chars.by_ref().take_while(|&c| c != '}').collect()
        } else {
            chars.by_ref().take(4).collect()
        };
        if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            out.push(decoded);
        }
    }
    out
}

/// Cooked value of a quoted string literal.
fn unquote_string(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(c);
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(c);
                }
            }
            // Line continuation.
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Value of a numeric literal.
fn parse_number(raw: &str) -> LiteralValue {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    if let Some(digits) = cleaned.strip_suffix('n') {
        return LiteralValue::BigInt(digits.to_string());
    }
    let radix = match cleaned.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => u64::from_str_radix(&cleaned[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
        None => cleaned.parse::<f64>().unwrap_or(f64::NAN),
    };
    LiteralValue::Number(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_string() {
        assert_eq!(unquote_string(r#""a\nb""#), "a\nb");
        assert_eq!(unquote_string(r"'\x41B\u{43}'"), "ABC");
        assert_eq!(unquote_string("'a\\\nb'"), "ab");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1_000"), LiteralValue::Number(1000.0));
        assert_eq!(parse_number("0x1F"), LiteralValue::Number(31.0));
        assert_eq!(parse_number("0b101"), LiteralValue::Number(5.0));
        assert_eq!(parse_number("1.5e2"), LiteralValue::Number(150.0));
        assert_eq!(parse_number("10n"), LiteralValue::BigInt("10".to_string()));
    }

    #[test]
    fn test_decode_identifier() {
        assert_eq!(decode_identifier("abc"), "abc");
        assert_eq!(decode_identifier(r"\u0061bc"), "abc");
        assert_eq!(decode_identifier(r"\u{62}"), "b");
    }

    #[test]
    fn test_type_syntax() {
        assert!(is_type_syntax("type_annotation"));
        assert!(is_type_syntax("union_type"));
        assert!(is_type_syntax("type_arguments"));
        assert!(!is_type_syntax("identifier"));
        assert!(!is_type_syntax("regex"));
    }
}
