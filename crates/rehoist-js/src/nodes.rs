// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arena-allocated JavaScript syntax tree.
//!
//! Every node lives in the [`Ast`] arena and is addressed by a [`NodeId`].
//! Nodes carry their byte span and a parent link; child links are stored in
//! the [`NodeKind`] payload. The node set follows the ESTree shapes (and the
//! typescript-estree ones for TypeScript) so the tree reads like what
//! JavaScript tooling produces. Type annotations are not kept.

use rehoist_core::patch::Span;

/// Index of a node in its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// How a file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    Script,
    Module,
    /// Module if the file has a top-level `import` or `export`, script otherwise.
    #[default]
    Auto,
}

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

/// Value of a literal node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Regex { pattern: String, flags: String },
    String(String),
    Number(f64),
    BigInt(String),
    Boolean(bool),
    Null,
}

/// Kind of an object property or class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
    Method,
    Constructor,
}

/// Shared payload of function declarations and expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub body: NodeId,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Shared payload of class declarations and expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub decorators: Vec<NodeId>,
    pub id: Option<NodeId>,
    pub super_class: Option<NodeId>,
    pub body: Vec<NodeId>,
}

/// TypeScript expression wrappers that only change the static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsExpressionKind {
    /// `expr as T`
    As,
    /// `expr satisfies T`
    Satisfies,
    /// `expr!`
    NonNull,
    /// `<T>expr`
    TypeAssertion,
    /// `expr<T>`
    Instantiation,
}

/// TypeScript declarations that bind a name but carry no runtime code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsDeclarationKind {
    TypeAlias,
    Interface,
    /// A function overload signature.
    FunctionSignature,
}

/// Closed set of syntax node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<NodeId>,
        source_type: SourceType,
    },

    // Declarations
    VariableDeclaration {
        kind: DeclKind,
        declarations: Vec<NodeId>,
    },
    VariableDeclarator {
        id: NodeId,
        init: Option<NodeId>,
    },
    FunctionDeclaration(Function),
    ClassDeclaration(Class),
    ImportDeclaration {
        specifiers: Vec<NodeId>,
        source: NodeId,
    },
    ImportSpecifier {
        imported: NodeId,
        local: NodeId,
    },
    ImportDefaultSpecifier {
        local: NodeId,
    },
    ImportNamespaceSpecifier {
        local: NodeId,
    },
    ExportNamedDeclaration {
        declaration: Option<NodeId>,
        specifiers: Vec<NodeId>,
        source: Option<NodeId>,
    },
    ExportSpecifier {
        local: NodeId,
        exported: NodeId,
    },
    ExportDefaultDeclaration {
        declaration: NodeId,
    },
    ExportAllDeclaration {
        exported: Option<NodeId>,
        source: NodeId,
    },

    // Class members
    MethodDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        is_static: bool,
    },
    PropertyDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        value: Option<NodeId>,
        computed: bool,
        is_static: bool,
    },
    StaticBlock {
        body: Vec<NodeId>,
    },

    // Statements
    ExpressionStatement {
        expression: NodeId,
    },
    BlockStatement {
        body: Vec<NodeId>,
    },
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement {
        argument: Option<NodeId>,
    },
    IfStatement {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    ForStatement {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForInStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
    },
    ForOfStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
        is_await: bool,
    },
    WhileStatement {
        test: NodeId,
        body: NodeId,
    },
    DoWhileStatement {
        body: NodeId,
        test: NodeId,
    },
    BreakStatement {
        label: Option<NodeId>,
    },
    ContinueStatement {
        label: Option<NodeId>,
    },
    ThrowStatement {
        argument: NodeId,
    },
    TryStatement {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    CatchClause {
        param: Option<NodeId>,
        body: NodeId,
    },
    SwitchStatement {
        discriminant: NodeId,
        cases: Vec<NodeId>,
    },
    SwitchCase {
        test: Option<NodeId>,
        consequent: Vec<NodeId>,
    },
    LabeledStatement {
        label: NodeId,
        body: NodeId,
    },
    WithStatement {
        object: NodeId,
        body: NodeId,
    },

    // Expressions
    Identifier {
        name: String,
    },
    PrivateIdentifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
    TemplateLiteral {
        quasis: Vec<NodeId>,
        expressions: Vec<NodeId>,
    },
    TemplateElement {
        tail: bool,
    },
    TaggedTemplateExpression {
        tag: NodeId,
        quasi: NodeId,
    },
    ArrayExpression {
        elements: Vec<Option<NodeId>>,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        shorthand: bool,
    },
    SpreadElement {
        argument: NodeId,
    },
    FunctionExpression(Function),
    ArrowFunctionExpression {
        params: Vec<NodeId>,
        body: NodeId,
        /// Body is an expression rather than a block.
        expression: bool,
        is_async: bool,
    },
    ClassExpression(Class),
    CallExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
        optional: bool,
    },
    NewExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpression {
        object: NodeId,
        property: NodeId,
        computed: bool,
        optional: bool,
    },
    UnaryExpression {
        operator: String,
        argument: NodeId,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: NodeId,
    },
    BinaryExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    LogicalExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    AssignmentExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpression {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    SequenceExpression {
        expressions: Vec<NodeId>,
    },
    AwaitExpression {
        argument: NodeId,
    },
    YieldExpression {
        argument: Option<NodeId>,
        delegate: bool,
    },
    ThisExpression,
    Super,
    MetaProperty {
        meta: NodeId,
        property: NodeId,
    },
    ImportExpression {
        source: NodeId,
    },

    // Patterns
    ArrayPattern {
        elements: Vec<Option<NodeId>>,
    },
    ObjectPattern {
        properties: Vec<NodeId>,
    },
    AssignmentPattern {
        left: NodeId,
        right: NodeId,
    },
    RestElement {
        argument: NodeId,
    },

    // TypeScript
    TsExpression {
        kind: TsExpressionKind,
        expression: NodeId,
    },
    TsTypeDeclaration {
        kind: TsDeclarationKind,
        id: NodeId,
    },
    TsEnumDeclaration {
        id: NodeId,
        members: Vec<NodeId>,
    },
    TsEnumMember {
        id: NodeId,
        initializer: Option<NodeId>,
    },
    /// `namespace N { ... }` and `module "m" { ... }`.
    TsModuleDeclaration {
        id: NodeId,
        body: Option<NodeId>,
    },
    TsModuleBlock {
        body: Vec<NodeId>,
    },
    Decorator {
        expression: NodeId,
    },

    /// Syntax with no dedicated shape (JSX, ambient declarations and the
    /// like), named by its grammar kind. Its runtime children are kept.
    Syntax {
        kind: &'static str,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// ESTree type name of this node.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::ImportSpecifier { .. } => "ImportSpecifier",
            NodeKind::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            NodeKind::ImportNamespaceSpecifier { .. } => "ImportNamespaceSpecifier",
            NodeKind::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            NodeKind::ExportSpecifier { .. } => "ExportSpecifier",
            NodeKind::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            NodeKind::ExportAllDeclaration { .. } => "ExportAllDeclaration",
            NodeKind::MethodDefinition { .. } => "MethodDefinition",
            NodeKind::PropertyDefinition { .. } => "PropertyDefinition",
            NodeKind::StaticBlock { .. } => "StaticBlock",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::DebuggerStatement => "DebuggerStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::ForOfStatement { .. } => "ForOfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::BreakStatement { .. } => "BreakStatement",
            NodeKind::ContinueStatement { .. } => "ContinueStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::LabeledStatement { .. } => "LabeledStatement",
            NodeKind::WithStatement { .. } => "WithStatement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::PrivateIdentifier { .. } => "PrivateIdentifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::TemplateElement { .. } => "TemplateElement",
            NodeKind::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            NodeKind::ClassExpression(_) => "ClassExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::AwaitExpression { .. } => "AwaitExpression",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::Super => "Super",
            NodeKind::MetaProperty { .. } => "MetaProperty",
            NodeKind::ImportExpression { .. } => "ImportExpression",
            NodeKind::ArrayPattern { .. } => "ArrayPattern",
            NodeKind::ObjectPattern { .. } => "ObjectPattern",
            NodeKind::AssignmentPattern { .. } => "AssignmentPattern",
            NodeKind::RestElement { .. } => "RestElement",
            NodeKind::TsExpression { kind, .. } => match kind {
                TsExpressionKind::As => "TSAsExpression",
                TsExpressionKind::Satisfies => "TSSatisfiesExpression",
                TsExpressionKind::NonNull => "TSNonNullExpression",
                TsExpressionKind::TypeAssertion => "TSTypeAssertion",
                TsExpressionKind::Instantiation => "TSInstantiationExpression",
            },
            NodeKind::TsTypeDeclaration { kind, .. } => match kind {
                TsDeclarationKind::TypeAlias => "TSTypeAliasDeclaration",
                TsDeclarationKind::Interface => "TSInterfaceDeclaration",
                TsDeclarationKind::FunctionSignature => "TSDeclareFunction",
            },
            NodeKind::TsEnumDeclaration { .. } => "TSEnumDeclaration",
            NodeKind::TsEnumMember { .. } => "TSEnumMember",
            NodeKind::TsModuleDeclaration { .. } => "TSModuleDeclaration",
            NodeKind::TsModuleBlock { .. } => "TSModuleBlock",
            NodeKind::Decorator { .. } => "Decorator",
            NodeKind::Syntax { kind, .. } => *kind,
        }
    }

    /// Child node ids in source order.
    pub fn children(&self) -> Vec<NodeId> {
        fn push_opt(out: &mut Vec<NodeId>, id: &Option<NodeId>) {
            if let Some(id) = id {
                out.push(*id);
            }
        }
        fn function_children(out: &mut Vec<NodeId>, f: &Function) {
            push_opt(out, &f.id);
            out.extend(&f.params);
            out.push(f.body);
        }
        fn class_children(out: &mut Vec<NodeId>, c: &Class) {
            out.extend(&c.decorators);
            push_opt(out, &c.id);
            push_opt(out, &c.super_class);
            out.extend(&c.body);
        }

        let mut out = Vec::new();
        match self {
            NodeKind::Program { body, .. }
            | NodeKind::BlockStatement { body }
            | NodeKind::StaticBlock { body }
            | NodeKind::TsModuleBlock { body } => out.extend(body),
            NodeKind::VariableDeclaration { declarations, .. } => out.extend(declarations),
            NodeKind::VariableDeclarator { id, init } => {
                out.push(*id);
                push_opt(&mut out, init);
            }
            NodeKind::FunctionDeclaration(f) | NodeKind::FunctionExpression(f) => {
                function_children(&mut out, f)
            }
            NodeKind::ClassDeclaration(c) | NodeKind::ClassExpression(c) => {
                class_children(&mut out, c)
            }
            NodeKind::ImportDeclaration { specifiers, source } => {
                out.extend(specifiers);
                out.push(*source);
            }
            NodeKind::ImportSpecifier { imported, local } => {
                // `import { a } from "m"` uses one identifier for both.
                out.push(*imported);
                if local != imported {
                    out.push(*local);
                }
            }
            NodeKind::ImportDefaultSpecifier { local }
            | NodeKind::ImportNamespaceSpecifier { local } => out.push(*local),
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                push_opt(&mut out, declaration);
                out.extend(specifiers);
                push_opt(&mut out, source);
            }
            NodeKind::ExportSpecifier { local, exported } => {
                out.push(*local);
                if exported != local {
                    out.push(*exported);
                }
            }
            NodeKind::ExportDefaultDeclaration { declaration } => out.push(*declaration),
            NodeKind::ExportAllDeclaration { exported, source } => {
                push_opt(&mut out, exported);
                out.push(*source);
            }
            NodeKind::MethodDefinition {
                decorators,
                key,
                value,
                ..
            } => {
                out.extend(decorators);
                out.push(*key);
                out.push(*value);
            }
            NodeKind::PropertyDefinition {
                decorators,
                key,
                value,
                ..
            } => {
                out.extend(decorators);
                out.push(*key);
                push_opt(&mut out, value);
            }
            NodeKind::ExpressionStatement { expression } => out.push(*expression),
            NodeKind::ReturnStatement { argument } => push_opt(&mut out, argument),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                out.push(*test);
                out.push(*consequent);
                push_opt(&mut out, alternate);
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                push_opt(&mut out, init);
                push_opt(&mut out, test);
                push_opt(&mut out, update);
                out.push(*body);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement {
                left, right, body, ..
            } => {
                out.push(*left);
                out.push(*right);
                out.push(*body);
            }
            NodeKind::WhileStatement { test, body } => {
                out.push(*test);
                out.push(*body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                out.push(*body);
                out.push(*test);
            }
            NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label } => {
                push_opt(&mut out, label)
            }
            NodeKind::ThrowStatement { argument }
            | NodeKind::SpreadElement { argument }
            | NodeKind::AwaitExpression { argument }
            | NodeKind::RestElement { argument }
            | NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => out.push(*argument),
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                out.push(*block);
                push_opt(&mut out, handler);
                push_opt(&mut out, finalizer);
            }
            NodeKind::CatchClause { param, body } => {
                push_opt(&mut out, param);
                out.push(*body);
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                out.push(*discriminant);
                out.extend(cases);
            }
            NodeKind::SwitchCase { test, consequent } => {
                push_opt(&mut out, test);
                out.extend(consequent);
            }
            NodeKind::LabeledStatement { label, body } => {
                out.push(*label);
                out.push(*body);
            }
            NodeKind::WithStatement { object, body } => {
                out.push(*object);
                out.push(*body);
            }
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            } => {
                // Interleave quasis and expressions in source order.
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push(*quasi);
                    if let Some(expr) = expressions.get(i) {
                        out.push(*expr);
                    }
                }
            }
            NodeKind::TaggedTemplateExpression { tag, quasi } => {
                out.push(*tag);
                out.push(*quasi);
            }
            NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
                out.extend(elements.iter().flatten())
            }
            NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
                out.extend(properties)
            }
            NodeKind::Property {
                key,
                value,
                shorthand,
                ..
            } => {
                if !shorthand {
                    out.push(*key);
                }
                out.push(*value);
            }
            NodeKind::ArrowFunctionExpression { params, body, .. } => {
                out.extend(params);
                out.push(*body);
            }
            NodeKind::CallExpression {
                callee, arguments, ..
            }
            | NodeKind::NewExpression { callee, arguments } => {
                out.push(*callee);
                out.extend(arguments);
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                out.push(*object);
                out.push(*property);
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::AssignmentPattern { left, right } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                out.push(*test);
                out.push(*consequent);
                out.push(*alternate);
            }
            NodeKind::SequenceExpression { expressions } => out.extend(expressions),
            NodeKind::YieldExpression { argument, .. } => push_opt(&mut out, argument),
            NodeKind::MetaProperty { meta, property } => {
                out.push(*meta);
                out.push(*property);
            }
            NodeKind::ImportExpression { source } => out.push(*source),
            NodeKind::TsExpression { expression, .. } | NodeKind::Decorator { expression } => {
                out.push(*expression)
            }
            NodeKind::TsTypeDeclaration { id, .. } => out.push(*id),
            NodeKind::TsEnumDeclaration { id, members } => {
                out.push(*id);
                out.extend(members);
            }
            NodeKind::TsEnumMember { id, initializer } => {
                out.push(*id);
                push_opt(&mut out, initializer);
            }
            NodeKind::TsModuleDeclaration { id, body } => {
                out.push(*id);
                push_opt(&mut out, body);
            }
            NodeKind::Syntax { children, .. } => out.extend(children),
            NodeKind::EmptyStatement
            | NodeKind::DebuggerStatement
            | NodeKind::Identifier { .. }
            | NodeKind::PrivateIdentifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::TemplateElement { .. }
            | NodeKind::ThisExpression
            | NodeKind::Super => {}
        }
        out
    }

    /// Function declarations, function expressions and arrows.
    pub fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration(_)
                | NodeKind::FunctionExpression(_)
                | NodeKind::ArrowFunctionExpression { .. }
        )
    }

    /// Returns true for a regular expression literal.
    pub fn is_regex_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal {
                value: LiteralValue::Regex { .. }
            }
        )
    }
}

/// One syntax node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// A parsed program: the node arena plus the source it was parsed from.
#[derive(Debug, Clone)]
pub struct Ast {
    source: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    /// Assemble a tree from parsed nodes and fill in parent links.
    pub(crate) fn new(source: &str, nodes: Vec<Node>, root: NodeId) -> Self {
        let mut ast = Ast {
            source: source.to_string(),
            nodes,
            root,
        };
        ast.link_parents();
        ast
    }

    fn link_parents(&mut self) {
        for index in 0..self.nodes.len() {
            for child in self.nodes[index].kind.children() {
                self.nodes[child.0].parent = Some(NodeId(index));
            }
        }
    }

    /// The `Program` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of `id` in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or_default()
    }

    /// Source text of a node.
    pub fn node_text(&self, id: NodeId) -> &str {
        self.text(self.span(id))
    }

    /// Top-level statements of the program.
    pub fn program_body(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Program { body, .. } => body,
            _ => &[],
        }
    }

    /// Byte offset just past a leading byte order mark and `#!` line.
    ///
    /// Text inserted at the start of a file goes here so both stay first.
    /// The line terminator of the `#!` line is not included.
    pub fn header_end(&self) -> usize {
        let mut offset = if self.source.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        let rest = &self.source[offset..];
        if rest.starts_with("#!") {
            offset += rest
                .find(['\n', '\r', '\u{2028}', '\u{2029}'])
                .unwrap_or(rest.len());
        }
        offset
    }

    /// Resolved source type of the program (never `Auto`).
    pub fn source_type(&self) -> SourceType {
        match self.kind(self.root) {
            NodeKind::Program { source_type, .. } => *source_type,
            _ => SourceType::Script,
        }
    }

    /// Name of an identifier node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// All nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind, start: usize, end: usize) -> Node {
        Node {
            kind,
            span: Span::new(start, end),
            parent: None,
        }
    }

    #[test]
    fn test_parent_links_and_ancestors() {
        // x = /a/;
        let source = "x = /a/;";
        let nodes = vec![
            node(
                NodeKind::Identifier {
                    name: "x".to_string(),
                },
                0,
                1,
            ),
            node(
                NodeKind::Literal {
                    value: LiteralValue::Regex {
                        pattern: "a".to_string(),
                        flags: String::new(),
                    },
                },
                4,
                7,
            ),
            node(
                NodeKind::AssignmentExpression {
                    operator: "=".to_string(),
                    left: NodeId(0),
                    right: NodeId(1),
                },
                0,
                7,
            ),
            node(
                NodeKind::ExpressionStatement {
                    expression: NodeId(2),
                },
                0,
                8,
            ),
            node(
                NodeKind::Program {
                    body: vec![NodeId(3)],
                    source_type: SourceType::Script,
                },
                0,
                8,
            ),
        ];
        let ast = Ast::new(source, nodes, NodeId(4));

        assert_eq!(ast.parent(NodeId(1)), Some(NodeId(2)));
        assert_eq!(
            ast.ancestors(NodeId(1)).collect::<Vec<_>>(),
            vec![NodeId(2), NodeId(3), NodeId(4)]
        );
        assert_eq!(ast.parent(ast.root()), None);
        assert_eq!(ast.node_text(NodeId(1)), "/a/");
        assert!(ast.kind(NodeId(1)).is_regex_literal());
        assert_eq!(ast.program_body(), &[NodeId(3)]);
        assert_eq!(ast.kind(NodeId(2)).name(), "AssignmentExpression");
    }

    fn header_end(source: &str) -> usize {
        let program = node(
            NodeKind::Program {
                body: Vec::new(),
                source_type: SourceType::Script,
            },
            0,
            source.len(),
        );
        Ast::new(source, vec![program], NodeId(0)).header_end()
    }

    #[test]
    fn test_header_end() {
        assert_eq!(header_end("f();"), 0);
        assert_eq!(header_end(""), 0);
        assert_eq!(header_end("#!/usr/bin/env node\nf();"), 19);
        assert_eq!(header_end("#!/usr/bin/env node\r\nf();"), 19);
        assert_eq!(header_end("#!node"), 6);
        assert_eq!(header_end("\u{FEFF}f();"), 3);
        assert_eq!(header_end("\u{FEFF}#!node\nf();"), 9);
        // Only a leading `#!` counts.
        assert_eq!(header_end(" #!x"), 0);
    }
}
