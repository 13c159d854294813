// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for syntax tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! # Visitors
//!
//! - [`RegexLiteralCollector`]: every regex literal, in source order
//! - [`ScopeCollector`]: the [`ScopeTree`] of a program

mod dispatch;
mod regex_literal;
mod scope;
mod traits;

pub use dispatch::*;
pub use regex_literal::{RegexLiteralCollector, RegexLiteralInfo};
pub use scope::{
    bound_identifiers, identifier_role, Binding, BindingKind, IdentifierRole, Reference, Scope,
    ScopeCollector, ScopeId, ScopeKind, ScopeTree,
};
pub use traits::{VisitResult, Visitor};
