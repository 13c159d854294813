// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JavaScript support for rehoist.
//!
//! This crate provides everything that knows about JavaScript syntax:
//! - A tree-sitter front end for JavaScript and TypeScript, lowered to an
//!   arena syntax tree
//! - Visitor infrastructure, regex literal collection and scope analysis
//! - The hoist-regex rule with its fix
//! - File discovery and single-file analysis

pub mod analyzer;
pub mod files;
pub mod nodes;
pub mod ops;
pub mod parser;
pub mod validation;
pub mod visitor;

pub use analyzer::{analyze_source, AnalyzeError, AnalyzeOptions, FileAnalysis};
pub use nodes::{Ast, NodeId, NodeKind, SourceType};
pub use ops::hoist_regex::{HoistOptions, HoistRegex};
pub use parser::{parse, parse_with, Dialect, ParseOptions};
