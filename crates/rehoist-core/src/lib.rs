//! Core infrastructure for rehoist.
//!
//! This crate provides language-agnostic infrastructure:
//! - Patch IR (spans, edits, fixes) and the batch span editor
//! - Fix passes that merge independently computed fixes
//! - Diagnostics
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Configuration and file filtering
//! - Text utilities

pub mod config;
pub mod diagnostic;
pub mod editor;
pub mod error;
pub mod filter;
pub mod fixer;
pub mod output;
pub mod patch;
pub mod text;
