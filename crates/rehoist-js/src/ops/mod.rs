// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lint rules and their fixes.

pub mod hoist_regex;

pub use hoist_regex::{
    allocate_name, find_insertion_point, hoist_fix, is_hoisted, ExportNamedWrapper, HoistOptions,
    HoistRegex, NameScope, WrapperPredicate,
};
