//! rehoist: find regex literals that are not hoisted to top-level constants,
//! and hoist them.
//!
//! The library behind the `rehoist` binary. Language-agnostic pieces (patch
//! IR, fix passes, configuration, output) live in `rehoist-core`; the
//! JavaScript parser, scope analysis and the rule live in `rehoist-js`.

// Infrastructure - re-exported from rehoist-core
pub use rehoist_core::config;
pub use rehoist_core::diagnostic;
pub use rehoist_core::error;
pub use rehoist_core::fixer;
pub use rehoist_core::output;
pub use rehoist_core::patch;

// Language support
pub use rehoist_js as js;

// Drivers and front door
pub mod cli;
pub mod runner;
