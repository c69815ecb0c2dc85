//! Common test utilities for Strata CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated build context, layer store and home directory
//! - Assertion macros: `assert_output_contains!`, `assert_context_file!`
//! - Fixtures: Recipes that stand in for apt/pip without network access

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
