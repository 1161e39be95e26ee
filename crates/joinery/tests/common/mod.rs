//! Shared test utilities for joinery integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated package trees in temp directories
//! - Stand-in bundler and minifier workers plus a recording progress reporter

pub mod harness;
pub mod workers;

pub use harness::TestHarness;
pub use workers::*;
