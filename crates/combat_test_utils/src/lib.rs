//! # Combat Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixed-point construction helpers
//! - World frame and enemy fixtures
//! - Scripted engine runs for determinism checks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;

pub use fixtures::*;
