//! # Mech Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Canonical unit fixtures
//! - Idempotence test harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod idempotence;

/// Re-export proptest for convenience.
pub use proptest;
