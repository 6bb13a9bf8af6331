//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! risk pool test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data (the demo group, amounts, dates)
//! - `builders`: Builder patterns for groups and wired-up pool services
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
