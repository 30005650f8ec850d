//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! property listing test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built listings, backend rows, and a frozen clock
//! - `builders`: Builder for listings with sensible defaults
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
