//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repository mirrors the schema's integrity rules (unique
//! location number, parent foreign key, cascading delete) so service and
//! HTTP tests exercise the same failure modes as PostgreSQL.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
