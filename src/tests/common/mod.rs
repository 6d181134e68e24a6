//! Common Test Utilities
//!
//! Shared test helpers and fixtures used across test modules:
//! - Database fixture creation
//! - Sample monsters and spells
//! - An in-memory repository with load counters


pub use fixtures::*;
