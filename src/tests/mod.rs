//! Test suite
//!
//! - `common`: fixtures shared across modules
//! - `database`: SQLite storage through `Database` and `LocalRepository`
//! - `unit`: search, latest-search and sync use cases
//! - `property`: proptest invariants of query parsing and text folding

mod common;
mod database;
mod property;
