//! Property-based tests
//!
//! Invariants that should hold for all inputs, checked with proptest.
//!
//! ```sh
//! cargo test property --release
//! PROPTEST_CASES=1000 cargo test property --release
//! ```
//!
//! - `search_props`: query parsing, text folding and challenge ratings
//!   - Parsing never panics and never yields an empty clause
//!   - Clause count never exceeds the number of `&`-separated parts
//!   - Folding is idempotent and accent-free
//!   - Formatted challenge ratings round-trip through `cr=` queries
