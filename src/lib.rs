/// Hunter - monster compendium for tabletop RPGs (TUI edition)
///
/// Core library providing monster search, the local compendium store and
/// content sync.

pub mod config;
pub mod core;
pub mod database;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
