//! Domain models for the monster and spell compendium.

mod folder;
mod monster;
mod spell;

pub use folder::*;
pub use monster::*;
pub use spell::*;
