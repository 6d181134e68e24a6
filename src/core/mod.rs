pub mod compendium;
pub mod detail;
pub mod editing;
pub mod folders;
pub mod logging;
pub mod models;
pub mod repository;
pub mod search;
pub mod spellcasting;
pub mod sync;
