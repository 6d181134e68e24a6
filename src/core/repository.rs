//! Storage seams for the compendium.
//!
//! Domain services depend on these traits, never on `Database` directly, so
//! they can run against SQLite in the app and against fakes or mocks in tests.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{FolderSummary, Monster, MonsterStatus, Spell};

/// Result type alias for repository operations.
pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be mapped back to a domain value.
    #[error("Invalid record '{index}': {reason}")]
    InvalidRecord { index: String, reason: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonsterRepository: Send + Sync {
    /// Lightweight records: scalar fields only, nested collections empty.
    async fn get_monster_previews(&self) -> RepoResult<Vec<Monster>>;

    /// Complete records including spellcastings and legendary actions.
    async fn get_monsters(&self) -> RepoResult<Vec<Monster>>;

    async fn get_monsters_by_indexes(&self, indexes: Vec<String>) -> RepoResult<Vec<Monster>>;

    async fn get_monster(&self, index: String) -> RepoResult<Option<Monster>>;

    async fn get_monsters_by_status(&self, statuses: Vec<MonsterStatus>) -> RepoResult<Vec<Monster>>;

    /// Upsert monsters. With `is_sync` every local `Imported` monster is
    /// replaced by the incoming set; `Edited` and `Clone` rows survive.
    async fn save_monsters(&self, monsters: Vec<Monster>, is_sync: bool) -> RepoResult<()>;

    async fn delete_monster(&self, index: String) -> RepoResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpellRepository: Send + Sync {
    /// Spells for the given indexes; unknown indexes are skipped.
    async fn get_spells_by_ids(&self, indexes: Vec<String>) -> RepoResult<Vec<Spell>>;

    async fn get_spell(&self, index: String) -> RepoResult<Option<Spell>>;

    async fn get_spells_edited(&self) -> RepoResult<Vec<Spell>>;

    /// Upsert spells. With `is_sync` every non-edited local spell is replaced.
    async fn save_spells(&self, spells: Vec<Spell>, is_sync: bool) -> RepoResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_setting(&self, key: String) -> RepoResult<Option<String>>;

    async fn set_setting(&self, key: String, value: String) -> RepoResult<()>;
}

/// User folders plus the single folder preview that collects monsters
/// before they are saved into a folder. Monsters come back as previews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FolderRepository: Send + Sync {
    async fn get_folders(&self) -> RepoResult<Vec<FolderSummary>>;

    async fn get_folder_monsters(&self, name: String) -> RepoResult<Vec<Monster>>;

    async fn add_to_folder(&self, name: String, indexes: Vec<String>) -> RepoResult<()>;

    async fn remove_from_folder(&self, name: String, indexes: Vec<String>) -> RepoResult<()>;

    async fn delete_folder(&self, name: String) -> RepoResult<bool>;

    async fn get_folder_preview(&self) -> RepoResult<Vec<Monster>>;

    async fn add_to_folder_preview(&self, index: String) -> RepoResult<()>;

    async fn remove_from_folder_preview(&self, index: String) -> RepoResult<()>;

    async fn clear_folder_preview(&self) -> RepoResult<()>;
}
