//! Local monster edits: edit, clone and reset.
//!
//! Every operation writes to the local store and invalidates the search
//! cache so that the next search reloads.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::models::{Monster, MonsterStatus};
use super::repository::{MonsterRepository, RepositoryError};
use super::search::normalize::fold;
use super::search::MonsterSearchCache;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Monster not found: {0}")]
    NotFound(String),

    #[error("Monster '{0}' has no local changes to reset")]
    NotLocal(String),

    #[error("A monster with index '{0}' already exists")]
    DuplicateIndex(String),

    #[error("Invalid monster name: '{0}'")]
    InvalidName(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Kebab-case index derived from a display name ("Goblin Bôss" → "goblin-boss").
pub fn slugify(name: &str) -> String {
    fold(name)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub struct MonsterEditor {
    monsters: Arc<dyn MonsterRepository>,
    cache: Arc<MonsterSearchCache>,
}

impl MonsterEditor {
    pub fn new(monsters: Arc<dyn MonsterRepository>, cache: Arc<MonsterSearchCache>) -> Self {
        Self { monsters, cache }
    }

    /// Store a modified monster. Imported monsters become `Edited`.
    pub async fn edit(&self, mut monster: Monster) -> Result<Monster, EditError> {
        if monster.status == MonsterStatus::Imported {
            monster.status = MonsterStatus::Edited;
        }
        self.monsters.save_monsters(vec![monster.clone()], false).await?;
        self.cache.invalidate().await;
        info!(index = %monster.index, status = monster.status.as_str(), "Monster edited");
        Ok(monster)
    }

    /// Copy `index` under a new name and index.
    pub async fn clone_monster(&self, index: &str, new_name: &str) -> Result<Monster, EditError> {
        let new_index = slugify(new_name);
        if new_index.is_empty() {
            return Err(EditError::InvalidName(new_name.to_string()));
        }
        if self.monsters.get_monster(new_index.clone()).await?.is_some() {
            return Err(EditError::DuplicateIndex(new_index));
        }

        let mut clone = self
            .monsters
            .get_monster(index.to_string())
            .await?
            .ok_or_else(|| EditError::NotFound(index.to_string()))?;
        clone.index = new_index;
        clone.name = new_name.trim().to_string();
        clone.status = MonsterStatus::Clone;

        self.monsters.save_monsters(vec![clone.clone()], false).await?;
        self.cache.invalidate().await;
        info!(source = index, index = %clone.index, "Monster cloned");
        Ok(clone)
    }

    /// Delete a locally edited or cloned monster. An edited monster comes
    /// back in its imported form on the next sync.
    pub async fn reset(&self, index: &str) -> Result<(), EditError> {
        let monster = self
            .monsters
            .get_monster(index.to_string())
            .await?
            .ok_or_else(|| EditError::NotFound(index.to_string()))?;
        if !monster.status.is_local_change() {
            return Err(EditError::NotLocal(index.to_string()));
        }

        self.monsters.delete_monster(index.to_string()).await?;
        self.cache.invalidate().await;
        info!(index, "Local monster reset");
        Ok(())
    }
}
