//! User folders of monsters.
//!
//! Monsters are first collected in the folder preview, a single staging
//! list that survives restarts, and then saved under a folder name. Saving
//! empties the preview. Folders exist as long as they hold at least one
//! entry.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::models::{FolderSummary, Monster, MonsterFolder, SearchMonsterResult};
use super::repository::{FolderRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum FolderError {
    #[error("Invalid folder name: '{0}'")]
    InvalidName(String),

    #[error("Folder not found: {0}")]
    NotFound(String),

    #[error("The folder preview is empty")]
    EmptyPreview,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, FolderError>;

/// Trimmed name with inner whitespace collapsed; `None` when blank.
pub fn normalize_folder_name(name: &str) -> Option<String> {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    (!name.is_empty()).then_some(name)
}

fn results(monsters: &[Monster]) -> Vec<SearchMonsterResult> {
    monsters.iter().map(SearchMonsterResult::from).collect()
}

/// Whether a toggle put the monster into the preview or took it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewChange {
    Added,
    Removed,
}

pub struct FolderService {
    folders: Arc<dyn FolderRepository>,
}

impl FolderService {
    pub fn new(folders: Arc<dyn FolderRepository>) -> Self {
        Self { folders }
    }

    fn folder_name(name: &str) -> Result<String> {
        normalize_folder_name(name).ok_or_else(|| FolderError::InvalidName(name.to_string()))
    }

    /// Folders sorted by name, ignoring case.
    pub async fn get_folders(&self) -> Result<Vec<FolderSummary>> {
        Ok(self.folders.get_folders().await?)
    }

    pub async fn get_folder(&self, name: &str) -> Result<MonsterFolder> {
        let name = Self::folder_name(name)?;
        let monsters = self.folders.get_folder_monsters(name.clone()).await?;
        if monsters.is_empty() {
            return Err(FolderError::NotFound(name));
        }
        Ok(MonsterFolder {
            name,
            monsters: results(&monsters),
        })
    }

    /// Add monsters to `name`, creating the folder on first use. Monsters
    /// already in the folder keep their place.
    pub async fn add_monsters(&self, name: &str, indexes: Vec<String>) -> Result<MonsterFolder> {
        let name = Self::folder_name(name)?;
        let mut seen = HashSet::new();
        let indexes: Vec<String> = indexes
            .into_iter()
            .filter(|index| seen.insert(index.clone()))
            .collect();

        self.folders.add_to_folder(name.clone(), indexes).await?;
        let monsters = self.folders.get_folder_monsters(name.clone()).await?;
        info!(folder = %name, monsters = monsters.len(), "Folder updated");
        Ok(MonsterFolder {
            name,
            monsters: results(&monsters),
        })
    }

    /// Remove monsters from `name`. Removing the last one deletes the folder.
    pub async fn remove_monsters(&self, name: &str, indexes: Vec<String>) -> Result<MonsterFolder> {
        let name = Self::folder_name(name)?;
        self.folders.remove_from_folder(name.clone(), indexes).await?;
        let monsters = self.folders.get_folder_monsters(name.clone()).await?;
        Ok(MonsterFolder {
            name,
            monsters: results(&monsters),
        })
    }

    pub async fn delete_folder(&self, name: &str) -> Result<()> {
        let name = Self::folder_name(name)?;
        if !self.folders.delete_folder(name.clone()).await? {
            return Err(FolderError::NotFound(name));
        }
        info!(folder = %name, "Folder deleted");
        Ok(())
    }

    pub async fn preview(&self) -> Result<Vec<SearchMonsterResult>> {
        Ok(results(&self.folders.get_folder_preview().await?))
    }

    pub async fn add_to_preview(&self, index: &str) -> Result<Vec<SearchMonsterResult>> {
        self.folders.add_to_folder_preview(index.to_string()).await?;
        self.preview().await
    }

    pub async fn remove_from_preview(&self, index: &str) -> Result<Vec<SearchMonsterResult>> {
        self.folders.remove_from_folder_preview(index.to_string()).await?;
        self.preview().await
    }

    /// Add `index` to the preview, or take it out when it is already there.
    pub async fn toggle_preview(&self, index: &str) -> Result<(PreviewChange, Vec<SearchMonsterResult>)> {
        let current = self.folders.get_folder_preview().await?;
        if current.iter().any(|m| m.index == index) {
            Ok((PreviewChange::Removed, self.remove_from_preview(index).await?))
        } else {
            Ok((PreviewChange::Added, self.add_to_preview(index).await?))
        }
    }

    pub async fn clear_preview(&self) -> Result<()> {
        Ok(self.folders.clear_folder_preview().await?)
    }

    /// Save every previewed monster into `name` and empty the preview.
    pub async fn save_preview(&self, name: &str) -> Result<MonsterFolder> {
        let name = Self::folder_name(name)?;
        let preview = self.folders.get_folder_preview().await?;
        if preview.is_empty() {
            return Err(FolderError::EmptyPreview);
        }

        let indexes = preview.into_iter().map(|m| m.index).collect();
        let folder = self.add_monsters(&name, indexes).await?;
        self.folders.clear_folder_preview().await?;
        Ok(folder)
    }
}
