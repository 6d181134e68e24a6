//! Monster detail use cases.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::compendium::sort_monsters_by_name_and_group;
use super::models::Monster;
use super::repository::{MonsterRepository, RepositoryError, SpellRepository};
use super::spellcasting::resolve_spellcastings;

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Monster not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct MonsterDetailService {
    monsters: Arc<dyn MonsterRepository>,
    spells: Arc<dyn SpellRepository>,
}

impl MonsterDetailService {
    pub fn new(monsters: Arc<dyn MonsterRepository>, spells: Arc<dyn SpellRepository>) -> Self {
        Self { monsters, spells }
    }

    /// One monster with its spellcastings resolved.
    pub async fn get_monster(&self, index: &str) -> Result<Monster, DetailError> {
        let monster = self
            .monsters
            .get_monster(index.to_string())
            .await?
            .ok_or_else(|| DetailError::NotFound(index.to_string()))?;

        let mut resolved = resolve_spellcastings(self.spells.as_ref(), vec![monster]).await?;
        resolved
            .pop()
            .ok_or_else(|| DetailError::NotFound(index.to_string()))
    }

    /// The whole compendium in display order, plus the position of `index`
    /// in it. Used to page through monsters starting from one of them.
    pub async fn get_monsters_by_initial_index(
        &self,
        index: &str,
    ) -> Result<(usize, Vec<Monster>), DetailError> {
        let monsters = self.monsters.get_monsters().await?;
        let mut monsters = resolve_spellcastings(self.spells.as_ref(), monsters).await?;
        sort_monsters_by_name_and_group(&mut monsters);

        let position = monsters
            .iter()
            .position(|m| m.index == index)
            .ok_or_else(|| DetailError::NotFound(index.to_string()))?;

        debug!(index, position, total = monsters.len(), "Loaded monster detail list");
        Ok((position, monsters))
    }
}
