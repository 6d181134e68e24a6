//! SQLite-backed implementation of the core repository traits.
//!
//! The `status` column is authoritative over the status stored inside
//! `data_json`.

use async_trait::async_trait;

use crate::core::models::{
    FolderSummary, Monster, MonsterImageData, MonsterStatus, MonsterType, SchoolOfMagic, Spell, SpellStatus,
};
use crate::core::repository::{
    FolderRepository, MonsterRepository, RepoResult, RepositoryError, SettingsRepository,
    SpellRepository,
};

use super::models::{MonsterPreviewRecord, MonsterRecord, SpellRecord};
use super::{Database, FolderOps, MonsterOps, SettingsOps, SpellOps};

fn invalid(index: &str, reason: impl Into<String>) -> RepositoryError {
    RepositoryError::InvalidRecord {
        index: index.to_string(),
        reason: reason.into(),
    }
}

fn parse_type(index: &str, value: &str) -> RepoResult<MonsterType> {
    MonsterType::from_str(value).ok_or_else(|| invalid(index, format!("unknown monster type '{value}'")))
}

fn parse_status(index: &str, value: &str) -> RepoResult<MonsterStatus> {
    MonsterStatus::from_str(value).ok_or_else(|| invalid(index, format!("unknown status '{value}'")))
}

impl MonsterRecord {
    pub fn from_monster(monster: &Monster) -> RepoResult<Self> {
        Ok(Self {
            monster_index: monster.index.clone(),
            name: monster.name.clone(),
            monster_type: monster.monster_type.as_str().to_string(),
            challenge_rating: f64::from(monster.challenge_rating),
            group_name: monster.group.clone(),
            subtitle: monster.subtitle.clone(),
            source_name: monster.source_name.clone(),
            status: monster.status.as_str().to_string(),
            image_json: serde_json::to_string(&monster.image_data)?,
            data_json: serde_json::to_string(monster)?,
        })
    }

    pub fn into_monster(self) -> RepoResult<Monster> {
        let status = parse_status(&self.monster_index, &self.status)?;
        let mut monster: Monster = serde_json::from_str(&self.data_json)?;
        monster.status = status;
        Ok(monster)
    }
}

impl MonsterPreviewRecord {
    /// Monster with only the list columns set. Stats, abilities and
    /// spellcastings stay empty.
    pub fn into_preview(self) -> RepoResult<Monster> {
        let monster_type = parse_type(&self.monster_index, &self.monster_type)?;
        let status = parse_status(&self.monster_index, &self.status)?;
        let image_data: MonsterImageData = serde_json::from_str(&self.image_json)?;

        let mut monster = Monster::new(
            self.monster_index,
            self.name,
            monster_type,
            self.challenge_rating as f32,
        );
        monster.group = self.group_name;
        monster.subtitle = self.subtitle;
        monster.source_name = self.source_name;
        monster.status = status;
        monster.image_data = image_data;
        Ok(monster)
    }
}

impl SpellRecord {
    pub fn from_spell(spell: &Spell) -> RepoResult<Self> {
        Ok(Self {
            spell_index: spell.index.clone(),
            name: spell.name.clone(),
            level: spell.level,
            school: spell.school.as_str().to_string(),
            status: spell.status.as_str().to_string(),
            data_json: serde_json::to_string(spell)?,
        })
    }

    pub fn into_spell(self) -> RepoResult<Spell> {
        let status = SpellStatus::from_str(&self.status)
            .ok_or_else(|| invalid(&self.spell_index, format!("unknown status '{}'", self.status)))?;
        let mut spell: Spell = serde_json::from_str(&self.data_json)?;
        spell.status = status;
        Ok(spell)
    }
}

fn into_monsters(records: Vec<MonsterRecord>) -> RepoResult<Vec<Monster>> {
    records.into_iter().map(MonsterRecord::into_monster).collect()
}

fn into_previews(records: Vec<MonsterPreviewRecord>) -> RepoResult<Vec<Monster>> {
    records.into_iter().map(MonsterPreviewRecord::into_preview).collect()
}

fn into_spells(records: Vec<SpellRecord>) -> RepoResult<Vec<Spell>> {
    records.into_iter().map(SpellRecord::into_spell).collect()
}

/// Repository over the local SQLite [`Database`].
#[derive(Clone)]
pub struct LocalRepository {
    db: Database,
}

impl LocalRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl MonsterRepository for LocalRepository {
    async fn get_monster_previews(&self) -> RepoResult<Vec<Monster>> {
        into_previews(self.db.list_monster_previews().await?)
    }

    async fn get_monsters(&self) -> RepoResult<Vec<Monster>> {
        into_monsters(self.db.list_monsters().await?)
    }

    async fn get_monsters_by_indexes(&self, indexes: Vec<String>) -> RepoResult<Vec<Monster>> {
        into_monsters(self.db.get_monsters_by_indexes(&indexes).await?)
    }

    async fn get_monster(&self, index: String) -> RepoResult<Option<Monster>> {
        self.db
            .get_monster(&index)
            .await?
            .map(MonsterRecord::into_monster)
            .transpose()
    }

    async fn get_monsters_by_status(&self, statuses: Vec<MonsterStatus>) -> RepoResult<Vec<Monster>> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        into_monsters(self.db.list_monsters_by_status(&statuses).await?)
    }

    async fn save_monsters(&self, monsters: Vec<Monster>, is_sync: bool) -> RepoResult<()> {
        let records = monsters
            .iter()
            .map(MonsterRecord::from_monster)
            .collect::<RepoResult<Vec<_>>>()?;
        self.db.save_monsters(&records, is_sync).await?;
        Ok(())
    }

    async fn delete_monster(&self, index: String) -> RepoResult<()> {
        self.db.delete_monster(&index).await?;
        Ok(())
    }
}

#[async_trait]
impl SpellRepository for LocalRepository {
    async fn get_spells_by_ids(&self, indexes: Vec<String>) -> RepoResult<Vec<Spell>> {
        into_spells(self.db.get_spells_by_indexes(&indexes).await?)
    }

    async fn get_spell(&self, index: String) -> RepoResult<Option<Spell>> {
        self.db
            .get_spell(&index)
            .await?
            .map(SpellRecord::into_spell)
            .transpose()
    }

    async fn get_spells_edited(&self) -> RepoResult<Vec<Spell>> {
        into_spells(
            self.db
                .list_spells_by_status(SpellStatus::Edited.as_str())
                .await?,
        )
    }

    async fn save_spells(&self, spells: Vec<Spell>, is_sync: bool) -> RepoResult<()> {
        let records = spells
            .iter()
            .map(SpellRecord::from_spell)
            .collect::<RepoResult<Vec<_>>>()?;
        self.db.save_spells(&records, is_sync).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn get_setting(&self, key: String) -> RepoResult<Option<String>> {
        Ok(SettingsOps::get_setting(&self.db, &key).await?)
    }

    async fn set_setting(&self, key: String, value: String) -> RepoResult<()> {
        Ok(SettingsOps::set_setting(&self.db, &key, &value).await?)
    }
}

#[async_trait]
impl FolderRepository for LocalRepository {
    async fn get_folders(&self) -> RepoResult<Vec<FolderSummary>> {
        Ok(self
            .db
            .list_folders()
            .await?
            .into_iter()
            .map(|r| FolderSummary {
                name: r.folder_name,
                monster_count: usize::try_from(r.monster_count).unwrap_or_default(),
            })
            .collect())
    }

    async fn get_folder_monsters(&self, name: String) -> RepoResult<Vec<Monster>> {
        into_previews(self.db.list_folder_monsters(&name).await?)
    }

    async fn add_to_folder(&self, name: String, indexes: Vec<String>) -> RepoResult<()> {
        Ok(self.db.add_to_folder(&name, &indexes).await?)
    }

    async fn remove_from_folder(&self, name: String, indexes: Vec<String>) -> RepoResult<()> {
        self.db.remove_from_folder(&name, &indexes).await?;
        Ok(())
    }

    async fn delete_folder(&self, name: String) -> RepoResult<bool> {
        Ok(self.db.delete_folder(&name).await?)
    }

    async fn get_folder_preview(&self) -> RepoResult<Vec<Monster>> {
        into_previews(self.db.list_folder_preview().await?)
    }

    async fn add_to_folder_preview(&self, index: String) -> RepoResult<()> {
        Ok(self.db.add_to_folder_preview(&index).await?)
    }

    async fn remove_from_folder_preview(&self, index: String) -> RepoResult<()> {
        self.db.remove_from_folder_preview(&index).await?;
        Ok(())
    }

    async fn clear_folder_preview(&self) -> RepoResult<()> {
        Ok(self.db.clear_folder_preview().await?)
    }
}
