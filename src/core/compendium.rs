//! Alphabetical compendium of monster previews.

use std::sync::Arc;

use serde::Serialize;

use super::models::Monster;
use super::repository::{MonsterRepository, RepoResult};
use super::search::normalize::fold;

/// Sort key: the monster's group (or its name when ungrouped), then its name.
fn sort_key(monster: &Monster) -> (String, String) {
    let head = monster.group.as_deref().unwrap_or(&monster.name);
    (fold(head), fold(&monster.name))
}

/// Sort so that grouped monsters ("Dragon, Red", "Dragon, Blue") stay together.
pub fn sort_monsters_by_name_and_group(monsters: &mut [Monster]) {
    monsters.sort_by_cached_key(sort_key);
}

fn initial_of(monster: &Monster) -> char {
    sort_key(monster)
        .0
        .chars()
        .next()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('#')
}

#[derive(Debug, Clone, Serialize)]
pub struct CompendiumSection {
    pub initial: char,
    pub monsters: Vec<Monster>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MonsterCompendium {
    pub sections: Vec<CompendiumSection>,
}

impl MonsterCompendium {
    pub fn from_monsters(mut monsters: Vec<Monster>) -> Self {
        sort_monsters_by_name_and_group(&mut monsters);

        let mut sections: Vec<CompendiumSection> = Vec::new();
        for monster in monsters {
            let initial = initial_of(&monster);
            match sections.last_mut() {
                Some(section) if section.initial == initial => section.monsters.push(monster),
                _ => sections.push(CompendiumSection {
                    initial,
                    monsters: vec![monster],
                }),
            }
        }
        Self { sections }
    }

    /// Section initials, in display order.
    pub fn alphabet(&self) -> Vec<char> {
        self.sections.iter().map(|s| s.initial).collect()
    }

    pub fn section_index(&self, initial: char) -> Option<usize> {
        let initial = initial.to_ascii_uppercase();
        self.sections.iter().position(|s| s.initial == initial)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.monsters.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub struct CompendiumService {
    monsters: Arc<dyn MonsterRepository>,
}

impl CompendiumService {
    pub fn new(monsters: Arc<dyn MonsterRepository>) -> Self {
        Self { monsters }
    }

    pub async fn get_compendium(&self) -> RepoResult<MonsterCompendium> {
        let previews = self.monsters.get_monster_previews().await?;
        Ok(MonsterCompendium::from_monsters(previews))
    }
}
