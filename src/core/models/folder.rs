use serde::{Deserialize, Serialize};

use super::SearchMonsterResult;

/// A user folder as listed: name and how many stored monsters it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub name: String,
    pub monster_count: usize,
}

/// A folder's monsters, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterFolder {
    pub name: String,
    pub monsters: Vec<SearchMonsterResult>,
}
