//! Database records
//!
//! Scalar columns back the preview queries and status filters. The full
//! monster or spell is stored as JSON in `data_json`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Columns needed to render a monster in a list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonsterPreviewRecord {
    pub monster_index: String,
    pub name: String,
    pub monster_type: String,
    pub challenge_rating: f64,
    pub group_name: Option<String>,
    pub subtitle: String,
    pub source_name: String,
    pub status: String,
    pub image_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonsterRecord {
    pub monster_index: String,
    pub name: String,
    pub monster_type: String,
    pub challenge_rating: f64,
    pub group_name: Option<String>,
    pub subtitle: String,
    pub source_name: String,
    pub status: String,
    pub image_json: String,
    pub data_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpellRecord {
    pub spell_index: String,
    pub name: String,
    pub level: i32,
    pub school: String,
    pub status: String,
    pub data_json: String,
}

/// One row of the folder listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolderSummaryRecord {
    pub folder_name: String,
    pub monster_count: i64,
}
