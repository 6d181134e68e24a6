//! Monster domain model.
//!
//! A monster is stored locally as indexed scalar columns (enough to render a
//! preview) plus the full record as JSON. Previews are `Monster` values whose
//! nested collections are empty.

use serde::{Deserialize, Serialize};

use super::spell::SchoolOfMagic;

// ============================================================================
// Classification
// ============================================================================

/// Creature type of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterType {
    Aberration,
    Beast,
    Celestial,
    Construct,
    Dragon,
    Elemental,
    Fey,
    Fiend,
    Giant,
    Humanoid,
    Monstrosity,
    Ooze,
    Plant,
    Undead,
}

impl MonsterType {
    pub const ALL: [MonsterType; 14] = [
        MonsterType::Aberration,
        MonsterType::Beast,
        MonsterType::Celestial,
        MonsterType::Construct,
        MonsterType::Dragon,
        MonsterType::Elemental,
        MonsterType::Fey,
        MonsterType::Fiend,
        MonsterType::Giant,
        MonsterType::Humanoid,
        MonsterType::Monstrosity,
        MonsterType::Ooze,
        MonsterType::Plant,
        MonsterType::Undead,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MonsterType::Aberration => "aberration",
            MonsterType::Beast => "beast",
            MonsterType::Celestial => "celestial",
            MonsterType::Construct => "construct",
            MonsterType::Dragon => "dragon",
            MonsterType::Elemental => "elemental",
            MonsterType::Fey => "fey",
            MonsterType::Fiend => "fiend",
            MonsterType::Giant => "giant",
            MonsterType::Humanoid => "humanoid",
            MonsterType::Monstrosity => "monstrosity",
            MonsterType::Ooze => "ooze",
            MonsterType::Plant => "plant",
            MonsterType::Undead => "undead",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Where a local monster record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterStatus {
    /// Delivered by remote sync or a content import. Replaced on every sync.
    #[default]
    Imported,
    /// Imported monster modified locally. Sync never overwrites it.
    Edited,
    /// Local copy of another monster under a new index.
    Clone,
}

impl MonsterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MonsterStatus::Imported => "imported",
            MonsterStatus::Edited => "edited",
            MonsterStatus::Clone => "clone",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "imported" => Some(MonsterStatus::Imported),
            "edited" => Some(MonsterStatus::Edited),
            "clone" => Some(MonsterStatus::Clone),
            _ => None,
        }
    }

    /// Local statuses that a sync must leave untouched.
    pub fn is_local_change(self) -> bool {
        matches!(self, MonsterStatus::Edited | MonsterStatus::Clone)
    }
}

// ============================================================================
// Display data
// ============================================================================

/// Light/dark background pair for the monster artwork.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundColor {
    pub light: String,
    pub dark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterImageData {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub background_color: BackgroundColor,
    #[serde(default)]
    pub is_horizontal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub armor_class: i32,
    pub hit_points: i32,
    pub hit_dice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    /// Ability name, e.g. "strength".
    pub ability: String,
    pub value: i32,
    pub modifier: i32,
}

/// A named block of rules text (trait, action, reaction, legendary action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDescription {
    pub name: String,
    pub description: String,
}

// ============================================================================
// Spellcasting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellcastingType {
    #[default]
    Spellcaster,
    Innate,
}

/// A spell as referenced from a monster stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellPreview {
    pub index: String,
    pub name: String,
    pub level: i32,
    pub school: SchoolOfMagic,
}

/// Spells grouped by how often they can be cast ("at will", "3/day each", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellUsage {
    pub group: String,
    pub spells: Vec<SpellPreview>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spellcasting {
    #[serde(default)]
    pub spellcasting_type: SpellcastingType,
    #[serde(default)]
    pub description: String,
    pub usages: Vec<SpellUsage>,
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub index: String,
    pub name: String,
    pub monster_type: MonsterType,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub challenge_rating: f32,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_data: MonsterImageData,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub status: MonsterStatus,
    #[serde(default)]
    pub ability_scores: Vec<AbilityScore>,
    #[serde(default)]
    pub special_abilities: Vec<AbilityDescription>,
    #[serde(default)]
    pub actions: Vec<AbilityDescription>,
    #[serde(default)]
    pub reactions: Vec<AbilityDescription>,
    #[serde(default)]
    pub legendary_actions: Vec<AbilityDescription>,
    #[serde(default)]
    pub spellcastings: Vec<Spellcasting>,
}

impl Monster {
    /// Minimal monster with every optional field empty.
    pub fn new(
        index: impl Into<String>,
        name: impl Into<String>,
        monster_type: MonsterType,
        challenge_rating: f32,
    ) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            monster_type,
            subtype: None,
            group: None,
            challenge_rating,
            subtitle: String::new(),
            image_data: MonsterImageData::default(),
            size: String::new(),
            alignment: String::new(),
            stats: Stats::default(),
            source_name: String::new(),
            status: MonsterStatus::Imported,
            ability_scores: Vec::new(),
            special_abilities: Vec::new(),
            actions: Vec::new(),
            reactions: Vec::new(),
            legendary_actions: Vec::new(),
            spellcastings: Vec::new(),
        }
    }

    pub fn challenge_rating_formatted(&self) -> String {
        format_challenge_rating(self.challenge_rating)
    }

    /// Iterate every spell preview across all spellcastings and usages.
    pub fn spell_previews(&self) -> impl Iterator<Item = &SpellPreview> {
        self.spellcastings
            .iter()
            .flat_map(|sc| sc.usages.iter())
            .flat_map(|usage| usage.spells.iter())
    }
}

/// Render a challenge rating the way stat blocks print it.
pub fn format_challenge_rating(cr: f32) -> String {
    const FRACTIONS: [(f32, &str); 3] = [(0.125, "1/8"), (0.25, "1/4"), (0.5, "1/2")];

    if let Some((_, label)) = FRACTIONS
        .iter()
        .find(|(value, _)| (cr - value).abs() < f32::EPSILON)
    {
        return (*label).to_string();
    }
    if cr.fract() == 0.0 {
        format!("{}", cr as i64)
    } else {
        format!("{cr}")
    }
}

/// List projection of a monster, as rendered in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMonsterResult {
    pub index: String,
    pub name: String,
    pub monster_type: MonsterType,
    pub challenge_rating: String,
    pub image_url: String,
    pub background_color_light: String,
    pub background_color_dark: String,
    pub is_horizontal_image: bool,
}

impl From<&Monster> for SearchMonsterResult {
    fn from(monster: &Monster) -> Self {
        Self {
            index: monster.index.clone(),
            name: monster.name.clone(),
            monster_type: monster.monster_type,
            challenge_rating: monster.challenge_rating_formatted(),
            image_url: monster.image_data.url.clone(),
            background_color_light: monster.image_data.background_color.light.clone(),
            background_color_dark: monster.image_data.background_color.dark.clone(),
            is_horizontal_image: monster.image_data.is_horizontal,
        }
    }
}
