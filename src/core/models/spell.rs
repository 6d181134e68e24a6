//! Spell domain model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolOfMagic {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SchoolOfMagic {
    pub fn as_str(self) -> &'static str {
        match self {
            SchoolOfMagic::Abjuration => "abjuration",
            SchoolOfMagic::Conjuration => "conjuration",
            SchoolOfMagic::Divination => "divination",
            SchoolOfMagic::Enchantment => "enchantment",
            SchoolOfMagic::Evocation => "evocation",
            SchoolOfMagic::Illusion => "illusion",
            SchoolOfMagic::Necromancy => "necromancy",
            SchoolOfMagic::Transmutation => "transmutation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellStatus {
    #[default]
    Imported,
    Edited,
}

impl SpellStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SpellStatus::Imported => "imported",
            SpellStatus::Edited => "edited",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "imported" => Some(SpellStatus::Imported),
            "edited" => Some(SpellStatus::Edited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub index: String,
    pub name: String,
    /// 0 for cantrips.
    pub level: i32,
    pub school: SchoolOfMagic,
    #[serde(default)]
    pub casting_time: String,
    #[serde(default)]
    pub components: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub higher_level: Option<String>,
    #[serde(default)]
    pub status: SpellStatus,
}

impl Spell {
    pub fn new(
        index: impl Into<String>,
        name: impl Into<String>,
        level: i32,
        school: SchoolOfMagic,
    ) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            level,
            school,
            casting_time: String::new(),
            components: String::new(),
            duration: String::new(),
            range: String::new(),
            ritual: false,
            concentration: false,
            description: String::new(),
            higher_level: None,
            status: SpellStatus::Imported,
        }
    }
}
