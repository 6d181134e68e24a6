//! Search keys and their metadata table.

use std::fmt;

/// The kind of value a key compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchValueType {
    String,
    Boolean,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Name,
    Type,
    Cr,
    Spell,
    Legendary,
    Source,
    Edited,
    Cloned,
    Imported,
}

struct KeyMeta {
    key: SearchKey,
    prefix: &'static str,
    value_type: SearchValueType,
    preview_safe: bool,
}

/// Keys in prefix-matching order, which is also variant order.
const KEYS: &[KeyMeta] = &[
    KeyMeta { key: SearchKey::Name, prefix: "name", value_type: SearchValueType::String, preview_safe: true },
    KeyMeta { key: SearchKey::Type, prefix: "type", value_type: SearchValueType::String, preview_safe: true },
    KeyMeta { key: SearchKey::Cr, prefix: "cr", value_type: SearchValueType::Float, preview_safe: true },
    KeyMeta { key: SearchKey::Spell, prefix: "spell", value_type: SearchValueType::String, preview_safe: false },
    KeyMeta { key: SearchKey::Legendary, prefix: "legendary", value_type: SearchValueType::Boolean, preview_safe: false },
    KeyMeta { key: SearchKey::Source, prefix: "source", value_type: SearchValueType::String, preview_safe: true },
    KeyMeta { key: SearchKey::Edited, prefix: "edited", value_type: SearchValueType::Boolean, preview_safe: true },
    KeyMeta { key: SearchKey::Cloned, prefix: "cloned", value_type: SearchValueType::Boolean, preview_safe: true },
    KeyMeta { key: SearchKey::Imported, prefix: "imported", value_type: SearchValueType::Boolean, preview_safe: true },
];

impl SearchKey {
    pub const ALL: [SearchKey; 9] = [
        SearchKey::Name,
        SearchKey::Type,
        SearchKey::Cr,
        SearchKey::Spell,
        SearchKey::Legendary,
        SearchKey::Source,
        SearchKey::Edited,
        SearchKey::Cloned,
        SearchKey::Imported,
    ];

    fn meta(self) -> &'static KeyMeta {
        // KEYS is declared in variant order
        &KEYS[self as usize]
    }

    /// Query prefix that selects this key, e.g. `"cr"`.
    pub fn prefix(self) -> &'static str {
        self.meta().prefix
    }

    pub fn value_type(self) -> SearchValueType {
        self.meta().value_type
    }

    /// Whether the predicate only reads fields present on preview records.
    pub fn is_preview_safe(self) -> bool {
        self.meta().preview_safe
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Comparison operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Eq => '=',
            Operator::Gt => '>',
            Operator::Lt => '<',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '=' => Some(Operator::Eq),
            '>' => Some(Operator::Gt),
            '<' => Some(Operator::Lt),
            _ => None,
        }
    }
}
