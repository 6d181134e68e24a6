//! Clause evaluation against monster records.

use crate::core::models::{Monster, MonsterStatus};

use super::key::{Operator, SearchKey};
use super::normalize::{contains_folded, fold};
use super::parser::SearchClause;

/// Apply every clause in order; each one filters the survivors of the previous.
pub fn filter_monsters<'a>(monsters: &'a [Monster], clauses: &[SearchClause]) -> Vec<&'a Monster> {
    let mut candidates: Vec<&Monster> = monsters.iter().collect();
    for clause in clauses {
        if candidates.is_empty() {
            break;
        }
        let value = fold(&clause.value);
        candidates.retain(|monster| matches_folded(monster, clause.key, clause.operator, &value));
    }
    candidates
}

/// Whether `monster` satisfies `clause`.
pub fn matches(monster: &Monster, clause: &SearchClause) -> bool {
    matches_folded(monster, clause.key, clause.operator, &fold(&clause.value))
}

fn matches_folded(monster: &Monster, key: SearchKey, operator: Operator, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    match key {
        SearchKey::Name => by_name(monster, value),
        SearchKey::Type => contains_folded(monster.monster_type.as_str(), value),
        SearchKey::Cr => by_challenge_rating(monster, operator, value),
        SearchKey::Spell => by_spell(monster, value),
        SearchKey::Legendary => !monster.legendary_actions.is_empty(),
        SearchKey::Source => contains_folded(&monster.source_name, value),
        SearchKey::Edited => monster.status == MonsterStatus::Edited,
        SearchKey::Cloned => monster.status == MonsterStatus::Clone,
        SearchKey::Imported => monster.status == MonsterStatus::Imported,
    }
}

/// Indexes are kebab-case slugs; compare them with spaces.
fn index_words(index: &str) -> String {
    index.replace('-', " ").to_lowercase()
}

fn by_name(monster: &Monster, value: &str) -> bool {
    contains_folded(&monster.name, value) || index_words(&monster.index).contains(value)
}

fn by_challenge_rating(monster: &Monster, operator: Operator, value: &str) -> bool {
    let Ok(threshold) = value.parse::<f32>() else {
        return false;
    };
    match operator {
        Operator::Gt => monster.challenge_rating > threshold,
        Operator::Lt => monster.challenge_rating < threshold,
        Operator::Eq => monster.challenge_rating == threshold,
    }
}

fn by_spell(monster: &Monster, value: &str) -> bool {
    monster
        .spell_previews()
        .any(|spell| contains_folded(&spell.name, value) || index_words(&spell.index).contains(value))
}
