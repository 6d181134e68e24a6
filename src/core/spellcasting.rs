//! Spell resolution for monster spellcastings.
//!
//! Monster records reference spells by index. Before a monster is shown in
//! detail or searched by spell name, the references are resolved against the
//! spell store. Search and detail both go through [`resolve_spellcastings`].

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::models::{Monster, Spell, SpellUsage, Spellcasting};
use super::repository::{RepoResult, SpellRepository};

/// Every spell index referenced by `monsters`, deduplicated, first-seen order.
pub fn collect_spell_indexes(monsters: &[Monster]) -> Vec<String> {
    let mut seen = HashSet::new();
    monsters
        .iter()
        .flat_map(|m| m.spell_previews())
        .filter(|preview| seen.insert(preview.index.as_str()))
        .map(|preview| preview.index.clone())
        .collect()
}

/// Replace spell previews with resolved spell data.
///
/// Previews whose spell is unknown are dropped, then usages left without
/// spells, then spellcastings left without usages.
pub fn append_spells(monsters: Vec<Monster>, spells: &[Spell]) -> Vec<Monster> {
    let by_index: HashMap<&str, &Spell> = spells.iter().map(|s| (s.index.as_str(), s)).collect();

    monsters
        .into_iter()
        .map(|mut monster| {
            monster.spellcastings = std::mem::take(&mut monster.spellcastings)
                .into_iter()
                .filter_map(|spellcasting| resolve_spellcasting(spellcasting, &by_index))
                .collect();
            monster
        })
        .collect()
}

fn resolve_spellcasting(
    spellcasting: Spellcasting,
    by_index: &HashMap<&str, &Spell>,
) -> Option<Spellcasting> {
    let usages: Vec<SpellUsage> = spellcasting
        .usages
        .into_iter()
        .filter_map(|usage| {
            let spells: Vec<_> = usage
                .spells
                .into_iter()
                .filter_map(|mut preview| {
                    let spell = by_index.get(preview.index.as_str())?;
                    preview.name = spell.name.clone();
                    preview.level = spell.level;
                    preview.school = spell.school;
                    Some(preview)
                })
                .collect();
            (!spells.is_empty()).then_some(SpellUsage {
                group: usage.group,
                spells,
            })
        })
        .collect();

    (!usages.is_empty()).then_some(Spellcasting {
        usages,
        ..spellcasting
    })
}

/// Fetch the spells referenced by `monsters` and append them.
pub async fn resolve_spellcastings(
    spells: &dyn SpellRepository,
    monsters: Vec<Monster>,
) -> RepoResult<Vec<Monster>> {
    let indexes = collect_spell_indexes(&monsters);
    let resolved = if indexes.is_empty() {
        Vec::new()
    } else {
        spells.get_spells_by_ids(indexes).await?
    };
    debug!(
        monsters = monsters.len(),
        spells = resolved.len(),
        "Resolved monster spellcastings"
    );
    Ok(append_spells(monsters, &resolved))
}
