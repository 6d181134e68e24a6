//! Spell Database Tests

use crate::core::models::{SchoolOfMagic, SpellStatus};
use crate::core::repository::SpellRepository;
use crate::tests::common::{create_test_repository, spell, spellbook};

#[tokio::test]
async fn test_spells_by_ids() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_spells(spellbook(), false).await.expect("Failed to save");

    let found = repo
        .get_spells_by_ids(vec!["fireball".into(), "wish".into()])
        .await
        .expect("Failed to load");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Fireball");
    assert_eq!(found[0].school, SchoolOfMagic::Evocation);
    assert_eq!(found[0].level, 3);
}

#[tokio::test]
async fn test_sync_keeps_edited_spells() {
    let (repo, _temp) = create_test_repository().await;

    let mut edited = spell("fireball", "Fireball (8d6 → 10d6)", 3, SchoolOfMagic::Evocation);
    edited.status = SpellStatus::Edited;
    repo.save_spells(
        vec![edited, spell("mage-hand", "Mage Hand", 0, SchoolOfMagic::Conjuration)],
        false,
    )
    .await
    .expect("Failed to save");

    repo.save_spells(vec![spell("wish", "Wish", 9, SchoolOfMagic::Conjuration)], true)
        .await
        .expect("Failed to sync");

    assert!(repo.get_spell("mage-hand".into()).await.unwrap().is_none());
    assert!(repo.get_spell("wish".into()).await.unwrap().is_some());

    let edited = repo.get_spells_edited().await.expect("Failed to load");
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].name, "Fireball (8d6 → 10d6)");
}

#[tokio::test]
async fn test_unknown_spell_is_none() {
    let (repo, _temp) = create_test_repository().await;
    assert!(repo.get_spell("wish".into()).await.unwrap().is_none());
}
