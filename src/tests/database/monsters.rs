//! Monster Database Tests
//!
//! Storage of monsters through `MonsterOps` and `LocalRepository`.

use crate::core::models::{MonsterStatus, MonsterType};
use crate::core::repository::MonsterRepository;
use crate::database::{current_version, MonsterOps, SCHEMA_VERSION};
use crate::tests::common::{
    adult_red_dragon, create_test_db, create_test_repository, goblin, lich,
};

#[tokio::test]
async fn test_migrations_reach_schema_version() {
    let (db, _temp) = create_test_db().await;
    let version = current_version(db.pool()).await.expect("Failed to read version");
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_reopen_keeps_data_and_skips_migrations() {
    let (repo, temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin()], false).await.expect("Failed to save");
    drop(repo);

    let db = crate::database::Database::new(temp.path())
        .await
        .expect("Failed to reopen");
    assert_eq!(db.count_monsters().await.expect("Failed to count"), 1);
    assert_eq!(current_version(db.pool()).await.unwrap(), SCHEMA_VERSION);
}

#[tokio::test]
async fn test_full_monster_round_trip() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![lich()], false).await.expect("Failed to save");

    let loaded = repo
        .get_monster("lich".to_string())
        .await
        .expect("Failed to load")
        .expect("Lich missing");
    assert_eq!(loaded, lich());
    assert_eq!(loaded.legendary_actions.len(), 1);
    assert_eq!(loaded.spellcastings[0].usages[0].spells.len(), 2);
}

#[tokio::test]
async fn test_previews_carry_list_columns_only() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![lich(), adult_red_dragon()], false)
        .await
        .expect("Failed to save");

    let previews = repo.get_monster_previews().await.expect("Failed to load");
    assert_eq!(previews.len(), 2);

    // Ordered by name
    assert_eq!(previews[0].index, "adult-red-dragon");
    assert_eq!(previews[0].group.as_deref(), Some("Dragons, Chromatic"));
    assert_eq!(previews[0].monster_type, MonsterType::Dragon);
    assert!(previews[0].legendary_actions.is_empty());
    assert!(previews[1].spellcastings.is_empty());
    assert_eq!(previews[1].source_name, "Monster Manual");
}

#[tokio::test]
async fn test_get_by_indexes_skips_unknown() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich()], false)
        .await
        .expect("Failed to save");

    let found = repo
        .get_monsters_by_indexes(vec!["lich".into(), "tarrasque".into()])
        .await
        .expect("Failed to load");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, "lich");

    let none = repo.get_monsters_by_indexes(Vec::new()).await.expect("Failed to load");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_sync_save_replaces_only_imported() {
    let (repo, _temp) = create_test_repository().await;

    let mut edited = goblin();
    edited.status = MonsterStatus::Edited;
    edited.name = "Goblin (house rules)".to_string();
    repo.save_monsters(vec![edited, lich(), adult_red_dragon()], false)
        .await
        .expect("Failed to save");

    // Upstream dropped the dragon
    repo.save_monsters(vec![lich()], true).await.expect("Failed to sync");

    let mut indexes: Vec<String> = repo
        .get_monsters()
        .await
        .expect("Failed to load")
        .into_iter()
        .map(|m| m.index)
        .collect();
    indexes.sort();
    assert_eq!(indexes, vec!["goblin", "lich"]);

    let goblin = repo.get_monster("goblin".into()).await.unwrap().unwrap();
    assert_eq!(goblin.status, MonsterStatus::Edited);
    assert_eq!(goblin.name, "Goblin (house rules)");
}

#[tokio::test]
async fn test_status_filter_and_delete() {
    let (repo, _temp) = create_test_repository().await;
    let mut clone = goblin();
    clone.index = "goblin-chief".to_string();
    clone.status = MonsterStatus::Clone;
    repo.save_monsters(vec![goblin(), clone], false)
        .await
        .expect("Failed to save");

    let local = repo
        .get_monsters_by_status(vec![MonsterStatus::Edited, MonsterStatus::Clone])
        .await
        .expect("Failed to filter");
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].index, "goblin-chief");

    repo.delete_monster("goblin-chief".into()).await.expect("Failed to delete");
    assert!(repo.get_monster("goblin-chief".into()).await.unwrap().is_none());
    assert!(repo.get_monster("goblin".into()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_many_indexes_are_chunked() {
    let (repo, _temp) = create_test_repository().await;
    let monsters: Vec<_> = (0..1200)
        .map(|i| {
            let mut m = goblin();
            m.index = format!("goblin-{i}");
            m
        })
        .collect();
    repo.save_monsters(monsters, false).await.expect("Failed to save");

    let indexes: Vec<String> = (0..1200).map(|i| format!("goblin-{i}")).collect();
    let found = repo.get_monsters_by_indexes(indexes).await.expect("Failed to load");
    assert_eq!(found.len(), 1200);
}
