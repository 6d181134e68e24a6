//! Folder Database Tests
//!
//! `FolderOps` on SQLite: insertion order, joins against stored monsters,
//! and the folder preview.

use crate::core::repository::MonsterRepository;
use crate::database::FolderOps;
use crate::tests::common::{adult_red_dragon, create_test_repository, goblin, lich};

fn indexes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_folder_keeps_insertion_order() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich(), adult_red_dragon()], false)
        .await
        .expect("Failed to save");
    let db = repo.database();

    db.add_to_folder("Tomb", &indexes(&["lich", "goblin"])).await.unwrap();
    db.add_to_folder("Tomb", &indexes(&["adult-red-dragon", "lich"])).await.unwrap();

    let monsters = db.list_folder_monsters("Tomb").await.unwrap();
    let order: Vec<_> = monsters.iter().map(|m| m.monster_index.as_str()).collect();
    assert_eq!(order, vec!["lich", "goblin", "adult-red-dragon"]);
    assert_eq!(monsters[0].name, "Lich");
}

#[tokio::test]
async fn test_folders_listed_by_name_with_counts() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich()], false).await.expect("Failed to save");
    let db = repo.database();

    db.add_to_folder("undead", &indexes(&["lich"])).await.unwrap();
    db.add_to_folder("Goblin Camp", &indexes(&["goblin", "lich"])).await.unwrap();

    let folders = db.list_folders().await.unwrap();
    let listed: Vec<_> = folders
        .iter()
        .map(|f| (f.folder_name.as_str(), f.monster_count))
        .collect();
    assert_eq!(listed, vec![("Goblin Camp", 2), ("undead", 1)]);
}

#[tokio::test]
async fn test_missing_monsters_are_skipped() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin()], false).await.expect("Failed to save");
    let db = repo.database();

    db.add_to_folder("Mixed", &indexes(&["goblin", "tarrasque"])).await.unwrap();
    db.add_to_folder("Ghosts", &indexes(&["tarrasque"])).await.unwrap();

    let monsters = db.list_folder_monsters("Mixed").await.unwrap();
    assert_eq!(monsters.len(), 1);

    let names: Vec<_> = db
        .list_folders()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.folder_name)
        .collect();
    assert_eq!(names, vec!["Mixed"]);
}

#[tokio::test]
async fn test_remove_and_delete_folder() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich()], false).await.expect("Failed to save");
    let db = repo.database();

    db.add_to_folder("Camp", &indexes(&["goblin", "lich"])).await.unwrap();
    let removed = db
        .remove_from_folder("Camp", &indexes(&["lich", "unknown"]))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(db.list_folder_monsters("Camp").await.unwrap().len(), 1);

    assert!(db.delete_folder("Camp").await.unwrap());
    assert!(!db.delete_folder("Camp").await.unwrap());
    assert!(db.list_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_folder_preview_lifecycle() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich()], false).await.expect("Failed to save");
    let db = repo.database();

    db.add_to_folder_preview("lich").await.unwrap();
    db.add_to_folder_preview("goblin").await.unwrap();
    db.add_to_folder_preview("lich").await.unwrap();

    let preview = db.list_folder_preview().await.unwrap();
    let order: Vec<_> = preview.iter().map(|m| m.monster_index.as_str()).collect();
    assert_eq!(order, vec!["lich", "goblin"]);

    assert!(db.remove_from_folder_preview("lich").await.unwrap());
    assert!(!db.remove_from_folder_preview("lich").await.unwrap());

    db.clear_folder_preview().await.unwrap();
    assert!(db.list_folder_preview().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_folder_survives_resync() {
    let (repo, _temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich()], true).await.expect("Failed to save");
    repo.database().add_to_folder("Camp", &indexes(&["goblin"])).await.unwrap();

    // Upstream drops the goblin, then brings it back
    repo.save_monsters(vec![lich()], true).await.expect("Failed to sync");
    assert!(repo.database().list_folder_monsters("Camp").await.unwrap().is_empty());

    repo.save_monsters(vec![goblin(), lich()], true).await.expect("Failed to sync");
    assert_eq!(repo.database().list_folder_monsters("Camp").await.unwrap().len(), 1);
}
