//! Folder Service Tests
//!
//! `FolderService` over the SQLite repository, plus error propagation
//! through a mocked one.

use std::sync::Arc;

use crate::core::folders::{FolderError, FolderService, PreviewChange};
use crate::core::repository::{MockFolderRepository, MonsterRepository, RepositoryError};
use crate::database::LocalRepository;
use crate::tests::common::{adult_red_dragon, create_test_repository, goblin, lich};

async fn service() -> (FolderService, Arc<LocalRepository>, tempfile::TempDir) {
    let (repo, temp) = create_test_repository().await;
    repo.save_monsters(vec![goblin(), lich(), adult_red_dragon()], false)
        .await
        .expect("Failed to save");
    let repo = Arc::new(repo);
    (FolderService::new(repo.clone()), repo, temp)
}

fn indexes_of(results: &[crate::core::models::SearchMonsterResult]) -> Vec<&str> {
    results.iter().map(|r| r.index.as_str()).collect()
}

#[tokio::test]
async fn test_save_preview_creates_folder_and_empties_preview() {
    let (folders, _repo, _temp) = service().await;

    folders.add_to_preview("lich").await.unwrap();
    let preview = folders.add_to_preview("goblin").await.unwrap();
    assert_eq!(indexes_of(&preview), vec!["lich", "goblin"]);

    let folder = folders.save_preview("  Tomb of   Horrors ").await.unwrap();
    assert_eq!(folder.name, "Tomb of Horrors");
    assert_eq!(indexes_of(&folder.monsters), vec!["lich", "goblin"]);
    assert_eq!(folder.monsters[1].challenge_rating, "1/4");

    assert!(folders.preview().await.unwrap().is_empty());
    let listed = folders.get_folders().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Tomb of Horrors");
    assert_eq!(listed[0].monster_count, 2);
}

#[tokio::test]
async fn test_saving_into_existing_folder_appends() {
    let (folders, _repo, _temp) = service().await;
    folders
        .add_monsters("Boss Fights", vec!["lich".into(), "lich".into()])
        .await
        .unwrap();

    folders.add_to_preview("adult-red-dragon").await.unwrap();
    folders.add_to_preview("lich").await.unwrap();
    let folder = folders.save_preview("Boss Fights").await.unwrap();

    assert_eq!(indexes_of(&folder.monsters), vec!["lich", "adult-red-dragon"]);
}

#[tokio::test]
async fn test_empty_preview_cannot_be_saved() {
    let (folders, _repo, _temp) = service().await;
    let err = folders.save_preview("Anything").await.unwrap_err();
    assert!(matches!(err, FolderError::EmptyPreview));
    assert!(folders.get_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_folder_name_is_rejected() {
    let (folders, _repo, _temp) = service().await;
    folders.add_to_preview("goblin").await.unwrap();

    let err = folders.save_preview("   ").await.unwrap_err();
    assert!(matches!(err, FolderError::InvalidName(_)));
    // Preview untouched
    assert_eq!(folders.preview().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_toggle_preview() {
    let (folders, _repo, _temp) = service().await;

    let (change, preview) = folders.toggle_preview("goblin").await.unwrap();
    assert_eq!(change, PreviewChange::Added);
    assert_eq!(preview.len(), 1);

    let (change, preview) = folders.toggle_preview("goblin").await.unwrap();
    assert_eq!(change, PreviewChange::Removed);
    assert!(preview.is_empty());
}

#[tokio::test]
async fn test_removing_last_monster_removes_folder() {
    let (folders, _repo, _temp) = service().await;
    folders.add_monsters("Camp", vec!["goblin".into()]).await.unwrap();

    let folder = folders.remove_monsters("Camp", vec!["goblin".into()]).await.unwrap();
    assert!(folder.monsters.is_empty());
    assert!(matches!(
        folders.get_folder("Camp").await,
        Err(FolderError::NotFound(_))
    ));
    assert!(matches!(
        folders.delete_folder("Camp").await,
        Err(FolderError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deleted_monster_drops_out_of_folder() {
    let (folders, repo, _temp) = service().await;
    folders
        .add_monsters("Camp", vec!["goblin".into(), "lich".into()])
        .await
        .unwrap();

    repo.delete_monster("goblin".to_string()).await.unwrap();

    let folder = folders.get_folder("Camp").await.unwrap();
    assert_eq!(indexes_of(&folder.monsters), vec!["lich"]);
    assert_eq!(folders.get_folders().await.unwrap()[0].monster_count, 1);
}

#[tokio::test]
async fn test_repository_failure_surfaces() {
    let mut repo = MockFolderRepository::new();
    repo.expect_get_folder_preview().returning(|| {
        Err(RepositoryError::InvalidRecord {
            index: "*".to_string(),
            reason: "store unavailable".to_string(),
        })
    });
    repo.expect_clear_folder_preview().never();

    let folders = FolderService::new(Arc::new(repo));
    let err = folders.save_preview("Camp").await.unwrap_err();
    assert!(matches!(err, FolderError::Repository(_)));
}
