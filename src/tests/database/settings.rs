//! Settings Database Tests

use crate::core::repository::SettingsRepository;
use crate::database::SettingsOps;
use crate::tests::common::{create_test_db, create_test_repository};

#[tokio::test]
async fn test_setting_lifecycle() {
    let (db, _temp) = create_test_db().await;

    assert!(db.get_setting("language").await.unwrap().is_none());

    db.set_setting("language", "en-us").await.expect("Failed to set");
    db.set_setting("language", "pt-br").await.expect("Failed to overwrite");
    assert_eq!(db.get_setting("language").await.unwrap().as_deref(), Some("pt-br"));

    db.set_setting("content_version", "3").await.expect("Failed to set");
    let all = db.list_settings().await.expect("Failed to list");
    assert_eq!(
        all,
        vec![
            ("content_version".to_string(), "3".to_string()),
            ("language".to_string(), "pt-br".to_string()),
        ]
    );

    assert!(db.delete_setting("language").await.unwrap());
    assert!(!db.delete_setting("language").await.unwrap());
    assert!(db.get_setting("language").await.unwrap().is_none());
}

#[tokio::test]
async fn test_settings_through_repository() {
    let (repo, _temp) = create_test_repository().await;
    repo.set_setting("last_sync_at".into(), "2024-05-01T00:00:00Z".into())
        .await
        .expect("Failed to set");
    assert_eq!(
        repo.get_setting("last_sync_at".into()).await.unwrap().as_deref(),
        Some("2024-05-01T00:00:00Z")
    );
}
