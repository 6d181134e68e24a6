//! Sync Pipeline Tests
//!
//! `SyncService` against a mocked remote and the in-memory repository.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::models::{Monster, MonsterStatus, SchoolOfMagic, Spell, SpellStatus};
use crate::core::repository::{MockSpellRepository, RepositoryError};
use crate::core::search::{MonsterSearch, MonsterSearchCache};
use crate::core::sync::{
    self, MockRemoteContentSource, RemoteContentSource, SyncError, SyncEvent, SyncService,
};
use crate::tests::common::{
    adult_red_dragon, goblin, homebrew_ooze, lich, spell, spellbook, InMemoryRepository,
};

fn remote(version: u32) -> MockRemoteContentSource {
    let mut remote = MockRemoteContentSource::new();
    remote
        .expect_fetch_content_version()
        .returning(move || Ok(version));
    remote
        .expect_fetch_monsters()
        .returning(|_| Ok(vec![goblin(), lich(), adult_red_dragon()]));
    remote.expect_fetch_spells().returning(|_| Ok(spellbook()));
    remote
}

fn service(
    remote: MockRemoteContentSource,
    repo: &Arc<InMemoryRepository>,
) -> (SyncService, Arc<MonsterSearchCache>) {
    let cache = Arc::new(MonsterSearchCache::new());
    let service = SyncService::new(
        Arc::new(remote),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        Arc::clone(&cache),
    );
    (service, cache)
}

fn sorted_indexes(repo: &InMemoryRepository) -> Vec<String> {
    let mut indexes: Vec<_> = repo.monster_snapshot().into_iter().map(|m| m.index).collect();
    indexes.sort();
    indexes
}

// =============================================================================
// Merging
// =============================================================================

#[tokio::test]
async fn test_sync_replaces_imported_and_keeps_local_changes() {
    let mut edited_goblin = goblin();
    edited_goblin.status = MonsterStatus::Edited;
    edited_goblin.name = "Goblin (house rules)".to_string();

    let mut clone = lich();
    clone.index = "lich-queen".to_string();
    clone.status = MonsterStatus::Clone;

    let mut stale = homebrew_ooze();
    stale.status = MonsterStatus::Imported;

    let mut edited_fireball = spell("fireball", "Fireball+", 3, SchoolOfMagic::Evocation);
    edited_fireball.status = SpellStatus::Edited;

    let repo = Arc::new(InMemoryRepository::new(
        vec![edited_goblin, clone, stale],
        vec![edited_fireball, spell("wish", "Wish", 9, SchoolOfMagic::Conjuration)],
    ));
    let (service, _cache) = service(remote(4), &repo);

    let report = service.sync().await.unwrap();
    assert_eq!(report.language, "en-us");
    assert_eq!(report.content_version, 4);
    assert_eq!(report.monsters_saved, 2);
    assert_eq!(report.monsters_preserved, 1);
    assert_eq!(report.spells_saved, 1);
    assert_eq!(report.spells_preserved, 1);

    assert_eq!(
        sorted_indexes(&repo),
        vec!["adult-red-dragon", "goblin", "lich", "lich-queen"]
    );
    let monsters = repo.monster_snapshot();
    let goblin = monsters.iter().find(|m| m.index == "goblin").unwrap();
    assert_eq!(goblin.status, MonsterStatus::Edited);
    assert_eq!(goblin.name, "Goblin (house rules)");
    let lich = monsters.iter().find(|m| m.index == "lich").unwrap();
    assert_eq!(lich.status, MonsterStatus::Imported);

    let spells = repo.spell_snapshot();
    assert_eq!(spells.len(), 2);
    let fireball = spells.iter().find(|s| s.index == "fireball").unwrap();
    assert_eq!(fireball.name, "Fireball+");
    assert!(spells.iter().all(|s| s.index != "wish"));
}

#[tokio::test]
async fn test_sync_forces_imported_status() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(1));
    remote.expect_fetch_monsters().returning(|_| {
        let mut m = goblin();
        m.status = MonsterStatus::Edited;
        Ok(vec![m])
    });
    remote.expect_fetch_spells().returning(|_| Ok(Vec::new()));

    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote, &repo);
    service.sync().await.unwrap();

    assert_eq!(repo.monster_snapshot()[0].status, MonsterStatus::Imported);
}

#[tokio::test]
async fn test_sync_records_settings_and_invalidates_cache() {
    let repo = Arc::new(InMemoryRepository::default());
    let (service, cache) = service(remote(9), &repo);
    let before = cache.generation().await;

    service.sync().await.unwrap();

    assert_eq!(repo.setting("content_version").as_deref(), Some("9"));
    assert!(repo.setting("last_sync_at").is_some());
    assert_eq!(service.local_content_version().await.unwrap(), 9);
    assert_eq!(cache.generation().await, before + 1);
}

// =============================================================================
// Events and Failures
// =============================================================================

#[tokio::test]
async fn test_sync_emits_started_then_finished() {
    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote(2), &repo);
    let mut events = service.subscribe();

    let report = service.sync().await.unwrap();

    assert_eq!(events.recv().await.unwrap(), SyncEvent::Started);
    assert_eq!(events.recv().await.unwrap(), SyncEvent::Finished(report));
    assert!(!service.is_running());
}

#[tokio::test]
async fn test_remote_failure_emits_failed_and_keeps_store() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(3));
    remote.expect_fetch_monsters().returning(|_| {
        Err(SyncError::Status {
            status: 503,
            url: "https://content.example/en-us/monsters.json".to_string(),
        })
    });
    remote.expect_fetch_spells().never();

    let repo = Arc::new(InMemoryRepository::new(vec![goblin()], Vec::new()));
    let (service, cache) = service(remote, &repo);
    let mut events = service.subscribe();

    let err = service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Status { status: 503, .. }));

    assert_eq!(events.recv().await.unwrap(), SyncEvent::Started);
    match events.recv().await.unwrap() {
        SyncEvent::Failed(message) => assert!(message.contains("503")),
        other => panic!("Expected Failed, got {other:?}"),
    }
    assert_eq!(sorted_indexes(&repo), vec!["goblin"]);
    assert!(repo.setting("content_version").is_none());
    assert_eq!(cache.generation().await, 0);
}

#[tokio::test]
async fn test_failed_download_leaves_store_and_cache_alone() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(2));
    remote
        .expect_fetch_monsters()
        .returning(|_| Ok(vec![lich(), adult_red_dragon()]));
    remote.expect_fetch_spells().returning(|_| {
        Err(SyncError::Status {
            status: 503,
            url: "https://content.example/en-us/spells.json".to_string(),
        })
    });

    let repo = Arc::new(InMemoryRepository::new(vec![goblin()], spellbook()));
    let (service, cache) = service(remote, &repo);
    let search = MonsterSearch::new(repo.clone(), repo.clone(), Arc::clone(&cache));
    search.execute("legendary", false).await.unwrap();
    let generation = cache.generation().await;

    assert!(service.sync().await.is_err());

    assert_eq!(sorted_indexes(&repo), vec!["goblin"]);
    assert_eq!(cache.generation().await, generation);
    assert!(repo.setting("content_version").is_none());
    let full_loads = repo.full();
    // Still served from the cache, which matches the untouched store
    assert!(search.execute("legendary", false).await.unwrap().is_empty());
    assert_eq!(repo.full(), full_loads);
}

#[tokio::test]
async fn test_partial_write_clears_cache() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(2));
    remote
        .expect_fetch_monsters()
        .returning(|_| Ok(vec![lich(), adult_red_dragon()]));
    remote.expect_fetch_spells().returning(|_| Ok(spellbook()));

    let mut spells = MockSpellRepository::new();
    spells.expect_get_spells_edited().returning(|| Ok(Vec::new()));
    spells.expect_save_spells().returning(|_, _| {
        Err(RepositoryError::InvalidRecord {
            index: "fireball".to_string(),
            reason: "disk full".to_string(),
        })
    });

    let repo = Arc::new(InMemoryRepository::new(vec![goblin()], spellbook()));
    let cache = Arc::new(MonsterSearchCache::new());
    let service = SyncService::new(
        Arc::new(remote),
        repo.clone(),
        Arc::new(spells),
        repo.clone(),
        Arc::clone(&cache),
    );
    let search = MonsterSearch::new(repo.clone(), repo.clone(), Arc::clone(&cache));
    search.execute("legendary", false).await.unwrap();
    assert!(!cache.is_empty().await);
    let mut events = service.subscribe();

    let err = service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Repository(_)));

    // Monsters landed before the spell write failed
    assert_eq!(sorted_indexes(&repo), vec!["adult-red-dragon", "lich"]);
    assert!(cache.is_empty().await);
    assert!(repo.setting("content_version").is_none());
    assert_eq!(events.recv().await.unwrap(), SyncEvent::Started);
    assert!(matches!(events.recv().await.unwrap(), SyncEvent::Failed(_)));

    let results = search.execute("legendary & goblin", false).await.unwrap();
    assert!(results.is_empty());
    let results = search.execute("spell=fireball", false).await.unwrap();
    assert_eq!(results[0].index, "lich");
}

#[tokio::test]
async fn test_repository_failure_is_reported() {
    let repo = Arc::new(InMemoryRepository::default());
    repo.fail.store(true, Ordering::SeqCst);
    let (service, _cache) = service(remote(1), &repo);

    let err = service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Repository(_)));
}

#[tokio::test]
async fn test_concurrent_sync_is_rejected() {
    let repo = Arc::new(InMemoryRepository::default());
    let service = Arc::new(SyncService::new(
        Arc::new(SlowRemote(remote(1))),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        Arc::new(MonsterSearchCache::new()),
    ));

    let running = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.sync().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(service.is_running());

    let err = service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::AlreadyRunning));

    running.await.unwrap().unwrap();
    assert!(!service.is_running());
}

/// Remote that waits before answering the version request.
struct SlowRemote(MockRemoteContentSource);

#[async_trait]
impl RemoteContentSource for SlowRemote {
    async fn fetch_monsters(&self, lang: String) -> sync::Result<Vec<Monster>> {
        self.0.fetch_monsters(lang).await
    }

    async fn fetch_spells(&self, lang: String) -> sync::Result<Vec<Spell>> {
        self.0.fetch_spells(lang).await
    }

    async fn fetch_content_version(&self) -> sync::Result<u32> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.0.fetch_content_version().await
    }
}

// =============================================================================
// Version and Language
// =============================================================================

#[tokio::test]
async fn test_sync_if_outdated_skips_current_content() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(5));
    remote.expect_fetch_monsters().never();
    remote.expect_fetch_spells().never();

    let repo = Arc::new(InMemoryRepository::default());
    repo.put_setting("content_version", "5");
    let (service, _cache) = service(remote, &repo);

    assert!(service.sync_if_outdated().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sync_if_outdated_syncs_newer_content() {
    let repo = Arc::new(InMemoryRepository::default());
    repo.put_setting("content_version", "5");
    let (service, _cache) = service(remote(6), &repo);

    let report = service.sync_if_outdated().await.unwrap().expect("Expected a sync");
    assert_eq!(report.content_version, 6);
    assert_eq!(repo.monster_snapshot().len(), 3);
}

#[tokio::test]
async fn test_sync_if_outdated_fetches_version_once() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().times(1).returning(|| Ok(3));
    remote.expect_fetch_monsters().returning(|_| Ok(vec![goblin()]));
    remote.expect_fetch_spells().returning(|_| Ok(Vec::new()));

    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote, &repo);

    let report = service.sync_if_outdated().await.unwrap().expect("Expected a sync");
    assert_eq!(report.content_version, 3);
    assert_eq!(repo.setting("content_version").as_deref(), Some("3"));
}

#[tokio::test]
async fn test_first_run_syncs() {
    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote(1), &repo);

    assert_eq!(service.local_content_version().await.unwrap(), 0);
    assert!(service.sync_if_outdated().await.unwrap().is_some());
}

#[tokio::test]
async fn test_handle_language_switches_and_syncs() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(1));
    remote
        .expect_fetch_monsters()
        .withf(|lang| lang == "pt-br")
        .times(1)
        .returning(|_| Ok(vec![goblin()]));
    remote
        .expect_fetch_spells()
        .withf(|lang| lang == "pt-br")
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote, &repo);

    let report = service.handle_language("pt_BR").await.unwrap().expect("Expected a sync");
    assert_eq!(report.language, "pt-br");
    assert_eq!(repo.setting("language").as_deref(), Some("pt-br"));
}

#[tokio::test]
async fn test_language_switch_during_sync_is_retried() {
    let repo = Arc::new(InMemoryRepository::default());
    let service = Arc::new(SyncService::new(
        Arc::new(SlowRemote(remote(1))),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        Arc::new(MonsterSearchCache::new()),
    ));

    let running = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.sync().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = service.handle_language("pt_BR").await.unwrap_err();
    assert!(matches!(err, SyncError::AlreadyRunning));
    assert!(repo.setting("language").is_none());
    assert_eq!(service.language().await.unwrap(), "en-us");

    running.await.unwrap().unwrap();

    let report = service.handle_language("pt_BR").await.unwrap().expect("Expected a sync");
    assert_eq!(report.language, "pt-br");
    assert_eq!(repo.setting("language").as_deref(), Some("pt-br"));
}

#[tokio::test]
async fn test_failed_language_switch_keeps_old_language() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().returning(|| Ok(1));
    remote.expect_fetch_monsters().returning(|_| {
        Err(SyncError::Status {
            status: 404,
            url: "https://content.example/pt-br/monsters.json".to_string(),
        })
    });

    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote, &repo);

    assert!(service.handle_language("pt-BR").await.is_err());
    assert!(repo.setting("language").is_none());
    assert_eq!(service.language().await.unwrap(), "en-us");
}

#[tokio::test]
async fn test_handle_language_ignores_same_or_unsupported() {
    let mut remote = MockRemoteContentSource::new();
    remote.expect_fetch_content_version().never();
    remote.expect_fetch_monsters().never();
    remote.expect_fetch_spells().never();

    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(remote, &repo);

    assert!(service.handle_language("en_US").await.unwrap().is_none());
    assert!(service.handle_language("fr-FR").await.unwrap().is_none());
    assert!(repo.setting("language").is_none());
}

#[tokio::test]
async fn test_default_language_applies_until_stored() {
    let repo = Arc::new(InMemoryRepository::default());
    let (service, _cache) = service(MockRemoteContentSource::new(), &repo);
    let service = service.with_default_language("pt-BR");
    assert_eq!(service.language().await.unwrap(), "pt-br");

    repo.put_setting("language", "en-us");
    assert_eq!(service.language().await.unwrap(), "en-us");
}
