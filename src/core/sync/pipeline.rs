//! Sync pipeline: remote content into the local store.
//!
//! Imported rows are replaced wholesale on every sync. Monsters with status
//! `Edited` or `Clone` and spells with status `Edited` are never overwritten.
//! Remote content is downloaded in full before the store is touched, so a
//! failed download leaves the store and the search cache as they were. The
//! search cache is invalidated after the write phase, whether or not every
//! write landed.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{info, instrument, warn};

use crate::core::models::{Monster, MonsterStatus, Spell, SpellStatus};
use crate::core::repository::{MonsterRepository, SettingsRepository, SpellRepository};
use crate::core::search::MonsterSearchCache;

use super::error::{Result, SyncError};
use super::remote::RemoteContentSource;

pub const SUPPORTED_LANGUAGES: &[&str] = &["en-us", "pt-br"];
pub const DEFAULT_LANGUAGE: &str = "en-us";

pub const LANGUAGE_KEY: &str = "language";
pub const CONTENT_VERSION_KEY: &str = "content_version";
pub const LAST_SYNC_KEY: &str = "last_sync_at";

const EVENT_CAPACITY: usize = 16;

/// Lowercased, `_` replaced by `-`. `None` when the language has no content.
pub fn normalize_language(lang: &str) -> Option<String> {
    let lang = lang.trim().to_lowercase().replace('_', "-");
    SUPPORTED_LANGUAGES.contains(&lang.as_str()).then_some(lang)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub language: String,
    pub content_version: u32,
    pub monsters_saved: usize,
    pub monsters_preserved: usize,
    pub spells_saved: usize,
    pub spells_preserved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started,
    Finished(SyncReport),
    Failed(String),
}

/// Counts from one sync step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub saved: usize,
    pub preserved: usize,
}

pub struct SyncService {
    remote: Arc<dyn RemoteContentSource>,
    monsters: Arc<dyn MonsterRepository>,
    spells: Arc<dyn SpellRepository>,
    settings: Arc<dyn SettingsRepository>,
    cache: Arc<MonsterSearchCache>,
    events: broadcast::Sender<SyncEvent>,
    running: Mutex<()>,
    default_language: String,
}

impl SyncService {
    pub fn new(
        remote: Arc<dyn RemoteContentSource>,
        monsters: Arc<dyn MonsterRepository>,
        spells: Arc<dyn SpellRepository>,
        settings: Arc<dyn SettingsRepository>,
        cache: Arc<MonsterSearchCache>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            remote,
            monsters,
            spells,
            settings,
            cache,
            events,
            running: Mutex::new(()),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Language used when none has been stored yet. Unsupported values are ignored.
    pub fn with_default_language(mut self, lang: &str) -> Self {
        match normalize_language(lang) {
            Some(lang) => self.default_language = lang,
            None => warn!(lang, "Unsupported default language, keeping {}", self.default_language),
        }
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    pub async fn language(&self) -> Result<String> {
        let stored = self.settings.get_setting(LANGUAGE_KEY.to_string()).await?;
        Ok(stored
            .as_deref()
            .and_then(normalize_language)
            .unwrap_or_else(|| self.default_language.clone()))
    }

    /// Version of the content currently stored locally, 0 before the first sync.
    pub async fn local_content_version(&self) -> Result<u32> {
        let stored = self.settings.get_setting(CONTENT_VERSION_KEY.to_string()).await?;
        Ok(stored.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    /// Replace imported monsters with the remote list, keeping local changes.
    #[instrument(skip(self))]
    pub async fn sync_monsters(&self, lang: &str) -> Result<SyncCounts> {
        let remote = self.remote.fetch_monsters(lang.to_string()).await?;
        let saved = self.store_monsters(remote).await;
        self.cache.invalidate().await;
        saved
    }

    /// Replace imported spells with the remote list, keeping edited ones.
    #[instrument(skip(self))]
    pub async fn sync_spells(&self, lang: &str) -> Result<SyncCounts> {
        let remote = self.remote.fetch_spells(lang.to_string()).await?;
        let saved = self.store_spells(remote).await;
        self.cache.invalidate().await;
        saved
    }

    async fn store_monsters(&self, remote: Vec<Monster>) -> Result<SyncCounts> {
        let local: HashSet<String> = self
            .monsters
            .get_monsters_by_status(vec![MonsterStatus::Edited, MonsterStatus::Clone])
            .await?
            .into_iter()
            .map(|m| m.index)
            .collect();

        let total = remote.len();
        let incoming: Vec<_> = remote
            .into_iter()
            .filter(|m| !local.contains(&m.index))
            .map(|mut m| {
                m.status = MonsterStatus::Imported;
                m
            })
            .collect();
        let counts = SyncCounts {
            saved: incoming.len(),
            preserved: total - incoming.len(),
        };

        self.monsters.save_monsters(incoming, true).await?;
        info!(saved = counts.saved, preserved = counts.preserved, "Monsters synced");
        Ok(counts)
    }

    async fn store_spells(&self, remote: Vec<Spell>) -> Result<SyncCounts> {
        let edited: HashSet<String> = self
            .spells
            .get_spells_edited()
            .await?
            .into_iter()
            .map(|s| s.index)
            .collect();

        let total = remote.len();
        let incoming: Vec<_> = remote
            .into_iter()
            .filter(|s| !edited.contains(&s.index))
            .map(|mut s| {
                s.status = SpellStatus::Imported;
                s
            })
            .collect();
        let counts = SyncCounts {
            saved: incoming.len(),
            preserved: total - incoming.len(),
        };

        self.spells.save_spells(incoming, true).await?;
        info!(saved = counts.saved, preserved = counts.preserved, "Spells synced");
        Ok(counts)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.running.try_lock().map_err(|_| SyncError::AlreadyRunning)
    }

    /// Full sync in the stored language. Only one sync runs at a time; a
    /// second call while one is running fails with [`SyncError::AlreadyRunning`].
    pub async fn sync(&self) -> Result<SyncReport> {
        let _guard = self.lock()?;
        self.run_locked(SyncRequest::default()).await
    }

    /// Caller holds `running`.
    async fn run_locked(&self, request: SyncRequest) -> Result<SyncReport> {
        let _ = self.events.send(SyncEvent::Started);

        let result = match self.fetch(request).await {
            Ok(content) => {
                let applied = self.apply(content).await;
                // Some writes may have landed even when a later one failed.
                self.cache.invalidate().await;
                applied
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                let _ = self.events.send(SyncEvent::Finished(report.clone()));
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                let _ = self.events.send(SyncEvent::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Download everything before touching the store.
    async fn fetch(&self, request: SyncRequest) -> Result<FetchedContent> {
        let switch_language = request.language.is_some();
        let language = match request.language {
            Some(lang) => lang,
            None => self.language().await?,
        };
        let content_version = match request.content_version {
            Some(version) => version,
            None => self.remote.fetch_content_version().await?,
        };
        info!(%language, content_version, "Sync started");

        let monsters = self.remote.fetch_monsters(language.clone()).await?;
        let spells = self.remote.fetch_spells(language.clone()).await?;

        Ok(FetchedContent {
            language,
            switch_language,
            content_version,
            monsters,
            spells,
        })
    }

    async fn apply(&self, content: FetchedContent) -> Result<SyncReport> {
        let monsters = self.store_monsters(content.monsters).await?;
        let spells = self.store_spells(content.spells).await?;

        if content.switch_language {
            self.settings
                .set_setting(LANGUAGE_KEY.to_string(), content.language.clone())
                .await?;
        }
        self.settings
            .set_setting(CONTENT_VERSION_KEY.to_string(), content.content_version.to_string())
            .await?;
        self.settings
            .set_setting(LAST_SYNC_KEY.to_string(), Utc::now().to_rfc3339())
            .await?;

        Ok(SyncReport {
            language: content.language,
            content_version: content.content_version,
            monsters_saved: monsters.saved,
            monsters_preserved: monsters.preserved,
            spells_saved: spells.saved,
            spells_preserved: spells.preserved,
        })
    }

    /// Sync only when the remote publishes a newer content version.
    pub async fn sync_if_outdated(&self) -> Result<Option<SyncReport>> {
        let local = self.local_content_version().await?;
        let remote = self.remote.fetch_content_version().await?;
        if remote <= local {
            info!(local, remote, "Content is up to date");
            return Ok(None);
        }

        let _guard = self.lock()?;
        let request = SyncRequest {
            content_version: Some(remote),
            ..Default::default()
        };
        self.run_locked(request).await.map(Some)
    }

    /// Switch content language to the device language when it differs from
    /// the stored one and content exists for it. The language is stored
    /// together with its content, so a failed or rejected switch is retried
    /// on the next call.
    pub async fn handle_language(&self, device_language: &str) -> Result<Option<SyncReport>> {
        let Some(lang) = normalize_language(device_language) else {
            info!(device_language, "No content for device language");
            return Ok(None);
        };
        if lang == self.language().await? {
            return Ok(None);
        }

        let _guard = self.lock()?;
        info!(%lang, "Content language changed");
        let request = SyncRequest {
            language: Some(lang),
            ..Default::default()
        };
        self.run_locked(request).await.map(Some)
    }
}

/// Values already known when a sync starts.
#[derive(Debug, Default)]
struct SyncRequest {
    language: Option<String>,
    content_version: Option<u32>,
}

struct FetchedContent {
    language: String,
    /// Record `language` as the stored language once the content is in.
    switch_language: bool,
    content_version: u32,
    monsters: Vec<Monster>,
    spells: Vec<Spell>,
}
