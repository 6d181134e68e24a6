use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::AppConfig;
use crate::core::compendium::CompendiumService;
use crate::core::detail::MonsterDetailService;
use crate::core::folders::{FolderService, PreviewChange};
use crate::core::search::{LatestSearch, MonsterSearch, MonsterSearchCache, SearchUpdate};
use crate::core::sync::{HttpContentSource, SyncService};
use crate::database::{Database, LocalRepository};

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to all backend services.
///
/// Created once at startup, then passed by ref to views that need backend
/// access. Everything spawned from here reports back through `event_tx`.
pub struct Services {
    pub search: Arc<LatestSearch>,
    pub detail: Arc<MonsterDetailService>,
    pub compendium: Arc<CompendiumService>,
    pub folders: Arc<FolderService>,
    /// `None` when no content URL is configured.
    pub sync: Option<Arc<SyncService>>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize all services from config.
    ///
    /// Failures here are fatal: the TUI cannot run without the local store.
    pub async fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = config.data_dir();
        tracing::info!(data_dir = %data_dir.display(), "Initializing services");

        let database = Database::new(&data_dir).await?;
        let repository = Arc::new(LocalRepository::new(database));
        let cache = Arc::new(MonsterSearchCache::new());

        let engine = MonsterSearch::new(repository.clone(), repository.clone(), Arc::clone(&cache));
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let search = Arc::new(LatestSearch::new(engine, search_tx));
        forward_search_updates(search_rx, event_tx.clone());

        let detail = Arc::new(MonsterDetailService::new(repository.clone(), repository.clone()));
        let compendium = Arc::new(CompendiumService::new(repository.clone()));
        let folders = Arc::new(FolderService::new(repository.clone()));

        let base_url = config.sync.base_url.as_deref().filter(|u| !u.trim().is_empty());
        let sync = match base_url {
            Some(url) => {
                let remote = Arc::new(HttpContentSource::new(url)?);
                let service = SyncService::new(
                    remote,
                    repository.clone(),
                    repository.clone(),
                    repository.clone(),
                    Arc::clone(&cache),
                )
                .with_default_language(&config.sync.default_language);
                forward_sync_events(service.subscribe(), event_tx.clone());
                tracing::info!(%url, "Content sync enabled");
                Some(Arc::new(service))
            }
            None => {
                tracing::info!("No content URL configured, sync disabled");
                None
            }
        };

        Ok(Self {
            search,
            detail,
            compendium,
            folders,
            sync,
            event_tx,
        })
    }

    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }

    /// Start a full sync in the background. Progress arrives as
    /// [`AppEvent::Sync`].
    pub fn spawn_sync(&self) {
        let Some(sync) = self.sync.clone() else {
            self.notify("Sync is not configured (set HUNTER_SYNC_URL)", NotificationLevel::Warning);
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = sync.sync().await {
                tracing::warn!(error = %e, "Manual sync failed");
            }
        });
    }

    /// Startup check: follow the device language, then fetch newer content.
    pub fn spawn_startup_sync(&self, device_language: Option<String>) {
        let Some(sync) = self.sync.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Some(lang) = device_language {
                match sync.handle_language(&lang).await {
                    Ok(Some(_)) => return,
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "Language sync failed"),
                }
            }
            if let Err(e) = sync.sync_if_outdated().await {
                tracing::warn!(error = %e, "Startup sync failed");
            }
        });
    }

    pub fn load_compendium(&self) {
        let compendium = Arc::clone(&self.compendium);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = compendium.get_compendium().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::CompendiumLoaded(result));
        });
    }

    pub fn load_detail(&self, index: String) {
        let detail = Arc::clone(&self.detail);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = detail
                .get_monsters_by_initial_index(&index)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::DetailLoaded(result));
        });
    }

    pub fn toggle_folder_preview(&self, index: String, name: String) {
        let folders = Arc::clone(&self.folders);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let notification = match folders.toggle_preview(&index).await {
                Ok((PreviewChange::Added, preview)) => Notification::new(
                    format!("{name} added to the folder preview ({})", preview.len()),
                    NotificationLevel::Success,
                ),
                Ok((PreviewChange::Removed, preview)) => Notification::new(
                    format!("{name} removed from the folder preview ({})", preview.len()),
                    NotificationLevel::Info,
                ),
                Err(e) => Notification::new(format!("Folder preview: {e}"), NotificationLevel::Error),
            };
            let _ = tx.send(AppEvent::Notification(notification));
        });
    }
}

fn forward_search_updates(
    mut rx: mpsc::UnboundedReceiver<SearchUpdate>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            if tx.send(AppEvent::Search(update)).is_err() {
                break;
            }
        }
    });
}

fn forward_sync_events(
    mut rx: broadcast::Receiver<crate::core::sync::SyncEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if tx.send(AppEvent::Sync(event)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Sync event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// `pt_BR.UTF-8` → `pt_BR`. `None` for the C/POSIX locale.
pub fn device_language_from_locale(locale: &str) -> Option<String> {
    let lang = locale.split(['.', '@']).next()?.trim();
    if lang.is_empty() || lang == "C" || lang == "POSIX" {
        return None;
    }
    Some(lang.to_string())
}
