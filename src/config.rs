use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::sync::DEFAULT_LANGUAGE;

/// Environment variable overriding `sync.base_url`.
pub const SYNC_URL_ENV: &str = "HUNTER_SYNC_URL";

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub data: DataConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Notification timers advance once per tick.
    pub tick_rate_ms: u64,
    pub mouse_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Where `hunter.db` and `logs/` live.
    pub data_dir: Option<PathBuf>,
}

/// Remote content configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the published content. Sync is disabled when unset.
    pub base_url: Option<String>,
    /// Content language used until one is stored.
    pub default_language: String,
    /// Check for newer content when the TUI starts.
    pub sync_on_startup: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            sync_on_startup: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `<config_dir>/hunter/config.toml`.
    /// A missing or malformed file falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "Failed to parse config at {}: {e}, using defaults",
                    config_path.display()
                );
                Self::default()
            }),
            Err(_) => {
                log::debug!("No config file at {}, using defaults", config_path.display());
                Self::default()
            }
        };
        config.with_env_overrides(std::env::var(SYNC_URL_ENV).ok())
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply the `HUNTER_SYNC_URL` value, ignoring blanks.
    pub fn with_env_overrides(mut self, sync_url: Option<String>) -> Self {
        if let Some(url) = sync_url.filter(|u| !u.trim().is_empty()) {
            self.sync.base_url = Some(url);
        }
        self
    }

    /// `data.data_dir`, else `<data_dir>/hunter`.
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("hunter"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("hunter").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
