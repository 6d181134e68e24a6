//! Remote content source.
//!
//! Content is published as static JSON:
//!
//! ```text
//! {base_url}/content-version.json   {"version": 7}
//! {base_url}/{lang}/monsters.json   [Monster, ...]
//! {base_url}/{lang}/spells.json     [Spell, ...]
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::models::{Monster, Spell};

use super::error::{Result, SyncError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteContentSource: Send + Sync {
    async fn fetch_monsters(&self, lang: String) -> Result<Vec<Monster>>;

    async fn fetch_spells(&self, lang: String) -> Result<Vec<Spell>>;

    async fn fetch_content_version(&self) -> Result<u32>;
}

#[derive(Debug, Deserialize)]
struct ContentVersion {
    version: u32,
}

/// [`RemoteContentSource`] over plain HTTP GETs.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SyncError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "Fetching remote content");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| SyncError::InvalidContent(format!("{url}: {e}")))
    }
}

#[async_trait]
impl RemoteContentSource for HttpContentSource {
    async fn fetch_monsters(&self, lang: String) -> Result<Vec<Monster>> {
        let monsters: Vec<Monster> = self.get_json(&format!("{lang}/monsters.json")).await?;
        info!(lang = %lang, count = monsters.len(), "Fetched remote monsters");
        Ok(monsters)
    }

    async fn fetch_spells(&self, lang: String) -> Result<Vec<Spell>> {
        let spells: Vec<Spell> = self.get_json(&format!("{lang}/spells.json")).await?;
        info!(lang = %lang, count = spells.len(), "Fetched remote spells");
        Ok(spells)
    }

    async fn fetch_content_version(&self) -> Result<u32> {
        let version: ContentVersion = self.get_json("content-version.json").await?;
        Ok(version.version)
    }
}
