//! "Switch to latest" search driver.
//!
//! Each [`LatestSearch::submit`] supersedes the previous one: the in-flight
//! task is aborted and only the newest request may deliver results. Updates
//! carry their request id; a result that raced past the abort is recognised
//! with [`LatestSearch::is_current`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::models::SearchMonsterResult;

use super::engine::MonsterSearch;
use super::error::Result;

/// Outcome of one submitted search.
#[derive(Debug)]
pub struct SearchUpdate {
    pub request_id: u64,
    pub query: String,
    pub result: Result<Vec<SearchMonsterResult>>,
}

pub struct LatestSearch {
    search: MonsterSearch,
    tx: mpsc::UnboundedSender<SearchUpdate>,
    latest_id: AtomicU64,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl LatestSearch {
    pub fn new(search: MonsterSearch, tx: mpsc::UnboundedSender<SearchUpdate>) -> Self {
        Self {
            search,
            tx,
            latest_id: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Start a search, aborting whichever one is still running.
    ///
    /// Must be called from within a tokio runtime. Returns the request id.
    pub fn submit(&self, query: impl Into<String>, clear_cache: bool) -> u64 {
        let request_id = self.latest_id.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.into();
        let search = self.search.clone();
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            let mut results = search.search(&query, clear_cache);
            while let Some(result) = results.next().await {
                let update = SearchUpdate {
                    request_id,
                    query: query.clone(),
                    result,
                };
                if tx.send(update).is_err() {
                    break;
                }
            }
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.replace(handle) {
            if !previous.is_finished() {
                debug!(superseded_by = request_id, "Aborting in-flight search");
            }
            previous.abort();
        }
        request_id
    }

    /// Abort the running search, if any. Later results are stale.
    pub fn cancel(&self) {
        self.latest_id.fetch_add(1, Ordering::SeqCst);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        self.latest_id.load(Ordering::SeqCst) == request_id
    }

    pub fn engine(&self) -> &MonsterSearch {
        &self.search
    }
}

impl Drop for LatestSearch {
    fn drop(&mut self) {
        if let Some(handle) = self
            .in_flight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
