//! Session-scoped cache of fully loaded monsters.
//!
//! The cache is a read-through shortcut over the local store, never a second
//! source of truth. Every store mutation that goes through the sync pipeline
//! or the editor calls [`MonsterSearchCache::invalidate`], which clears the
//! list and bumps the generation. A load that started under an older
//! generation is not allowed to populate the cache.
//!
//! Entries never expire and the list is unbounded.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::core::models::Monster;

#[derive(Debug, Default)]
struct CacheState {
    monsters: Option<Arc<Vec<Monster>>>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct MonsterSearchCache {
    state: RwLock<CacheState>,
}

impl MonsterSearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached monsters, if a full load populated the cache.
    pub async fn get(&self) -> Option<Arc<Vec<Monster>>> {
        self.state
            .read()
            .await
            .monsters
            .clone()
            .filter(|monsters| !monsters.is_empty())
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn is_empty(&self) -> bool {
        self.get().await.is_none()
    }

    /// Drop the cached list without touching the generation.
    pub async fn clear(&self) {
        self.state.write().await.monsters = None;
    }

    /// Drop the cached list and start a new generation.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.monsters = None;
        state.generation += 1;
        debug!(generation = state.generation, "Monster search cache invalidated");
    }

    /// Populate the cache with a list loaded under `generation`.
    ///
    /// Returns `false` (and stores nothing) when the cache was invalidated
    /// after the load began.
    pub async fn store(&self, generation: u64, monsters: Arc<Vec<Monster>>) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                loaded = generation,
                current = state.generation,
                "Discarding stale monster load"
            );
            return false;
        }
        state.monsters = Some(monsters);
        true
    }
}
