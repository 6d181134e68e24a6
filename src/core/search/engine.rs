//! The monster search use case.
//!
//! ```text
//!  query ──► parse_query ──► load candidates ──► filter_monsters ──► results
//!                                 │
//!                 cache hit? ─────┤
//!                 previews enough? ── get_monster_previews
//!                 otherwise ───────── get_monsters + spells ──► cache
//! ```

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, instrument};

use crate::core::models::{Monster, SearchMonsterResult};
use crate::core::repository::{MonsterRepository, SpellRepository};
use crate::core::spellcasting::resolve_spellcastings;

use super::cache::MonsterSearchCache;
use super::error::Result;
use super::parser::{parse_query, SearchClause};
use super::predicate::filter_monsters;

#[derive(Clone)]
pub struct MonsterSearch {
    monsters: Arc<dyn MonsterRepository>,
    spells: Arc<dyn SpellRepository>,
    cache: Arc<MonsterSearchCache>,
}

impl MonsterSearch {
    pub fn new(
        monsters: Arc<dyn MonsterRepository>,
        spells: Arc<dyn SpellRepository>,
        cache: Arc<MonsterSearchCache>,
    ) -> Self {
        Self {
            monsters,
            spells,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<MonsterSearchCache> {
        &self.cache
    }

    /// Search monsters matching `query` as an asynchronous sequence.
    ///
    /// The stream yields exactly one item: the matching monsters in store
    /// order, or the load failure.
    pub fn search(
        &self,
        query: &str,
        clear_cache: bool,
    ) -> BoxStream<'static, Result<Vec<SearchMonsterResult>>> {
        let this = self.clone();
        let query = query.to_string();
        stream::once(async move { this.execute(&query, clear_cache).await }).boxed()
    }

    /// Run a search to completion.
    #[instrument(skip(self), level = "debug")]
    pub async fn execute(&self, query: &str, clear_cache: bool) -> Result<Vec<SearchMonsterResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let clauses = parse_query(query);
        if clear_cache {
            self.cache.clear().await;
        }

        let candidates = self.load_candidates(&clauses, clear_cache).await?;
        let results: Vec<SearchMonsterResult> = filter_monsters(&candidates, &clauses)
            .into_iter()
            .map(SearchMonsterResult::from)
            .collect();

        debug!(
            clauses = clauses.len(),
            candidates = candidates.len(),
            results = results.len(),
            "Monster search completed"
        );
        Ok(results)
    }

    async fn load_candidates(
        &self,
        clauses: &[SearchClause],
        clear_cache: bool,
    ) -> Result<Arc<Vec<Monster>>> {
        if let Some(cached) = self.cache.get().await {
            debug!(monsters = cached.len(), "Search cache hit");
            return Ok(cached);
        }

        if !clear_cache && clauses.iter().all(|clause| clause.key.is_preview_safe()) {
            let previews = self.monsters.get_monster_previews().await?;
            debug!(monsters = previews.len(), "Loaded monster previews");
            return Ok(Arc::new(previews));
        }

        let generation = self.cache.generation().await;
        let monsters = self.monsters.get_monsters().await?;
        let monsters = Arc::new(resolve_spellcastings(self.spells.as_ref(), monsters).await?);
        self.cache.store(generation, Arc::clone(&monsters)).await;
        debug!(monsters = monsters.len(), "Loaded full monster list");
        Ok(monsters)
    }
}
