//! Latest Search Tests
//!
//! A newer submission aborts the older one; only the newest request may
//! deliver results.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::core::search::{LatestSearch, MonsterSearch, MonsterSearchCache, SearchUpdate};
use crate::tests::common::{bestiary, spellbook, InMemoryRepository};

fn slow_latest() -> (LatestSearch, mpsc::UnboundedReceiver<SearchUpdate>) {
    let repo = Arc::new(
        InMemoryRepository::new(bestiary(), spellbook()).with_delay(Duration::from_millis(150)),
    );
    let search = MonsterSearch::new(repo.clone(), repo, Arc::new(MonsterSearchCache::new()));
    let (tx, rx) = mpsc::unbounded_channel();
    (LatestSearch::new(search, tx), rx)
}

#[tokio::test]
async fn test_newer_request_supersedes_slow_one() {
    let (latest, mut rx) = slow_latest();

    // Full load, held up by the repository delay
    let first = latest.submit("legendary", false);
    // Preview-only, answers immediately
    let second = latest.submit("goblin", false);
    assert!(second > first);

    let update = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("No search update")
        .expect("Channel closed");
    assert_eq!(update.request_id, second);
    assert_eq!(update.query, "goblin");
    assert_eq!(update.result.unwrap()[0].index, "goblin");

    // The aborted request never reports
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err());
    assert!(latest.is_current(second));
    assert!(!latest.is_current(first));
}

#[tokio::test]
async fn test_cancel_makes_request_stale() {
    let (latest, mut rx) = slow_latest();

    let id = latest.submit("legendary", false);
    latest.cancel();
    assert!(!latest.is_current(id));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_single_request_delivers() {
    let (latest, mut rx) = slow_latest();

    let id = latest.submit("spell=fireball", false);
    let update = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("No search update")
        .expect("Channel closed");
    assert_eq!(update.request_id, id);
    assert!(latest.is_current(id));
    assert_eq!(update.result.unwrap()[0].index, "lich");
}
