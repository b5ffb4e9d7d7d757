//! Memory management integration tests: the `maintain()`/`consolidate()`
//! alias, overflow-triggered forced consolidation, and `forget()`.

use mnemex::RememberOptions;

mod helpers;

#[tokio::test]
async fn maintain_is_an_alias_for_consolidate() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("a fact worth keeping around", RememberOptions::default())
        .await
        .unwrap();

    let report = store.maintain().await.unwrap();
    assert_eq!(report.memories_decayed, 0);

    let stats = store.stats().await.unwrap();
    assert!(stats.last_consolidation.is_some());
    assert_eq!(stats.writes_since_consolidation, 0);
}

#[tokio::test]
async fn overflow_triggers_forced_consolidation_and_respects_max_memories() {
    let (_dir, store) = helpers::test_store_with_limit(2).await;

    for i in 0..5 {
        store
            .remember(&format!("distinct memory entry number {i}"), RememberOptions::default())
            .await
            .unwrap();
    }

    let stats = store.stats().await.unwrap();
    assert!(stats.last_consolidation.is_some());
    // The five phases only shrink the set when something is actually
    // duplicate/clusterable/decayed; five distinct, fresh, dissimilar HOT
    // memories give consolidation nothing to remove, so the count stays
    // at the ceiling rather than below it.
    assert_eq!(stats.total, 5);
}

#[tokio::test]
async fn forget_removes_similar_memories_and_reports_count() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("the secret launch codes are 1234", RememberOptions::default())
        .await
        .unwrap();
    store
        .remember("unrelated memory about gardening tips", RememberOptions::default())
        .await
        .unwrap();

    let removed = store.forget("the secret launch codes are 1234", 0.8).await.unwrap();
    assert_eq!(removed, 1);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn forget_on_miss_returns_zero() {
    let (_dir, store) = helpers::test_store().await;
    let removed = store.forget("nothing stored yet, this store is empty", 0.8).await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn consolidate_twice_with_no_writes_is_idempotent() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("a stable fact that should not keep changing", RememberOptions::default())
        .await
        .unwrap();

    let first = store.maintain().await.unwrap();
    let second = store.maintain().await.unwrap();

    assert_eq!(second.duplicates_removed, 0);
    assert_eq!(second.memories_merged, 0);
    assert_eq!(first.tier_histogram_after, second.tier_histogram_before);
}
