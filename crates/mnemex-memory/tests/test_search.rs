//! Recall engine integration tests for the mnemex-memory crate, exercised
//! through the public [`Store`] facade rather than the bare `recall` module.
//!
//! - Returns the closest matches to a query
//! - Honors `limit` and `minScore`
//! - Filters by tier and tag
//! - Bumps access bookkeeping on every hit

use mnemex::{RecallOptions, RememberOptions, Tier};

mod helpers;

#[tokio::test]
async fn recall_ranks_matching_content_above_unrelated_content() {
    let (_dir, store) = helpers::test_store().await;

    store
        .remember("the launch date is March 3rd", RememberOptions::default())
        .await
        .unwrap();
    store
        .remember("we prefer dark roast coffee in the office", RememberOptions::default())
        .await
        .unwrap();

    let hits = store
        .recall("the launch date is March 3rd", RecallOptions::default())
        .await
        .unwrap();

    assert!(!hits.is_empty());
    assert!(hits[0].content.contains("launch date"));
}

#[tokio::test]
async fn limit_truncates_results() {
    let (_dir, store) = helpers::test_store().await;
    for i in 0..10 {
        store
            .remember(&format!("distinct fact number {i}"), RememberOptions::default())
            .await
            .unwrap();
    }

    let hits = store
        .recall(
            "distinct fact",
            RecallOptions {
                limit: 3,
                min_score: 0.0,
                ..RecallOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn tag_filter_only_returns_tagged_memories() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember(
            "tagged alpha fact",
            RememberOptions {
                tags: vec!["alpha".to_string()],
                ..RememberOptions::default()
            },
        )
        .await
        .unwrap();
    store
        .remember(
            "tagged beta fact",
            RememberOptions {
                tags: vec!["beta".to_string()],
                ..RememberOptions::default()
            },
        )
        .await
        .unwrap();

    let hits = store
        .recall(
            "fact",
            RecallOptions {
                tags: Some(vec!["alpha".to_string()]),
                min_score: 0.0,
                ..RecallOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert!(hits[0].tags.contains("alpha"));
}

#[tokio::test]
async fn tier_filter_excludes_non_matching_tiers() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("a fresh hot memory", RememberOptions::default())
        .await
        .unwrap();

    let hits = store
        .recall(
            "a fresh hot memory",
            RecallOptions {
                tiers: Some(vec![Tier::Archive]),
                min_score: 0.0,
                ..RecallOptions::default()
            },
        )
        .await
        .unwrap();
    assert!(hits.is_empty());

    let hits = store
        .recall(
            "a fresh hot memory",
            RecallOptions {
                tiers: Some(vec![Tier::Hot]),
                min_score: 0.0,
                ..RecallOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn min_score_excludes_weak_matches() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("completely unrelated content about gardening", RememberOptions::default())
        .await
        .unwrap();

    let hits = store
        .recall(
            "quarterly financial projections",
            RecallOptions {
                min_score: 0.99,
                ..RecallOptions::default()
            },
        )
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn empty_store_recall_returns_empty() {
    let (_dir, store) = helpers::test_store().await;
    let hits = store.recall("anything at all", RecallOptions::default()).await.unwrap();
    assert!(hits.is_empty());
}
