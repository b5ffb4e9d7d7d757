//! End-to-end integration tests driving the classifier, store, and recall
//! engine together through [`Store::process`] and [`Store::bootstrap`].

use mnemex::RememberOptions;

mod helpers;

#[tokio::test]
async fn process_remembers_decision_language() {
    let (_dir, store) = helpers::test_store().await;

    let verdict = store
        .process("We decided to use MIT license for all repos", "MIT license it is.")
        .await
        .unwrap();

    assert!(verdict.should_remember);
    assert!(verdict.importance >= 0.85);
    assert!(verdict.suggested_tags.contains("decision"));
    assert_eq!(verdict.reason, "contains decision");

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn process_skips_acknowledgments() {
    let (_dir, store) = helpers::test_store().await;

    let verdict = store.process("ok", "Got it.").await.unwrap();
    assert!(!verdict.should_remember);
    assert_eq!(verdict.importance, 0.0);
    assert_eq!(verdict.reason, "acknowledgment/filler");

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn process_dedup_guard_prevents_second_store_of_same_turn() {
    let (_dir, store) = helpers::test_store().await;

    let user = "We decided to use MIT license for all repos";
    let assistant = "MIT license it is.";

    let first = store.process(user, assistant).await.unwrap();
    assert!(first.should_remember);

    let second = store.process(user, assistant).await.unwrap();
    assert!(!second.should_remember);
    assert!(second.reason.starts_with("duplicate"));

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn bootstrap_runs_four_canned_queries_and_concatenates_hits() {
    let (_dir, store) = helpers::test_store().await;

    store
        .remember(
            "my name is Dana and I work at Acme Corp",
            RememberOptions {
                tags: vec!["identity".to_string()],
                ..RememberOptions::default()
            },
        )
        .await
        .unwrap();
    store
        .remember(
            "we decided to ship the preferences panel first",
            RememberOptions {
                tags: vec!["decision".to_string()],
                ..RememberOptions::default()
            },
        )
        .await
        .unwrap();

    let result = store.bootstrap().await.unwrap();
    let concatenated = result.concatenated_content();

    // At least one of the four canned queries should have surfaced one of
    // the two seeded memories; the exact bucket depends on the local
    // embedder's hash-based similarity, so we only assert on the union.
    assert!(
        concatenated.contains("Dana") || concatenated.contains("preferences panel"),
        "expected bootstrap to surface at least one seeded memory, got: {concatenated:?}"
    );
}

#[tokio::test]
async fn process_disabled_auto_remember_never_stores() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = helpers::test_config(&dir);
    cfg.auto_remember.enabled = false;
    let store = mnemex::Store::init(cfg).await.unwrap();

    let verdict = store
        .process("I learned the root cause was a stale cache entry", "Good catch.")
        .await
        .unwrap();
    assert!(!verdict.should_remember);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 0);
}
