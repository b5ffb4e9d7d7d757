//! Persistence integration tests: save-then-load round trips through the
//! public [`Store`] facade, plus the missing/corrupt-file fallbacks.

use mnemex::{MnemexConfig, RememberOptions, Store};

mod helpers;

#[tokio::test]
async fn close_persists_dirty_state_and_reload_sees_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut cfg = MnemexConfig::new(&path);
    cfg.auto_consolidate.enabled = false;

    let store = Store::init(cfg.clone()).await.unwrap();
    store
        .remember("content worth keeping across restarts", RememberOptions::default())
        .await
        .unwrap();
    store.close().await.unwrap();

    assert!(path.exists());

    let reloaded = Store::init(cfg).await.unwrap();
    let stats = reloaded.stats().await.unwrap();
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn missing_file_yields_empty_store_on_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");
    let mut cfg = MnemexConfig::new(&path);
    cfg.auto_consolidate.enabled = false;

    let store = Store::init(cfg).await.unwrap();
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn corrupt_file_yields_empty_store_on_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "not valid json {{{").unwrap();
    let mut cfg = MnemexConfig::new(&path);
    cfg.auto_consolidate.enabled = false;

    let store = Store::init(cfg).await.unwrap();
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn export_omits_embedding_values_but_keeps_length() {
    let (_dir, store) = helpers::test_store().await;
    store
        .remember("a memory with an embedding under the hood", RememberOptions::default())
        .await
        .unwrap();

    let exported = store.export().await;
    assert_eq!(exported.len(), 1);
    assert!(exported[0].embedding_len > 0);
}
