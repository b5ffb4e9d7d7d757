//! Test helpers for the mnemex-memory crate's integration tests.
//!
//! This module provides shared utilities for building a [`Store`] against a
//! temporary file without wiring up a real embedder/LLM network dependency:
//! - `test_store()`: an auto-consolidate-disabled store over a temp-dir file
//! - `test_store_with_limit()`: same, with a caller-chosen `maxMemories`

use mnemex::{MnemexConfig, Store};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a store config rooted in a fresh temp directory, auto-consolidate
/// disabled so tests control exactly when consolidation runs.
pub fn test_config(dir: &TempDir) -> MnemexConfig {
    let mut cfg = MnemexConfig::new(dir.path().join("store.json"));
    cfg.auto_consolidate.enabled = false;
    cfg
}

/// Initializes a store over a fresh temp directory. Returns the directory
/// alongside the store so the caller can keep it alive for the test's
/// duration (it's deleted on drop).
pub async fn test_store() -> (TempDir, Arc<Store>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::init(test_config(&dir)).await.expect("init");
    (dir, store)
}

/// Same as [`test_store`] but with a caller-chosen `maxMemories` ceiling, for
/// exercising forced consolidation on overflow.
pub async fn test_store_with_limit(max_memories: usize) -> (TempDir, Arc<Store>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cfg = test_config(&dir);
    cfg.max_memories = max_memories;
    let store = Store::init(cfg).await.expect("init");
    (dir, store)
}
