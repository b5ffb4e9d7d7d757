//! The store facade: the single entry point an embedding agent talks to.
//!
//! Owns the in-memory memory sequence, the configured embedder/summarizer,
//! and the persistence adapter, and sequences every other module behind one
//! `tokio::sync::Mutex` covering the memory sequence, dirty flag, embedding
//! dimension, and write counters, so no two operations can observe or
//! mutate the store out of turn.

use crate::classifier;
use crate::config::MnemexConfig;
use crate::consolidate::{self, ConsolidationReport};
use crate::embedding::{Embedder, EmbeddingProvider};
use crate::error::MnemexError;
use crate::llm::Llm;
use crate::persistence;
use crate::recall;
use crate::types::{
    BootstrapResult, ClassifierConfig, ConsolidateConfig, ExportedMemory, Memory, RecallOptions,
    RecallResult, RememberOptions, StoreStats, Verdict,
};
use crate::vector::{self, cosine_similarity};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use uuid::Uuid;

struct StoreState {
    memories: Vec<Memory>,
    writes_since_consolidation: u64,
    last_consolidation: Option<chrono::DateTime<Utc>>,
    dirty: bool,
    /// Length of the first embedding this store ever produced. Every later
    /// embedding is validated against it, since mixing vectors of different
    /// lengths would make cosine similarity meaningless.
    dimension: Option<usize>,
}

/// The autonomous, self-curating memory store.
///
/// Always reached through [`Store::init`], which is the only fallible
/// constructor. By the time a caller holds an `Arc<Store>` it has already
/// loaded its file and armed its timer, so [`MnemexError::NotInitialized`]
/// is structurally unreachable through this API rather than checked
/// defensively on every call.
pub struct Store {
    config: MnemexConfig,
    embedder: Embedder,
    llm: Option<Llm>,
    state: Mutex<StoreState>,
    consolidating: AtomicBool,
}

fn truncate_preview(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out: String = s.chars().take(limit).collect();
    out.push('…');
    out
}

impl Store {
    /// Ensures the parent directory exists, loads the file if present,
    /// resolves the configured embedder/summarizer, and arms the
    /// auto-consolidation timer if `autoConsolidate.intervalMs != 0`.
    pub async fn init(config: MnemexConfig) -> Result<Arc<Self>, MnemexError> {
        if let Some(parent) = config.file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| MnemexError::PersistenceFailure(e.to_string()))?;
            }
        }

        let embedder = Embedder::from_config(&config.embedder)?;
        let llm = config.llm.as_ref().map(Llm::from_config).transpose()?;
        let memories = persistence::load(&config.file);
        let dimension = memories.first().map(|m| m.embedding.len());

        let store = Arc::new(Self {
            state: Mutex::new(StoreState {
                memories,
                writes_since_consolidation: 0,
                last_consolidation: None,
                dirty: false,
                dimension,
            }),
            embedder,
            llm,
            consolidating: AtomicBool::new(false),
            config,
        });

        if store.config.auto_consolidate.enabled && store.config.auto_consolidate.interval_ms != 0 {
            Self::spawn_auto_consolidate(&store);
        }

        Ok(store)
    }

    fn spawn_auto_consolidate(store: &Arc<Self>) {
        let interval = std::time::Duration::from_millis(store.config.auto_consolidate.interval_ms.max(1));
        let weak: Weak<Store> = Arc::downgrade(store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let Some(store) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = store.consolidate().await {
                    if store.config.debug {
                        tracing::warn!(error = %e, "auto-consolidation timer tick failed");
                    }
                }
            }
        });
    }

    fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            min_importance: self.config.auto_remember.min_importance,
            deduplicate_threshold: self.config.deduplicate_threshold,
        }
    }

    fn consolidate_config(&self) -> ConsolidateConfig {
        ConsolidateConfig::from_auto_consolidate(&self.config.auto_consolidate, self.config.deduplicate_threshold)
    }

    /// Embeds `text` through the configured provider and enforces that
    /// every vector this store ever produces has the same length. The first
    /// successful call establishes the dimension; any later call whose
    /// result doesn't match it fails instead of silently corrupting
    /// similarity scores.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemexError> {
        let mut v = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| MnemexError::EmbedderFailure(e.to_string()))?;
        vector::normalize(&mut v);

        let mut state = self.state.lock().await;
        match state.dimension {
            Some(d) if d != v.len() => {
                return Err(MnemexError::EmbedderFailure(format!(
                    "embedding dimension changed: expected {d}, got {}",
                    v.len()
                )));
            }
            Some(_) => {}
            None => state.dimension = Some(v.len()),
        }

        Ok(v)
    }

    /// Forced consolidation: after any mutating operation that brings the
    /// store over `maxMemories`, synchronously consolidate before returning
    /// control to the caller.
    async fn enforce_size_bound(&self) -> Result<(), MnemexError> {
        let over = {
            let state = self.state.lock().await;
            state.memories.len() > self.config.max_memories
        };
        if over {
            self.consolidate().await?;
        }
        Ok(())
    }

    /// Embeds `content` and appends a HOT memory with the given importance
    /// (default 0.5) and tags. No deduplication check; callers opt into
    /// that via [`Store::process`].
    pub async fn remember(&self, content: &str, opts: RememberOptions) -> Result<Uuid, MnemexError> {
        let embedding = self.embed(content).await?;
        let importance = opts.importance.unwrap_or(0.5);
        let tags: BTreeSet<String> = opts.tags.into_iter().collect();
        let now = Utc::now();

        let id = {
            let mut state = self.state.lock().await;
            let memory = Memory::new(content.to_string(), embedding, importance, tags, opts.source, now);
            let id = memory.id;
            state.memories.push(memory);
            state.writes_since_consolidation += 1;
            state.dirty = true;
            id
        };

        self.maybe_trigger_write_threshold().await?;
        self.enforce_size_bound().await?;
        Ok(id)
    }

    /// Builds `"User: {user}\nAssistant: {assistant[0..500] (…)}"`, embeds it
    /// once, runs the classifier, and, if accepted, stores it with the
    /// verdict's importance/tags (unioned with `autoRemember.defaultTags`),
    /// source `"auto"`, and metadata `{reason}`.
    ///
    /// When `autoRemember.enabled` is false the classifier never runs and
    /// nothing is stored. When `autoRemember.heuristic` is false the
    /// classifier still computes importance/tags/reason but its
    /// `shouldRemember` gate is bypassed, so every turn is stored.
    pub async fn process(&self, user: &str, assistant: &str) -> Result<Verdict, MnemexError> {
        if !self.config.auto_remember.enabled {
            return Ok(Verdict {
                should_remember: false,
                importance: 0.0,
                reason: "autoRemember disabled".to_string(),
                suggested_tags: BTreeSet::new(),
            });
        }

        let combined = format!("User: {}\nAssistant: {}", user, truncate_preview(assistant, 500));
        let embedding = self.embed(&combined).await?;

        let existing: Vec<Vec<f32>> = {
            let state = self.state.lock().await;
            state.memories.iter().map(|m| m.embedding.clone()).collect()
        };

        let mut verdict = classifier::classify(
            user,
            assistant,
            Some(&embedding),
            &existing,
            &self.classifier_config(),
        );

        if !self.config.auto_remember.heuristic {
            verdict.should_remember = true;
        }

        if verdict.should_remember {
            let mut tags = verdict.suggested_tags.clone();
            tags.extend(self.config.auto_remember.default_tags.iter().cloned());

            let mut memory = Memory::new(combined, embedding, verdict.importance, tags, Some("auto".to_string()), Utc::now());
            memory.metadata.reason = Some(verdict.reason.clone());

            {
                let mut state = self.state.lock().await;
                state.memories.push(memory);
                state.writes_since_consolidation += 1;
                state.dirty = true;
            }

            self.maybe_trigger_write_threshold().await?;
            self.enforce_size_bound().await?;
        }

        Ok(verdict)
    }

    async fn maybe_trigger_write_threshold(&self) -> Result<(), MnemexError> {
        if !self.config.auto_consolidate.enabled {
            return Ok(());
        }
        let due = {
            let state = self.state.lock().await;
            state.writes_since_consolidation >= self.config.auto_consolidate.every_n_writes
        };
        if due {
            self.consolidate().await?;
        }
        Ok(())
    }

    /// Embeds `query`, scores every memory, applies tier/importance boosts,
    /// and returns up to `opts.limit` hits above `opts.min_score`. Bumps
    /// `accessCount`/`lastAccessed` on every returned memory before this
    /// call returns.
    pub async fn recall(&self, query: &str, opts: RecallOptions) -> Result<Vec<RecallResult>, MnemexError> {
        let embedding = self.embed(query).await?;
        let now = Utc::now();

        let mut state = self.state.lock().await;
        let hits = recall::recall(&mut state.memories, &embedding, &opts, now);
        if !hits.is_empty() {
            state.dirty = true;
        }

        Ok(hits
            .into_iter()
            .map(|hit| {
                let m = &state.memories[hit.index];
                RecallResult {
                    id: m.id,
                    content: m.content.clone(),
                    tags: m.tags.clone(),
                    importance: m.importance,
                    tier: m.tier,
                    score: hit.score,
                }
            })
            .collect())
    }

    /// Embeds `query` and deletes every memory whose similarity to it
    /// exceeds `threshold` (default 0.8). Returns the number removed.
    pub async fn forget(&self, query: &str, threshold: f32) -> Result<usize, MnemexError> {
        let embedding = self.embed(query).await?;
        let mut state = self.state.lock().await;
        let before = state.memories.len();
        state
            .memories
            .retain(|m| cosine_similarity(&m.embedding, &embedding) <= threshold);
        let removed = before - state.memories.len();
        if removed > 0 {
            state.dirty = true;
        }
        Ok(removed)
    }

    /// Runs the five-phase consolidation pipeline once and persists the
    /// result. Skips (returning a zeroed report) if another consolidation
    /// is already in flight: the timer and the write-threshold trigger may
    /// race, and only one should run per tick.
    pub async fn consolidate(&self) -> Result<ConsolidationReport, MnemexError> {
        if self
            .consolidating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let now = Utc::now();
            return Ok(ConsolidationReport {
                timestamp: now,
                duration_ms: 0,
                memories_decayed: 0,
                duplicates_removed: 0,
                clusters_formed: 0,
                memories_merged: 0,
                memories_archived: 0,
                tier_histogram_before: Default::default(),
                tier_histogram_after: Default::default(),
            });
        }

        let result = self.run_consolidation().await;
        self.consolidating.store(false, Ordering::SeqCst);
        result
    }

    async fn run_consolidation(&self) -> Result<ConsolidationReport, MnemexError> {
        let cfg = self.consolidate_config();
        let now = Utc::now();

        let mut state = self.state.lock().await;
        let report = consolidate::run(&mut state.memories, &cfg, self.llm.as_ref(), now).await;

        persistence::save(&self.config.file, &state.memories)?;
        state.dirty = false;
        state.writes_since_consolidation = 0;
        state.last_consolidation = Some(now);

        Ok(report)
    }

    /// Runs four fixed recall queries (identity, priorities, decisions,
    /// preferences), each with `limit=4, minScore=0.15`, and returns both
    /// the per-query hits and their concatenated content. Run sequentially
    /// rather than truly concurrently: the single exclusive state lock
    /// would serialize them regardless, so a `tokio::join!` over four
    /// lock-acquiring futures buys nothing.
    pub async fn bootstrap(&self) -> Result<BootstrapResult, MnemexError> {
        let opts = || RecallOptions {
            limit: 4,
            min_score: 0.15,
            ..RecallOptions::default()
        };

        Ok(BootstrapResult {
            identity: self.recall("identity name role background", opts()).await?,
            priorities: self.recall("priorities goals current focus", opts()).await?,
            decisions: self.recall("decisions chosen plan", opts()).await?,
            preferences: self.recall("preferences likes dislikes style", opts()).await?,
        })
    }

    /// Counts by tier, oldest/newest `createdAt`, on-disk file size, last
    /// consolidation instant, and writes since the last consolidation.
    pub async fn stats(&self) -> Result<StoreStats, MnemexError> {
        let state = self.state.lock().await;

        let mut by_tier = std::collections::HashMap::new();
        let mut oldest = None;
        let mut newest = None;
        for m in &state.memories {
            *by_tier.entry(m.tier.to_string()).or_insert(0usize) += 1;
            oldest = Some(oldest.map_or(m.created_at, |o: chrono::DateTime<Utc>| o.min(m.created_at)));
            newest = Some(newest.map_or(m.created_at, |n: chrono::DateTime<Utc>| n.max(m.created_at)));
        }

        let file_size_bytes = std::fs::metadata(&self.config.file).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            total: state.memories.len(),
            by_tier,
            oldest,
            newest,
            file_size_bytes,
            last_consolidation: state.last_consolidation,
            writes_since_consolidation: state.writes_since_consolidation,
        })
    }

    /// Alias for [`Store::consolidate`], kept as a thin wrapper rather than
    /// a second code path so the five-phase pipeline stays the single source
    /// of truth for lifecycle management.
    pub async fn maintain(&self) -> Result<ConsolidationReport, MnemexError> {
        self.consolidate().await
    }

    /// Serializes every memory without its embedding (length only).
    pub async fn export(&self) -> Vec<ExportedMemory> {
        let state = self.state.lock().await;
        state.memories.iter().map(ExportedMemory::from).collect()
    }

    /// Persists if dirty. The auto-consolidation timer (if armed) stops on
    /// its own once every strong reference to this `Store` is dropped, since
    /// it only holds a [`Weak`] back-reference.
    pub async fn close(&self) -> Result<(), MnemexError> {
        let mut state = self.state.lock().await;
        if state.dirty {
            persistence::save(&self.config.file, &state.memories)?;
            state.dirty = false;
        }
        Ok(())
    }
}
