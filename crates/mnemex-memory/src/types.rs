//! Core data types for the mnemex memory store.
//!
//! This module defines [`Memory`], the single primary entity, its lifecycle
//! [`Tier`], and the options structs shared by the recall engine and
//! consolidation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Lifecycle tier of a memory. Ordered `Hot < Warm < Cold < Archive`;
/// only the decay phase of consolidation produces forward transitions and
/// no backward transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Hot,
    Warm,
    Cold,
    Archive,
}

impl Tier {
    /// The tier one step further along the lifecycle, or `None` at `Archive`.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Hot => Some(Tier::Warm),
            Tier::Warm => Some(Tier::Cold),
            Tier::Cold => Some(Tier::Archive),
            Tier::Archive => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cold => "cold",
            Tier::Archive => "archive",
        };
        write!(f, "{}", s)
    }
}

/// Well-known metadata fields promoted to typed storage, plus a spill map
/// for caller-supplied extras.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetadata {
    /// Why the classifier (or caller) decided this was worth keeping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set by Phase 4 (summarize): how many memories were folded into this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidated_from: Option<usize>,
    /// Set by Phase 4: when the summarization happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidated_at: Option<DateTime<Utc>>,
    /// Set by Phase 5 (archive): content was truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    /// Set by Phase 5: the content length before truncation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,
    /// Arbitrary caller-supplied extras not promoted to a typed field.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A single retained fact with its embedding and lifecycle bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: uuid::Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub importance: f32,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

impl Memory {
    /// Creates a new HOT memory with the given content, embedding, importance
    /// and tags. `created_at`/`last_accessed` are both set to `now`.
    pub fn new(
        content: String,
        embedding: Vec<f32>,
        importance: f32,
        tags: BTreeSet<String>,
        source: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            content,
            embedding,
            tags,
            importance: importance.clamp(0.0, 1.0),
            tier: Tier::Hot,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            source,
            metadata: MemoryMetadata::default(),
        }
    }

    /// The "keep score" used by dedup and summarize to pick survivors:
    /// `importance + 0.1 * access_count`.
    pub fn keep_score(&self) -> f32 {
        self.importance + 0.1 * self.access_count as f32
    }
}

/// Options controlling a [`crate::recall::recall`] call.
#[derive(Debug, Clone)]
pub struct RecallOptions {
    pub limit: usize,
    pub min_score: f32,
    pub tiers: Option<Vec<Tier>>,
    pub tags: Option<Vec<String>>,
    pub decay_boost: bool,
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self {
            limit: 8,
            min_score: 0.15,
            tiers: None,
            tags: None,
            decay_boost: true,
        }
    }
}

/// One recall result: the index of the matched memory in the store's
/// sequence and its final (boosted) score.
#[derive(Debug, Clone)]
pub struct RecallHit {
    pub index: usize,
    pub score: f32,
}

/// The classifier's verdict on a conversation turn.
#[derive(Debug, Clone, Default)]
pub struct Verdict {
    pub should_remember: bool,
    pub importance: f32,
    pub reason: String,
    pub suggested_tags: BTreeSet<String>,
}

/// Thresholds consulted by [`crate::classifier::classify`].
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub min_importance: f32,
    pub deduplicate_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_importance: 0.3,
            deduplicate_threshold: 0.92,
        }
    }
}

/// Thresholds consulted by the consolidation pipeline ([`crate::consolidate`]).
///
/// `deduplicate_threshold` mirrors [`ClassifierConfig::deduplicate_threshold`]
/// deliberately: both gate the same "near-duplicate" notion and must never
/// drift apart, so callers are expected to derive both from one configured
/// value (see `MnemexConfig` in `config.rs`) rather than tune them
/// independently.
#[derive(Debug, Clone)]
pub struct ConsolidateConfig {
    pub hot_days: f64,
    pub warm_days: f64,
    pub cold_days: f64,
    pub min_cluster_size: usize,
    pub cluster_threshold: f32,
    pub deduplicate_threshold: f32,
}

impl Default for ConsolidateConfig {
    fn default() -> Self {
        Self {
            hot_days: 7.0,
            warm_days: 30.0,
            cold_days: 365.0,
            min_cluster_size: 3,
            cluster_threshold: 0.78,
            deduplicate_threshold: 0.92,
        }
    }
}

/// Options for [`crate::store::Store::remember`].
#[derive(Debug, Clone, Default)]
pub struct RememberOptions {
    pub importance: Option<f32>,
    pub tags: Vec<String>,
    pub source: Option<String>,
}

/// Aggregate counts returned by [`crate::store::Store::stats`].
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub by_tier: HashMap<String, usize>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub file_size_bytes: u64,
    pub last_consolidation: Option<DateTime<Utc>>,
    pub writes_since_consolidation: u64,
}

/// One [`crate::store::Store::recall`] match: the matched memory (minus its
/// embedding, which callers never need) plus the final boosted score.
#[derive(Debug, Clone, Serialize)]
pub struct RecallResult {
    pub id: uuid::Uuid,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub importance: f32,
    pub tier: Tier,
    pub score: f32,
}

/// The four canned recall queries `Store::bootstrap` runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapResult {
    pub identity: Vec<RecallResult>,
    pub priorities: Vec<RecallResult>,
    pub decisions: Vec<RecallResult>,
    pub preferences: Vec<RecallResult>,
}

impl BootstrapResult {
    /// Concatenates every matched memory's content across all four queries,
    /// in query order, one per line.
    pub fn concatenated_content(&self) -> String {
        self.identity
            .iter()
            .chain(self.priorities.iter())
            .chain(self.decisions.iter())
            .chain(self.preferences.iter())
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A memory with its embedding length only (used by [`crate::store::Store::export`]).
#[derive(Debug, Clone, Serialize)]
pub struct ExportedMemory {
    pub id: uuid::Uuid,
    pub content: String,
    pub embedding_len: usize,
    pub tags: BTreeSet<String>,
    pub importance: f32,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub source: Option<String>,
    pub metadata: MemoryMetadata,
}

impl From<&Memory> for ExportedMemory {
    fn from(m: &Memory) -> Self {
        Self {
            id: m.id,
            content: m.content.clone(),
            embedding_len: m.embedding.len(),
            tags: m.tags.clone(),
            importance: m.importance,
            tier: m.tier,
            created_at: m.created_at,
            last_accessed: m.last_accessed,
            access_count: m.access_count,
            source: m.source.clone(),
            metadata: m.metadata.clone(),
        }
    }
}
