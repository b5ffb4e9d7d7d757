//! The five-phase consolidation pipeline: decay, deduplicate, cluster,
//! summarize, archive, run in strict sequence every time.
//!
//! Each phase lives in its own submodule so it stays independently testable;
//! this module only sequences them and builds the [`ConsolidationReport`]
//! every run produces.

pub mod archive;
pub mod cluster;
pub mod decay;
pub mod dedup;
pub mod summarize;

use crate::config::AutoConsolidateConfig;
use crate::llm::LlmProvider;
use crate::types::{ConsolidateConfig, Memory, Tier};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

impl ConsolidateConfig {
    /// Builds the consolidator's threshold set from the user-facing config,
    /// pinning `deduplicate_threshold` to the single value the classifier
    /// also uses.
    pub fn from_auto_consolidate(cfg: &AutoConsolidateConfig, deduplicate_threshold: f32) -> Self {
        Self {
            hot_days: cfg.hot_days,
            warm_days: cfg.warm_days,
            cold_days: cfg.cold_days,
            min_cluster_size: cfg.min_cluster_size,
            cluster_threshold: cfg.cluster_threshold,
            deduplicate_threshold,
        }
    }
}

/// Summary of what one consolidation pass did, returned to callers for
/// logging and telemetry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConsolidationReport {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub memories_decayed: usize,
    pub duplicates_removed: usize,
    pub clusters_formed: usize,
    pub memories_merged: usize,
    pub memories_archived: usize,
    pub tier_histogram_before: HashMap<String, usize>,
    pub tier_histogram_after: HashMap<String, usize>,
}

pub fn tier_histogram(memories: &[Memory]) -> HashMap<String, usize> {
    let mut histogram = HashMap::new();
    for tier in [Tier::Hot, Tier::Warm, Tier::Cold, Tier::Archive] {
        histogram.insert(tier.to_string(), 0);
    }
    for m in memories {
        *histogram.entry(m.tier.to_string()).or_insert(0) += 1;
    }
    histogram
}

/// Runs all five phases once, in order, against `memories` in place.
///
/// `llm` is optional: when absent, summarization is skipped entirely and
/// clusters formed by the clustering phase are left unmerged.
pub async fn run<L: LlmProvider>(
    memories: &mut Vec<Memory>,
    cfg: &ConsolidateConfig,
    llm: Option<&L>,
    now: DateTime<Utc>,
) -> ConsolidationReport {
    let started = now;
    let tier_histogram_before = tier_histogram(memories);

    let memories_decayed = decay::run(memories, cfg, now);
    let duplicates_removed = dedup::run(memories, cfg.deduplicate_threshold);

    let clusters = cluster::run(memories, cfg);
    let clusters_formed = clusters.len();

    let memories_merged = if let Some(llm) = llm {
        let (merged_memories, merged_count) = summarize::run(memories, &clusters, llm, now).await;
        *memories = merged_memories;
        merged_count
    } else {
        0
    };

    let memories_archived = archive::run(memories);
    let tier_histogram_after = tier_histogram(memories);

    ConsolidationReport {
        timestamp: started,
        duration_ms: (Utc::now() - started).num_milliseconds().max(0) as u64,
        memories_decayed,
        duplicates_removed,
        clusters_formed,
        memories_merged,
        memories_archived,
        tier_histogram_before,
        tier_histogram_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmProvider;
    use std::collections::BTreeSet;

    fn mem(content: &str, embedding: Vec<f32>) -> Memory {
        Memory::new(content.to_string(), embedding, 0.4, BTreeSet::new(), None, Utc::now())
    }

    #[tokio::test]
    async fn full_pipeline_runs_all_phases_in_order() {
        let mut memories = vec![
            mem("alpha fact one", vec![1.0, 0.0, 0.0]),
            mem("alpha fact two", vec![0.98, 0.02, 0.0]),
            mem("alpha fact three", vec![0.97, 0.03, 0.0]),
            mem("unrelated topic", vec![0.0, 1.0, 0.0]),
        ];
        let cfg = ConsolidateConfig {
            cluster_threshold: 0.9,
            min_cluster_size: 3,
            ..ConsolidateConfig::default()
        };
        let llm = MockLlmProvider::new();
        let report = run(&mut memories, &cfg, Some(&llm), Utc::now()).await;

        assert_eq!(report.clusters_formed, 0); // everything still HOT; Phase 3 only considers WARM/COLD
        assert_eq!(report.memories_merged, 0);
        assert_eq!(memories.len(), 4);
    }

    #[tokio::test]
    async fn no_llm_skips_summarize_but_still_runs_other_phases() {
        let mut memories = vec![mem("a", vec![1.0, 0.0]), mem("b", vec![0.999, 0.001])];
        let cfg = ConsolidateConfig::default();
        let report: ConsolidationReport = run::<crate::llm::mock::MockLlmProvider>(&mut memories, &cfg, None, Utc::now()).await;
        assert_eq!(report.memories_merged, 0);
        // duplicate removal still ran regardless of LLM availability.
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(memories.len(), 1);
    }

    #[test]
    fn tier_histogram_counts_every_tier_even_when_empty() {
        let histogram = tier_histogram(&[]);
        assert_eq!(histogram.get("hot"), Some(&0));
        assert_eq!(histogram.get("archive"), Some(&0));
    }
}
