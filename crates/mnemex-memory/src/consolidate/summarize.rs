//! Summarize phase: folds each cluster into its best member via the LLM.
//!
//! Only runs when an [`LlmProvider`] is configured; per-cluster failures are
//! swallowed with no data loss. Uses the same best-member-survives idea as
//! [`super::dedup::run`]'s keep-score rule. Cluster indexing is computed
//! against the original `memories` slice, but summaries and removals are
//! written into a diverging `result` vector, with all removals applied only
//! after every cluster has been processed. Preserving that ordering is
//! load-bearing, not cosmetic: indices from an earlier cluster would shift
//! underneath a later one if removals were applied in between.

use crate::llm::LlmProvider;
use crate::types::Memory;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

const SYSTEM_PROMPT: &str = "You are a memory consolidation system. Output only the consolidated summary, nothing else. Be concise but preserve all key information.";
const USER_PREFIX: &str = "Consolidate these related memories into a single concise summary. Preserve all important facts, decisions, and details. Remove redundancy.";

/// Summarizes every cluster whose LLM response is non-empty and at least 10
/// characters. Returns the updated memory set and the number of memories
/// merged away (`0` if `clusters` is empty or every cluster's LLM call
/// failed/was too short).
pub async fn run<L: LlmProvider>(
    memories: &[Memory],
    clusters: &[Vec<usize>],
    llm: &L,
    now: DateTime<Utc>,
) -> (Vec<Memory>, usize) {
    let mut result: Vec<Memory> = memories.to_vec();
    let mut to_remove: HashSet<usize> = HashSet::new();
    let mut merged = 0;

    for cluster in clusters {
        let concatenated = cluster
            .iter()
            .map(|&i| memories[i].content.as_str())
            .collect::<Vec<_>>()
            .join("\n---\n");
        let prompt = format!("{USER_PREFIX}\n\n{concatenated}");

        let summary = match llm.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "phase 4 llm call failed, skipping cluster");
                continue;
            }
        };

        if summary.chars().count() < 10 {
            continue;
        }

        let mut best = cluster[0];
        let mut best_score = memories[best].keep_score();
        for &i in &cluster[1..] {
            let score = memories[i].keep_score();
            if score > best_score {
                best = i;
                best_score = score;
            }
        }

        let max_importance = cluster
            .iter()
            .map(|&i| memories[i].importance)
            .fold(0.0_f32, f32::max);
        let mut tags: BTreeSet<String> = cluster
            .iter()
            .flat_map(|&i| memories[i].tags.iter().cloned())
            .collect();
        tags.insert("consolidated".to_string());

        result[best].content = summary;
        result[best].tags = tags;
        result[best].importance = max_importance;
        result[best].metadata.consolidated_from = Some(cluster.len());
        result[best].metadata.consolidated_at = Some(now);

        for &i in cluster {
            if i != best {
                to_remove.insert(i);
                merged += 1;
            }
        }
    }

    let filtered = result
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !to_remove.contains(i))
        .map(|(_, m)| m)
        .collect();

    (filtered, merged)
}
