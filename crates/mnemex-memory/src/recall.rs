//! Recall engine: similarity search fused with a tier/importance/recency
//! scoring rubric.

use crate::types::{Memory, RecallHit, RecallOptions, Tier};
use crate::vector::cosine_similarity;
use chrono::{DateTime, Utc};

fn tier_boost(tier: Tier) -> f32 {
    match tier {
        Tier::Hot => 1.10,
        Tier::Warm => 1.00,
        Tier::Cold => 0.95,
        Tier::Archive => 0.85,
    }
}

/// Runs the recall pipeline against `memories`, mutating access bookkeeping
/// on every returned hit as a side effect (per the recall engine design).
///
/// Returns hits sorted descending by (boosted) score, stable on ties so
/// insertion order wins between equal scores, truncated to `opts.limit`.
pub fn recall(
    memories: &mut [Memory],
    query_embedding: &[f32],
    opts: &RecallOptions,
    now: DateTime<Utc>,
) -> Vec<RecallHit> {
    let mut scored: Vec<RecallHit> = memories
        .iter()
        .enumerate()
        .filter(|(_, m)| match &opts.tiers {
            Some(tiers) => tiers.contains(&m.tier),
            None => true,
        })
        .filter(|(_, m)| match &opts.tags {
            Some(tags) => tags.iter().any(|t| m.tags.contains(t)),
            None => true,
        })
        .map(|(i, m)| {
            let mut score = cosine_similarity(query_embedding, &m.embedding);
            if opts.decay_boost {
                score *= tier_boost(m.tier);
            }
            score *= 1.0 + m.importance * 0.2;
            RecallHit { index: i, score }
        })
        .filter(|hit| hit.score >= opts.min_score)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(opts.limit);

    for hit in &scored {
        let m = &mut memories[hit.index];
        m.access_count += 1;
        m.last_accessed = now;
    }

    scored
}
