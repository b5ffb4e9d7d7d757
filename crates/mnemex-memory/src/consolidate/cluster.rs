//! Cluster phase: groups WARM/COLD memories for the summarize phase.
//!
//! Greedy single-pass clustering restricted to WARM/COLD tiers. HOT
//! memories are too fresh to merge and ARCHIVE memories are already at the
//! end of their lifecycle. Reuses [`crate::vector::cosine_similarity`] like
//! every other phase.

use crate::types::{Memory, Tier};
use crate::vector::cosine_similarity;
use crate::types::ConsolidateConfig;

/// Returns disjoint clusters (each a list of indices into `memories`) of
/// size at least `cfg.min_cluster_size`. HOT and ARCHIVE memories never
/// appear in any cluster.
pub fn run(memories: &[Memory], cfg: &ConsolidateConfig) -> Vec<Vec<usize>> {
    let eligible: Vec<usize> = memories
        .iter()
        .enumerate()
        .filter(|(_, m)| matches!(m.tier, Tier::Warm | Tier::Cold))
        .map(|(i, _)| i)
        .collect();

    let mut assigned = vec![false; memories.len()];
    let mut clusters = Vec::new();

    for (pos, &c) in eligible.iter().enumerate() {
        if assigned[c] {
            continue;
        }
        let mut members = vec![c];
        assigned[c] = true;

        for &o in &eligible[pos + 1..] {
            if assigned[o] {
                continue;
            }
            if cosine_similarity(&memories[c].embedding, &memories[o].embedding) >= cfg.cluster_threshold
            {
                members.push(o);
                assigned[o] = true;
            }
        }

        if members.len() < cfg.min_cluster_size {
            for &m in &members {
                assigned[m] = false;
            }
        } else {
            clusters.push(members);
        }
    }

    clusters
}
