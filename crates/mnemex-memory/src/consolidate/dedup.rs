//! Deduplicate phase: collapses near-identical memories.
//!
//! A pairwise cosine scan keeps the higher keep-score survivor and drops
//! the other, repeating until no pair exceeds the similarity threshold.

use crate::vector::cosine_similarity;
use crate::types::Memory;

/// Removes memories pairwise until no two remaining memories have cosine
/// similarity above `threshold`. On a tie, the earlier index survives.
/// Returns the number of memories removed.
pub fn run(memories: &mut Vec<Memory>, threshold: f32) -> usize {
    let mut removed_total = 0;

    loop {
        let n = memories.len();
        let mut victim: Option<usize> = None;

        'scan: for i in 0..n {
            for j in (i + 1)..n {
                if cosine_similarity(&memories[i].embedding, &memories[j].embedding) > threshold {
                    victim = Some(if memories[j].keep_score() > memories[i].keep_score() {
                        i
                    } else {
                        j
                    });
                    break 'scan;
                }
            }
        }

        match victim {
            Some(idx) => {
                memories.remove(idx);
                removed_total += 1;
            }
            None => break,
        }
    }

    removed_total
}
