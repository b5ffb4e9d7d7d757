//! Decay phase: ages memories through the tier lifecycle.
//!
//! Instead of a binary expire/keep decision, each memory's age is weighed
//! against its access history and importance into a graduated tier-advance
//! formula.

use crate::types::{ConsolidateConfig, Memory, Tier};
use chrono::{DateTime, Utc};

/// Advances each memory's tier at most one step, per the `adjustedAge`
/// formula. Returns the number of memories that transitioned. No memory
/// skips a tier in one pass and none ever moves backward.
pub fn run(memories: &mut [Memory], cfg: &ConsolidateConfig, now: DateTime<Utc>) -> usize {
    let mut transitions = 0;

    for m in memories.iter_mut() {
        let Some(next) = m.tier.next() else {
            continue;
        };

        let age_days = (now - m.created_at).num_milliseconds() as f64 / 86_400_000.0;
        let access_boost = (m.access_count as f64 * 0.5).min(5.0);
        let effective_age = age_days - access_boost;
        let importance_mul = 1.0 + 2.0 * m.importance as f64;
        let adjusted_age = effective_age / importance_mul;

        let threshold = match m.tier {
            Tier::Hot => cfg.hot_days,
            Tier::Warm => cfg.warm_days,
            Tier::Cold => cfg.cold_days,
            Tier::Archive => unreachable!("Tier::next() returned None for Archive above"),
        };

        if adjusted_age > threshold {
            m.tier = next;
            transitions += 1;
        }
    }

    transitions
}
