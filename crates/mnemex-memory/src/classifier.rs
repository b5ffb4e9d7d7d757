//! Pattern-based importance classifier.
//!
//! A deterministic, stateless function of a conversation turn that decides
//! whether it deserves storage and what initial importance/tags to assign.
//! Rules are evaluated in a fixed order; `importance` is max-wins across
//! rules, `reason` is first-match-wins.

use crate::types::{ClassifierConfig, Verdict};
use crate::vector::cosine_similarity;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

macro_rules! lazy_regex {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pat).unwrap())
        }
    };
}

lazy_regex!(acknowledgment_re, r"(?i)^\s*(ok(ay)?|yes|no|sure|thanks|thank you|got it|cool|alright|fine|yep|nope)[.!]?\s*$");
lazy_regex!(greeting_re, r"(?i)^\s*(hi|hey|hello|good morning|good afternoon|good evening|yo|howdy)[.!,]?\s*$");
lazy_regex!(filler_re, r"(?i)\b(let me check|one moment|working on it|give me a (second|sec|moment)|on it|looking into it)\b");

lazy_regex!(
    explicit_re,
    r"(?i)\b(remember|note|save|store|don't forget|keep in mind|write down)\b"
);
lazy_regex!(
    decision_re,
    r"(?i)\b(we decided|let's go with|the plan is|going with|chose|settled on|final answer)\b"
);
lazy_regex!(
    lesson_re,
    r"(?i)\b(i learned|lesson learned|the problem was|never again|turns out|root cause|key insight)\b"
);
lazy_regex!(
    preference_re,
    r"(?i)\b(i prefer|i like|always use|never use|my preference)\b"
);
lazy_regex!(
    identity_re,
    r"(?i)\b(my name is|i am|i work at|my role|i live in)\b"
);
lazy_regex!(
    factual_re,
    r"(?i)\b(password|api key|token|secret|url|endpoint|version|v\d+\.\d+|\d{4}-\d{2}-\d{2})\b"
);
lazy_regex!(
    technical_re,
    r"(?i)\b(architecture|schema|database|deploy(ment)?|migration|algorithm|protocol)\b"
);
lazy_regex!(code_fence_re, r"```[\s\S]{20,}?```");
lazy_regex!(
    code_keyword_re,
    r"\b(function|const|let|var|import|export|class|def|async)\b"
);

/// Whether `sentence` reads like a subject-verb-object assertion: a verb
/// token (or `-ing`/`-ed` form) plus a determiner/object token.
fn is_fact_like(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let has_verb = words.iter().any(|w| {
        ["is", "are", "was", "were", "has", "have", "had", "does", "do", "did"].contains(w)
            || w.ends_with("ing")
            || w.ends_with("ed")
    });
    let has_object = words
        .iter()
        .any(|w| ["the", "a", "an", "this", "that", "these", "those"].contains(w));

    has_verb && has_object
}

/// Number of Unicode scalar values (code points) in `s`.
fn code_point_len(s: &str) -> usize {
    s.chars().count()
}

/// Classify a single conversation turn.
///
/// `new_embedding` / `existing_embeddings` are used only for the
/// deduplication guard: when both are present and non-empty, a turn whose
/// embedding is too close to something already stored is rejected even if
/// the rule table would otherwise have accepted it.
pub fn classify(
    user: &str,
    assistant: &str,
    new_embedding: Option<&[f32]>,
    existing_embeddings: &[Vec<f32>],
    cfg: &ClassifierConfig,
) -> Verdict {
    let trimmed_user = user.trim();

    if code_point_len(trimmed_user) < 10 {
        return reject("too short");
    }
    if acknowledgment_re().is_match(trimmed_user) {
        return reject("acknowledgment/filler");
    }
    if greeting_re().is_match(trimmed_user) {
        return reject("greeting");
    }
    if filler_re().is_match(user) || filler_re().is_match(assistant) {
        return reject("filler");
    }

    let combined = format!("{}\n{}", user, assistant);
    let combined_lower = combined.to_lowercase();

    let mut importance = 0.0f32;
    let mut reason: Option<String> = None;
    let mut tags: BTreeSet<String> = BTreeSet::new();

    let mut apply = |re: &Regex, floor: f32, tag: Option<&str>, this_reason: &str, haystack: &str| {
        if re.is_match(haystack) {
            importance = importance.max(floor);
            if let Some(t) = tag {
                tags.insert(t.to_string());
            }
            if reason.is_none() {
                reason = Some(this_reason.to_string());
            }
        }
    };

    apply(explicit_re(), 0.95, Some("explicit"), "explicit remember command", &combined_lower);
    apply(decision_re(), 0.85, Some("decision"), "contains decision", &combined_lower);
    apply(lesson_re(), 0.85, Some("lesson"), "contains lesson/insight", &combined_lower);
    apply(preference_re(), 0.80, Some("preference"), "contains preference", &combined_lower);
    apply(identity_re(), 0.80, Some("identity"), "contains identity information", &combined_lower);
    apply(factual_re(), 0.60, Some("factual"), "contains factual/config data", &combined_lower);
    apply(technical_re(), 0.50, Some("technical"), "contains technical discussion", &combined_lower);

    if code_fence_re().is_match(&combined) || code_keyword_re().is_match(&combined_lower) {
        importance = importance.max(0.45);
        tags.insert("code".to_string());
        tags.insert("technical".to_string());
        if reason.is_none() {
            reason = Some("contains code".to_string());
        }
    }

    let word_count = combined.split_whitespace().count();
    if word_count > 200 && importance < 0.4 {
        importance = importance.max(0.40);
        if reason.is_none() {
            reason = Some("substantive exchange (length)".to_string());
        }
    }

    if let (Some(new_emb), false) = (new_embedding, existing_embeddings.is_empty()) {
        let max_sim = existing_embeddings
            .iter()
            .map(|e| cosine_similarity(new_emb, e))
            .fold(f32::MIN, f32::max);
        if max_sim > cfg.deduplicate_threshold {
            return Verdict {
                should_remember: false,
                importance,
                reason: format!("duplicate (similarity: {:.0}%)", max_sim * 100.0),
                suggested_tags: tags,
            };
        }
    }

    if importance == 0.0 {
        if word_count > 30 {
            importance = 0.2;
            reason = Some("general conversation".to_string());
        } else if word_count > 3 && is_fact_like(&combined_lower) {
            importance = 0.15;
            tags.insert("factual".to_string());
            reason = Some("fact-like sentence structure".to_string());
        } else {
            return Verdict {
                should_remember: false,
                importance: 0.0,
                reason: "no importance signals".to_string(),
                suggested_tags: tags,
            };
        }
    }

    Verdict {
        should_remember: importance >= cfg.min_importance,
        importance,
        reason: reason.unwrap_or_else(|| "no importance signals".to_string()),
        suggested_tags: tags,
    }
}

fn reject(reason: &str) -> Verdict {
    Verdict {
        should_remember: false,
        importance: 0.0,
        reason: reason.to_string(),
        suggested_tags: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn decision_language_is_remembered() {
        let v = classify(
            "We decided to use MIT license for all repos",
            "MIT license it is.",
            None,
            &[],
            &cfg(),
        );
        assert!(v.should_remember);
        assert!(v.importance >= 0.85);
        assert!(v.suggested_tags.contains("decision"));
        assert_eq!(v.reason, "contains decision");
    }

    #[test]
    fn acknowledgment_is_skipped() {
        let v = classify("ok", "Got it.", None, &[], &cfg());
        assert!(!v.should_remember);
        assert_eq!(v.importance, 0.0);
        assert_eq!(v.reason, "acknowledgment/filler");
    }

    #[test]
    fn greeting_is_skipped() {
        let v = classify("hello", "Hi there!", None, &[], &cfg());
        assert!(!v.should_remember);
        assert_eq!(v.reason, "greeting");
    }

    #[test]
    fn too_short_is_skipped() {
        let v = classify("hm", "What?", None, &[], &cfg());
        assert_eq!(v.reason, "too short");
    }

    #[test]
    fn explicit_command_outranks_everything() {
        let v = classify(
            "Remember that we decided to use Postgres",
            "Noted.",
            None,
            &[],
            &cfg(),
        );
        assert!(v.importance >= 0.95);
        assert_eq!(v.reason, "explicit remember command");
        assert!(v.suggested_tags.contains("explicit"));
    }

    #[test]
    fn dedup_guard_rejects_near_duplicate() {
        let existing = vec![vec![1.0, 0.0, 0.0, 0.0]];
        let v = classify(
            "We decided to use MIT license for all repos",
            "MIT license it is.",
            Some(&[1.0, 0.0, 0.0, 0.0]),
            &existing,
            &cfg(),
        );
        assert!(!v.should_remember);
        assert!(v.reason.starts_with("duplicate"));
    }

    #[test]
    fn long_exchange_without_signals_gets_general_fallback() {
        let filler_word = "lorem ";
        let long_text: String = filler_word.repeat(40);
        let v = classify(&long_text, "ipsum", None, &[], &cfg());
        assert!(v.should_remember);
        assert_eq!(v.reason, "general conversation");
        assert!((v.importance - 0.2).abs() < 1e-6);
    }

    #[test]
    fn short_no_signal_utterance_is_rejected() {
        let v = classify("xyzabc qwerty", "uh huh", None, &[], &cfg());
        assert!(!v.should_remember);
    }

    #[test]
    fn code_block_is_tagged() {
        let user = "Here is the fix:\n```\nfn main() { println!(\"hi\"); }\n```";
        let v = classify(user, "Looks good.", None, &[], &cfg());
        assert!(v.suggested_tags.contains("code"));
        assert!(v.suggested_tags.contains("technical"));
    }

    #[test]
    fn classifier_is_deterministic() {
        let v1 = classify("I prefer dark mode always", "Sure.", None, &[], &cfg());
        let v2 = classify("I prefer dark mode always", "Sure.", None, &[], &cfg());
        assert_eq!(v1.importance, v2.importance);
        assert_eq!(v1.reason, v2.reason);
        assert_eq!(v1.suggested_tags, v2.suggested_tags);
    }
}
