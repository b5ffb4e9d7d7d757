//! Archive phase: shrinks long-lived ARCHIVE-tier content to a stub.
//!
//! Once a memory has survived all the way to ARCHIVE it is kept mostly for
//! provenance, so its stored content is capped at 200 code points: a
//! long-lived store doesn't keep paying full storage cost for memories that
//! are rarely, if ever, recalled again. Memories tagged `consolidated` are
//! exempt, since the summarize phase already shrank them to a summary and a
//! second truncation would stack atop one that already discarded detail on
//! purpose.

use crate::types::{Memory, Tier};

const MAX_CONTENT_CHARS: usize = 200;

/// Truncates over-long, non-`consolidated` ARCHIVE-tier content in place.
/// Returns the number of memories truncated this pass.
pub fn run(memories: &mut [Memory]) -> usize {
    let mut truncated = 0;

    for m in memories.iter_mut() {
        if m.tier != Tier::Archive {
            continue;
        }
        if m.tags.contains("consolidated") {
            continue;
        }

        let char_count = m.content.chars().count();
        if char_count <= MAX_CONTENT_CHARS {
            continue;
        }

        let original_length = char_count;
        let mut stub: String = m.content.chars().take(MAX_CONTENT_CHARS).collect();
        stub.push_str("...");
        m.content = stub;
        m.metadata.truncated = Some(true);
        m.metadata.original_length = Some(original_length);
        truncated += 1;
    }

    truncated
}
