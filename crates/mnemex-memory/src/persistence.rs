//! On-disk container for a store's memories.
//!
//! A single JSON document `{version, format: "engram-trace", memories: [...]}`
//! with each memory's embedding as a plain `f32` array. A missing, empty, or
//! unparseable file yields an empty store plus a `tracing::warn!`, never a
//! hard failure.

use crate::error::MnemexError;
use crate::types::Memory;
use std::path::Path;

const FORMAT_TAG: &str = "engram-trace";
const VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedFile {
    version: u32,
    format: String,
    memories: Vec<serde_json::Value>,
}

/// Loads memories from `path`. Any failure to read or parse the file, or
/// the file simply not existing, yields an empty store with a warning
/// rather than propagating an error.
pub fn load(path: &Path) -> Vec<Memory> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "failed to read memory store file");
            return Vec::new();
        }
    };

    if contents.trim().is_empty() {
        return Vec::new();
    }

    let parsed: PersistedFile = match serde_json::from_str(&contents) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "memory store file failed to parse, starting empty");
            return Vec::new();
        }
    };

    let mut memories = Vec::with_capacity(parsed.memories.len());
    let mut dimension: Option<usize> = None;

    for raw in parsed.memories {
        match serde_json::from_value::<Memory>(raw) {
            Ok(m) if dimension.map_or(true, |d| d == m.embedding.len()) => {
                dimension = dimension.or(Some(m.embedding.len()));
                memories.push(m);
            }
            Ok(m) => {
                tracing::warn!(
                    id = %m.id,
                    expected = dimension.unwrap_or(0),
                    got = m.embedding.len(),
                    "skipping memory record with mismatched embedding dimension"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping corrupt memory record");
            }
        }
    }

    memories
}

/// Persists `memories` to `path`, creating parent directories as needed.
/// A genuine I/O failure (disk full, permission denied) is surfaced as
/// [`MnemexError::PersistenceFailure`]; there is no second format to fall
/// back to once the JSON write itself fails.
pub fn save(path: &Path, memories: &[Memory]) -> Result<(), MnemexError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MnemexError::PersistenceFailure(e.to_string()))?;
        }
    }

    let envelope = PersistedFile {
        version: VERSION,
        format: FORMAT_TAG.to_string(),
        memories: memories
            .iter()
            .map(|m| serde_json::to_value(m).expect("Memory always serializes"))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&envelope)
        .map_err(|e| MnemexError::PersistenceFailure(e.to_string()))?;

    std::fs::write(path, json).map_err(|e| MnemexError::PersistenceFailure(e.to_string()))
}
