//! Error taxonomy for the mnemex memory store.
//!
//! Internal modules return [`MnemexError`] so failure modes stay distinguishable;
//! the facade ([`crate::store::Store`]) surfaces them to callers as `anyhow::Error`
//! at the operation boundary, per the error handling design.

use thiserror::Error;

/// Errors produced by the memory store and its subsystems.
#[derive(Debug, Error)]
pub enum MnemexError {
    /// An operation was attempted before [`crate::store::Store::init`] completed.
    #[error("memory store used before init()")]
    NotInitialized,

    /// The embedding backend failed to produce a vector.
    #[error("embedding provider failed: {0}")]
    EmbedderFailure(String),

    /// The LLM backend failed to produce a summary.
    #[error("llm provider failed: {0}")]
    LlmFailure(String),

    /// Reading or writing the store file failed.
    #[error("persistence failed: {0}")]
    PersistenceFailure(String),

    /// The configuration was invalid (unknown provider tag, missing API key, ...).
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// A record in the persisted file was malformed and had to be skipped.
    #[error("corrupt memory record: {0}")]
    CorruptInput(String),
}
