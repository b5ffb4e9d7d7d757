//! # mnemex
//!
//! Autonomous, self-curating memory for conversational AI agents: a
//! single-file persistent store of text memories, each with a dense
//! embedding, that decides on its own what to keep, how to rank it at
//! recall time, and how to compact itself as it grows. Consumed as an
//! embedded library by an agent process; it is not a server.
//!
//! Three tightly coupled subsystems carry the behavioral contract:
//!
//! - [`classifier`]: a deterministic importance/tag classifier for
//!   conversation turns.
//! - [`recall`]: similarity search fused with a tier/importance/recency
//!   scoring rubric.
//! - [`consolidate`]: the five-phase decay, deduplicate, cluster,
//!   summarize, archive curation pass.
//!
//! [`store::Store`] is the facade gluing these to the [`embedding`] and
//! [`llm`] external adapters and the on-disk [`persistence`] format.
//!
//! ## Example
//!
//! ```no_run
//! use mnemex::{Store, MnemexConfig, RememberOptions, RecallOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Store::init(MnemexConfig::new("/tmp/agent.json")).await?;
//!
//! store.remember("the user prefers dark mode", RememberOptions::default()).await?;
//! let hits = store.recall("what does the user prefer", RecallOptions::default()).await?;
//! for hit in hits {
//!     println!("{} ({:.2})", hit.content, hit.score);
//! }
//!
//! store.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod consolidate;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod persistence;
pub mod recall;
pub mod store;
pub mod types;
pub mod vector;

pub use config::MnemexConfig;
pub use error::MnemexError;
pub use store::Store;
pub use types::*;
