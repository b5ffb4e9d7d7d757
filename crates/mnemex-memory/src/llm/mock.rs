//! Deterministic LLM double for tests, with no network access required.
//!
//! Mirrors [`crate::embedding::local::LocalEmbeddingProvider`]'s role as a
//! network-free stand-in: the summarize phase needs some provider configured
//! to exercise cluster merging in tests, and this one returns a predictable,
//! inspectable summary instead of calling out to a real model.

use super::LlmProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every prompt it was asked to summarize and returns a fixed-shape
/// summary derived from the prompt's cluster member count, so tests can
/// assert on summarization's side effects without depending on real model
/// output.
pub struct MockLlmProvider {
    pub calls: Mutex<Vec<String>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn generate(&self, prompt: &str, _system: Option<&str>) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());
        let member_count = prompt.matches("\n---\n").count() + 1;
        Ok(format!("Consolidated summary of {member_count} related memories."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_counts_members() {
        let llm = MockLlmProvider::new();
        let out = llm.generate("a\n---\nb\n---\nc", Some("sys")).await.unwrap();
        assert!(out.contains("3 related memories"));
        assert_eq!(llm.call_count(), 1);
    }
}
