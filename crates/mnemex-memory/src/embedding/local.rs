//! Local in-process embedding stand-in (deterministic, no network).
//!
//! The default backend. This crate does not vendor an ONNX/MiniLM runtime,
//! so the local provider hashes the input text into a unit vector instead.
//! This keeps it deterministic, so tests and the classifier's dedup guard
//! behave the same whether or not a real model is wired in. A separate
//! [`crate::llm::mock::MockLlmProvider`]-style double still exists for
//! tests, see the `tests/helpers` module.

use super::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;

pub struct LocalEmbeddingProvider {
    dimensions: usize,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl LocalEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn generate_embedding(dimensions: usize, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut current_hash = hasher.finish();

        let mut embedding = Vec::with_capacity(dimensions);
        for _ in 0..dimensions {
            let value = ((current_hash % 1000) as f32 - 500.0) / 500.0;
            embedding.push(value);
            current_hash = current_hash.wrapping_mul(6364136223846793005).wrapping_add(1);
        }

        crate::vector::normalize(&mut embedding);
        embedding
    }
}

impl Default for LocalEmbeddingProvider {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.lock().unwrap().get(text) {
            return Ok(cached.clone());
        }
        let embedding = Self::generate_embedding(self.dimensions, text);
        self.cache
            .lock()
            .unwrap()
            .insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
