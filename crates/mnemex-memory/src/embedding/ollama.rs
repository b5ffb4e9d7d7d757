//! Ollama-shaped remote embedding provider: `POST {url}/api/embeddings` with
//! `{model, prompt}`, reading `.embedding` from the response. Structured the
//! same way as [`super::openai::OpenAiEmbeddingProvider`]: same client/cache
//! shape, different wire format.

use super::EmbeddingProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use tokio::sync::Mutex;
use tracing::instrument;

pub struct OllamaEmbeddingProvider {
    url: String,
    model: String,
    client: Client,
    cache: Mutex<HashMap<u64, Vec<f32>>>,
}

impl OllamaEmbeddingProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            url,
            model,
            client: Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn compute_hash(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    #[instrument(skip(self, text), fields(model = self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = Self::compute_hash(text);
        if let Some(cached) = self.cache.lock().await.get(&hash) {
            return Ok(cached.clone());
        }

        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("ollama embeddings error (status {}): {}", status, text));
        }

        let json: serde_json::Value = response.json().await?;
        let embedding_array = json["embedding"]
            .as_array()
            .ok_or_else(|| anyhow!("invalid ollama response: missing embedding array"))?;

        let embedding: Vec<f32> = embedding_array
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| anyhow!("invalid embedding value in ollama response"))?;

        self.cache.lock().await.insert(hash, embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        // Ollama does not advertise dimensionality up front; the store
        // establishes the dimension from the first successful embed call.
        0
    }
}
