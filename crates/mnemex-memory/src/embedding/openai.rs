//! Commercial HTTP embedding provider: bearer auth, `POST /v1/embeddings`.
//! Implements the single-text `embed` contract the `Embedder` trait
//! requires; there is no batch variant since the store only ever embeds
//! one turn at a time.

use super::EmbeddingProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use tokio::sync::Mutex;
use tracing::instrument;

pub struct OpenAiEmbeddingProvider {
    api_key: String,
    model: String,
    dimensions: usize,
    client: Client,
    cache: Mutex<HashMap<u64, Vec<f32>>>,
}

impl OpenAiEmbeddingProvider {
    pub fn new(api_key: String, model: Option<String>, dimensions: Option<usize>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| "text-embedding-3-small".to_string()),
            dimensions: dimensions.unwrap_or(1536),
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
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    #[instrument(skip(self, text), fields(model = self.model, dimensions = self.dimensions))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = Self::compute_hash(text);
        if let Some(cached) = self.cache.lock().await.get(&hash) {
            tracing::debug!("cache hit for text");
            return Ok(cached.clone());
        }

        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "dimensions": self.dimensions,
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error (status {}): {}", status, error_text));
        }

        let json: serde_json::Value = response.json().await?;
        let embedding_array = json["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| anyhow!("invalid response: missing or invalid embedding array"))?;

        let embedding: Vec<f32> = embedding_array
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| anyhow!("invalid embedding value"))?;

        self.cache.lock().await.insert(hash, embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
