//! Local HTTP summarization backend: `POST {url}/api/generate` (Ollama-shaped),
//! mirroring [`super::super::embedding::ollama`]'s wire style.

use super::LlmProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct LocalLlmProvider {
    url: String,
    model: String,
    client: Client,
}

impl LocalLlmProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            url,
            model,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for LocalLlmProvider {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let full_prompt = match system {
            Some(s) => format!("{s}\n\n{prompt}"),
            None => prompt.to_string(),
        };

        let body = serde_json::json!({
            "model": self.model,
            "prompt": full_prompt,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("local llm error (status {}): {}", status, text));
        }

        let json: serde_json::Value = response.json().await?;
        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("invalid local llm response: missing 'response' field"))
    }
}
