//! Anthropic `/v1/messages` summarization backend: `x-api-key` plus
//! `anthropic-version` header.

use super::LlmProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicLlmProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    client: Client,
}

impl AnthropicLlmProvider {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            max_tokens,
            base_url: "https://api.anthropic.com".to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicLlmProvider {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(system) = system {
            body["system"] = serde_json::Value::String(system.to_string());
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("anthropic API error (status {}): {}", status, text));
        }

        let json: serde_json::Value = response.json().await?;
        json["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("invalid anthropic response: missing content[0].text"))
    }
}
