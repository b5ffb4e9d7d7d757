//! External summarization backends.
//!
//! `LlmProvider` is optional: its absence disables consolidation's
//! summarize phase only. Structured the same way as
//! [`crate::embedding::Embedder`]: a single-method trait plus a closed,
//! config-selected [`Llm`] tagged variant instead of a `dyn` provider
//! swapped at runtime.

pub mod anthropic;
pub mod local;
pub mod mock;
pub mod openai;

use crate::config::LlmConfig;
use crate::error::MnemexError;
use anyhow::Result;
use async_trait::async_trait;

pub use anthropic::AnthropicLlmProvider;
pub use local::LocalLlmProvider;
pub use mock::MockLlmProvider;
pub use openai::OpenAiLlmProvider;

/// `generate(prompt, system?) -> text`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String>;
}

/// Closed set of summarization backends, resolved once from [`LlmConfig`].
pub enum Llm {
    Local(LocalLlmProvider),
    Anthropic(AnthropicLlmProvider),
    OpenAi(OpenAiLlmProvider),
}

impl Llm {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self, MnemexError> {
        match cfg.provider.as_str() {
            "local" => Ok(Llm::Local(LocalLlmProvider::new(
                cfg.url.clone().unwrap_or_else(|| "http://localhost:11434".to_string()),
                cfg.model.clone().unwrap_or_else(|| "llama3".to_string()),
            ))),
            "anthropic" => {
                let api_key = cfg.api_key.clone().ok_or_else(|| {
                    MnemexError::ConfigError("llm.apiKey required for provider 'anthropic'".into())
                })?;
                Ok(Llm::Anthropic(AnthropicLlmProvider::new(
                    api_key,
                    cfg.model.clone().unwrap_or_else(|| "claude-3-haiku-latest".to_string()),
                    cfg.max_tokens.unwrap_or(1024),
                )))
            }
            "openai" => {
                let api_key = cfg.api_key.clone().ok_or_else(|| {
                    MnemexError::ConfigError("llm.apiKey required for provider 'openai'".into())
                })?;
                Ok(Llm::OpenAi(OpenAiLlmProvider::new(
                    api_key,
                    cfg.model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string()),
                    cfg.max_tokens.unwrap_or(1024),
                )))
            }
            other => Err(MnemexError::ConfigError(format!("unknown llm provider: {other}"))),
        }
    }
}

#[async_trait]
impl LlmProvider for Llm {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match self {
            Llm::Local(p) => p.generate(prompt, system).await,
            Llm::Anthropic(p) => p.generate(prompt, system).await,
            Llm::OpenAi(p) => p.generate(prompt, system).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_config_error() {
        let cfg = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            model: None,
            api_key: None,
            url: None,
            max_tokens: None,
        };
        assert!(Llm::from_config(&cfg).is_err());
    }

    #[test]
    fn anthropic_without_api_key_is_config_error() {
        let cfg = LlmConfig {
            provider: "anthropic".to_string(),
            model: None,
            api_key: None,
            url: None,
            max_tokens: None,
        };
        assert!(Llm::from_config(&cfg).is_err());
    }
}
