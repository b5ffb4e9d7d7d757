//! External embedding backends.
//!
//! `EmbeddingProvider` is a single-method trait (`text -> vector`); concrete
//! providers are selected once, at [`crate::store::Store`] construction, via
//! the [`Embedder`] tagged variant rather than runtime dispatch, since the
//! store never swaps providers after construction.

pub mod local;
pub mod ollama;
pub mod openai;

use crate::config::EmbedderConfig;
use crate::error::MnemexError;
use anyhow::Result;
use async_trait::async_trait;

pub use local::LocalEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

/// `embed(text) -> vector of fixed length D`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn dimensions(&self) -> usize;
}

/// Closed set of embedding backends, resolved once from [`EmbedderConfig`].
pub enum Embedder {
    Local(LocalEmbeddingProvider),
    Ollama(OllamaEmbeddingProvider),
    OpenAi(OpenAiEmbeddingProvider),
}

impl Embedder {
    /// Builds the configured backend. Fails with `ConfigError` for an
    /// unknown provider tag or a missing API key the provider requires.
    pub fn from_config(cfg: &EmbedderConfig) -> Result<Self, MnemexError> {
        match cfg.provider.as_str() {
            "local" => Ok(Embedder::Local(LocalEmbeddingProvider::new(
                cfg.dimensions.unwrap_or(384),
            ))),
            "ollama" => Ok(Embedder::Ollama(OllamaEmbeddingProvider::new(
                cfg.url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".to_string()),
                cfg.model.clone().unwrap_or_else(|| "nomic-embed-text".to_string()),
            ))),
            "openai" => {
                let api_key = cfg.api_key.clone().ok_or_else(|| {
                    MnemexError::ConfigError("embedder.apiKey required for provider 'openai'".into())
                })?;
                Ok(Embedder::OpenAi(OpenAiEmbeddingProvider::new(
                    api_key,
                    cfg.model.clone(),
                    cfg.dimensions,
                )))
            }
            other => Err(MnemexError::ConfigError(format!(
                "unknown embedder provider: {other}"
            ))),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for Embedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Embedder::Local(p) => p.embed(text).await,
            Embedder::Ollama(p) => p.embed(text).await,
            Embedder::OpenAi(p) => p.embed(text).await,
        }
    }

    fn dimensions(&self) -> usize {
        match self {
            Embedder::Local(p) => p.dimensions(),
            Embedder::Ollama(p) => p.dimensions(),
            Embedder::OpenAi(p) => p.dimensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_config_error() {
        let cfg = EmbedderConfig {
            provider: "carrier-pigeon".to_string(),
            model: None,
            api_key: None,
            url: None,
            dimensions: None,
        };
        assert!(Embedder::from_config(&cfg).is_err());
    }

    #[test]
    fn openai_without_api_key_is_config_error() {
        let cfg = EmbedderConfig {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            url: None,
            dimensions: None,
        };
        assert!(Embedder::from_config(&cfg).is_err());
    }

    #[test]
    fn local_is_default_backend() {
        let cfg = EmbedderConfig::default();
        let embedder = Embedder::from_config(&cfg).unwrap();
        assert_eq!(embedder.dimensions(), 384);
    }
}
