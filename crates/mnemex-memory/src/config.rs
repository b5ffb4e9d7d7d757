//! Typed configuration surface for the memory store.
//!
//! Loadable from TOML or built programmatically. `auto_remember` and
//! `auto_consolidate` each accept either a bare boolean (toggling the
//! subsystem while keeping every other default) or the full struct form, via
//! a hand-rolled `Deserialize` over an untagged bool-or-struct enum.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

/// `embedder.{provider,model,apiKey,url}`, selecting the embedding backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    #[serde(default = "default_embedder_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dimensions: Option<usize>,
}

fn default_embedder_provider() -> String {
    "local".to_string()
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: default_embedder_provider(),
            model: Some("MiniLM".to_string()),
            api_key: None,
            url: None,
            dimensions: None,
        }
    }
}

/// `llm.{provider,model,apiKey,url,maxTokens}`, selecting the summarizer.
/// Absent entirely (`MnemexConfig::llm == None`) disables summarization only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "maxTokens")]
    pub max_tokens: Option<u32>,
}

/// `autoRemember.{heuristic,minImportance,defaultTags}`, controlling classifier behavior.
#[derive(Debug, Clone, Serialize)]
pub struct AutoRememberConfig {
    pub enabled: bool,
    pub heuristic: bool,
    pub min_importance: f32,
    pub default_tags: Vec<String>,
}

impl Default for AutoRememberConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heuristic: true,
            min_importance: 0.3,
            default_tags: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrAutoRemember {
    Bool(bool),
    Struct {
        #[serde(default = "default_true")]
        heuristic: bool,
        #[serde(default, rename = "minImportance")]
        min_importance: Option<f32>,
        #[serde(default, rename = "defaultTags")]
        default_tags: Option<Vec<String>>,
    },
}

impl<'de> Deserialize<'de> for AutoRememberConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BoolOrAutoRemember::deserialize(deserializer)?;
        let defaults = AutoRememberConfig::default();
        Ok(match raw {
            BoolOrAutoRemember::Bool(enabled) => AutoRememberConfig { enabled, ..defaults },
            BoolOrAutoRemember::Struct {
                heuristic,
                min_importance,
                default_tags,
            } => AutoRememberConfig {
                enabled: true,
                heuristic,
                min_importance: min_importance.unwrap_or(defaults.min_importance),
                default_tags: default_tags.unwrap_or(defaults.default_tags),
            },
        })
    }
}

/// `autoConsolidate.{everyNWrites,intervalMs,minClusterSize,clusterThreshold,
/// hotDays,warmDays,coldDays}`, controlling curation cadence and thresholds.
#[derive(Debug, Clone, Serialize)]
pub struct AutoConsolidateConfig {
    pub enabled: bool,
    pub every_n_writes: u64,
    pub interval_ms: u64,
    pub min_cluster_size: usize,
    pub cluster_threshold: f32,
    pub hot_days: f64,
    pub warm_days: f64,
    pub cold_days: f64,
}

impl Default for AutoConsolidateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            every_n_writes: 100,
            interval_ms: 6 * 60 * 60 * 1000,
            min_cluster_size: 3,
            cluster_threshold: 0.78,
            hot_days: 7.0,
            warm_days: 30.0,
            cold_days: 365.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrAutoConsolidate {
    Bool(bool),
    Struct {
        #[serde(default, rename = "everyNWrites")]
        every_n_writes: Option<u64>,
        #[serde(default, rename = "intervalMs")]
        interval_ms: Option<u64>,
        #[serde(default, rename = "minClusterSize")]
        min_cluster_size: Option<usize>,
        #[serde(default, rename = "clusterThreshold")]
        cluster_threshold: Option<f32>,
        #[serde(default, rename = "hotDays")]
        hot_days: Option<f64>,
        #[serde(default, rename = "warmDays")]
        warm_days: Option<f64>,
        #[serde(default, rename = "coldDays")]
        cold_days: Option<f64>,
    },
}

impl<'de> Deserialize<'de> for AutoConsolidateConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BoolOrAutoConsolidate::deserialize(deserializer)?;
        let d = AutoConsolidateConfig::default();
        Ok(match raw {
            BoolOrAutoConsolidate::Bool(enabled) => AutoConsolidateConfig { enabled, ..d },
            BoolOrAutoConsolidate::Struct {
                every_n_writes,
                interval_ms,
                min_cluster_size,
                cluster_threshold,
                hot_days,
                warm_days,
                cold_days,
            } => AutoConsolidateConfig {
                enabled: true,
                every_n_writes: every_n_writes.unwrap_or(d.every_n_writes),
                interval_ms: interval_ms.unwrap_or(d.interval_ms),
                min_cluster_size: min_cluster_size.unwrap_or(d.min_cluster_size),
                cluster_threshold: cluster_threshold.unwrap_or(d.cluster_threshold),
                hot_days: hot_days.unwrap_or(d.hot_days),
                warm_days: warm_days.unwrap_or(d.warm_days),
                cold_days: cold_days.unwrap_or(d.cold_days),
            },
        })
    }
}

/// The full configuration surface accepted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemexConfig {
    pub file: PathBuf,
    #[serde(default)]
    pub embedder: EmbedderConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default, rename = "autoRemember")]
    pub auto_remember: AutoRememberConfig,
    #[serde(default, rename = "autoConsolidate")]
    pub auto_consolidate: AutoConsolidateConfig,
    #[serde(default = "default_deduplicate_threshold", rename = "deduplicateThreshold")]
    pub deduplicate_threshold: f32,
    #[serde(default = "default_max_memories", rename = "maxMemories")]
    pub max_memories: usize,
    #[serde(default)]
    pub debug: bool,
}

fn default_deduplicate_threshold() -> f32 {
    0.92
}

fn default_max_memories() -> usize {
    10_000
}

impl MnemexConfig {
    /// Builds a config with every default except the required store path.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            embedder: EmbedderConfig::default(),
            llm: None,
            auto_remember: AutoRememberConfig::default(),
            auto_consolidate: AutoConsolidateConfig::default(),
            deduplicate_threshold: default_deduplicate_threshold(),
            max_memories: default_max_memories(),
            debug: false,
        }
    }

    /// Parses a TOML document into a config.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_in_defaults() {
        let cfg = MnemexConfig::from_toml(r#"file = "/tmp/x.json""#).unwrap();
        assert_eq!(cfg.embedder.provider, "local");
        assert_eq!(cfg.max_memories, 10_000);
        assert!((cfg.deduplicate_threshold - 0.92).abs() < 1e-6);
        assert!(cfg.auto_remember.enabled);
        assert!(cfg.auto_consolidate.enabled);
    }

    #[test]
    fn auto_remember_accepts_bare_bool() {
        let cfg = MnemexConfig::from_toml(
            r#"
            file = "/tmp/x.json"
            autoRemember = false
            "#,
        )
        .unwrap();
        assert!(!cfg.auto_remember.enabled);
        assert!((cfg.auto_remember.min_importance - 0.3).abs() < 1e-6);
    }

    #[test]
    fn auto_consolidate_accepts_struct_form() {
        let cfg = MnemexConfig::from_toml(
            r#"
            file = "/tmp/x.json"

            [autoConsolidate]
            everyNWrites = 50
            hotDays = 3.0
            "#,
        )
        .unwrap();
        assert!(cfg.auto_consolidate.enabled);
        assert_eq!(cfg.auto_consolidate.every_n_writes, 50);
        assert!((cfg.auto_consolidate.hot_days - 3.0).abs() < 1e-6);
        assert_eq!(cfg.auto_consolidate.warm_days, 30.0);
    }
}
