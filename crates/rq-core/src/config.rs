//! Runtime configuration.
//!
//! Layered as: built-in defaults, then an optional JSON file named by
//! `RQ_CONFIG`, then individual `RQ_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CoreError, Result};

pub const CONFIG_PATH_ENV: &str = "RQ_CONFIG";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"openai"` or `"hashing"`.
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    /// Output size of the hashing embedder. Remote providers report their own.
    pub dimension: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("scraped_data.json") }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "text-embedding-3-small".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            dimension: 384,
            batch_size: 256,
            timeout_secs: 60,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-instruct".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            temperature: 0.0,
            max_tokens: 256,
            timeout_secs: 60,
        }
    }
}

impl RagConfig {
    /// Defaults, then the file named by `RQ_CONFIG` (if set), then env overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`RagConfig::load`] with an injectable environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match env(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            CoreError::config(format!("malformed config file {}: {e}", path.display()))
        })
    }

    pub fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = env("RQ_CORPUS") {
            self.corpus.path = PathBuf::from(v);
        }
        if let Some(v) = env("RQ_TOP_K") {
            self.retrieval.top_k = parse_var("RQ_TOP_K", &v)?;
        }
        if let Some(v) = env("RQ_EMBEDDING_PROVIDER") {
            self.embedding.provider = v;
        }
        if let Some(v) = env("RQ_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = env("RQ_GENERATION_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = env("RQ_TEMPERATURE") {
            self.generation.temperature = parse_var("RQ_TEMPERATURE", &v)?;
        }
        if let Some(v) = env("RQ_MAX_TOKENS") {
            self.generation.max_tokens = parse_var("RQ_MAX_TOKENS", &v)?;
        }
        if let Some(v) = env("RQ_BASE_URL") {
            self.embedding.base_url = v.clone();
            self.generation.base_url = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(CoreError::config("retrieval.top_k must be at least 1"));
        }
        let t = self.generation.temperature;
        if !t.is_finite() || t < 0.0 {
            return Err(CoreError::config(format!("generation.temperature must be >= 0, got {t}")));
        }
        if self.generation.max_tokens == 0 {
            return Err(CoreError::config("generation.max_tokens must be at least 1"));
        }
        if self.embedding.provider == "hashing" && self.embedding.dimension == 0 {
            return Err(CoreError::config("embedding.dimension must be at least 1"));
        }
        if self.embedding.batch_size == 0 {
            return Err(CoreError::config("embedding.batch_size must be at least 1"));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(CoreError::config("embedding.timeout_secs must be at least 1"));
        }
        if self.generation.timeout_secs == 0 {
            return Err(CoreError::config("generation.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Look up a provider credential. Missing or blank values are configuration errors.
pub fn resolve_api_key(var: &str, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    match env(var) {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(CoreError::config(format!("environment variable {var} is not set"))),
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| CoreError::config(format!("invalid value for {name} ({raw:?}): {e}")))
}
