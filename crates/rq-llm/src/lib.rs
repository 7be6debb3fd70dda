//! Embedding and language-model boundaries for the query agent.

pub mod error;
pub mod hashing;
pub mod openai;
pub mod provider;

use std::sync::Arc;

use rq_core::config::{resolve_api_key, EmbeddingConfig, GenerationConfig};

pub use error::{ProviderError, Result};
pub use hashing::HashingEmbedder;
pub use openai::{OpenAiCompletions, OpenAiEmbeddings};
pub use provider::{EmbeddingProvider, GenerationParams, LanguageModel};

fn api_key(var: &str, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    resolve_api_key(var, env).map_err(|_| ProviderError::MissingCredentials { var: var.to_string() })
}

/// Build the embedding provider named in `config`.
///
/// Credentials are resolved here so a missing key fails at startup rather
/// than on the first query.
pub fn embedder_from_config(
    config: &EmbeddingConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let key = api_key(&config.api_key_env, env)?;
            Ok(Arc::new(OpenAiEmbeddings::new(
                &config.base_url,
                &config.model,
                key,
                config.batch_size,
                config.timeout_secs,
            )?))
        }
        "hashing" => Ok(Arc::new(HashingEmbedder::new(config.dimension)?)),
        other => Err(ProviderError::Configuration(format!(
            "unknown embedding provider {other:?} (expected \"openai\" or \"hashing\")"
        ))),
    }
}

/// Build the completion model described by `config`.
pub fn language_model_from_config(
    config: &GenerationConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Arc<dyn LanguageModel>> {
    let key = api_key(&config.api_key_env, env)?;
    Ok(Arc::new(OpenAiCompletions::new(
        &config.base_url,
        &config.model,
        key,
        config.timeout_secs,
    )?))
}
