//! OpenAI-compatible HTTP providers (`/embeddings` and `/completions`).
//!
//! Works against api.openai.com and any server exposing the same routes
//! (LM Studio, llama.cpp server, vLLM).

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::provider::{expect_batch_len, EmbeddingProvider, GenerationParams, LanguageModel};

fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Configuration(e.to_string()))
}

async fn post_json(client: &Client, url: &str, api_key: &str, body: &Value) -> Result<Value> {
    let res = client.post(url).bearer_auth(api_key).json(body).send().await?;
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status: status.as_u16(), body });
    }
    Ok(res.json().await?)
}

pub struct OpenAiEmbeddings {
    base_url: String,
    model: String,
    api_key: String,
    batch_size: usize,
    client: Client,
    observed_dimension: OnceLock<usize>,
}

impl OpenAiEmbeddings {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        batch_size: usize,
        timeout_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            batch_size: batch_size.max(1),
            client: http_client(timeout_secs)?,
            observed_dimension: OnceLock::new(),
        })
    }

    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": inputs,
        });
        let payload = post_json(&self.client, &url, &self.api_key, &body).await?;
        let vectors = parse_embeddings(&payload)?;
        expect_batch_len(&vectors, inputs.len())?;
        self.check_dimension(&vectors)?;
        Ok(vectors)
    }

    /// The first response fixes the dimension for the provider's lifetime.
    fn check_dimension(&self, vectors: &[Vec<f32>]) -> Result<()> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };
        let expected = *self.observed_dimension.get_or_init(|| first.len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(ProviderError::MalformedResponse(format!(
                "embedding dimension changed from {expected} to {}",
                bad.len()
            )));
        }
        Ok(())
    }
}

/// Pull vectors out of an `/embeddings` response, ordered by their `index`.
pub fn parse_embeddings(payload: &Value) -> Result<Vec<Vec<f32>>> {
    let data = payload["data"]
        .as_array()
        .ok_or_else(|| ProviderError::MalformedResponse("missing `data` array".into()))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (pos, item) in data.iter().enumerate() {
        let index = item["index"].as_u64().map(|i| i as usize).unwrap_or(pos);
        let values = item["embedding"].as_array().ok_or_else(|| {
            ProviderError::MalformedResponse(format!("item {pos} has no `embedding` array"))
        })?;
        let vector = values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| {
                ProviderError::MalformedResponse(format!("item {pos} has a non-numeric component"))
            })?;
        indexed.push((index, vector));
    }
    indexed.sort_by_key(|(index, _)| *index);
    // Each input position must appear exactly once.
    if let Some((pos, (index, _))) = indexed
        .iter()
        .enumerate()
        .find(|(pos, (index, _))| pos != index)
    {
        return Err(ProviderError::MalformedResponse(format!(
            "embedding indices are not 0..{}: found {index} at position {pos}",
            indexed.len()
        )));
    }
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> Option<usize> {
        self.observed_dimension.get().copied()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ProviderError::MalformedResponse("empty embedding response".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            debug!(inputs = chunk.len(), model = %self.model, "embedding batch");
            out.extend(self.request(chunk).await?);
        }
        Ok(out)
    }
}

pub struct OpenAiCompletions {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompletions {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: http_client(timeout_secs)?,
        })
    }
}

/// Text of the first choice in a `/completions` response, verbatim.
pub fn parse_completion(payload: &Value) -> Result<String> {
    payload["choices"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MalformedResponse("missing `choices[0].text`".into()))
}

#[async_trait]
impl LanguageModel for OpenAiCompletions {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = format!("{}/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });
        let payload = post_json(&self.client, &url, &self.api_key, &body).await?;
        parse_completion(&payload)
    }
}
