//! Embedding client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use glambot_core::config::{EmbeddingConfig, LlmConfig};
use glambot_core::error::{GlamBotError, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// Client for the embeddings endpoint of an OpenAI-compatible API.
pub struct EmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    referer: String,
    title: String,
}

impl EmbeddingClient {
    pub fn new(embedding: &EmbeddingConfig, llm: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(embedding.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: embedding.base_url.trim_end_matches('/').to_string(),
            api_key: embedding.resolve_api_key(),
            model: embedding.model.clone(),
            referer: llm.referer.clone(),
            title: llm.app_title.clone(),
        }
    }

    /// Embed a batch of texts, returned in input order.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.api_key.is_empty() {
            return Err(GlamBotError::EmbeddingUnavailable(
                "no API key configured".into(),
            ));
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": texts,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GlamBotError::EmbeddingUnavailable(format!("connection failed ({url}): {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GlamBotError::EmbeddingUnavailable(format!(
                "embeddings API returned {status}: {text}"
            )));
        }

        let parsed: EmbeddingsResponse = resp.json().await.map_err(|e| {
            GlamBotError::EmbeddingUnavailable(format!("invalid embeddings response: {e}"))
        })?;

        // The API may reorder items; restore input order by index.
        let mut items = parsed.data;
        items.sort_by_key(|item| item.index);
        debug!("🧮 embedded {} text(s) with {}", items.len(), self.model);
        Ok(items.into_iter().map(|item| item.embedding).collect())
    }

    /// Embed a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        if vectors.is_empty() {
            return Err(GlamBotError::EmbeddingUnavailable(
                "embeddings API returned no vectors".into(),
            ));
        }
        Ok(vectors.remove(0))
    }
}
