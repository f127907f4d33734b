//! Qdrant vector store over its REST API.
//!
//! Qdrant search returns cosine similarity; everything downstream works in
//! distance, so hits are converted with `distance = 1 - similarity` here at
//! the boundary.

use std::collections::HashMap;
use std::time::Duration;

use glambot_core::config::VectorConfig;
use glambot_core::error::{GlamBotError, Result};
use glambot_core::types::RetrievedChunk;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Embedding width of text-embedding-3-small.
pub const VECTOR_SIZE: usize = 1536;

/// A document to ingest: stable id, searchable text, and filter metadata.
#[derive(Debug, Clone)]
pub struct KnowledgeDoc {
    pub id: u64,
    pub content: String,
    pub metadata: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct CollectionInfoResponse {
    result: CollectionInfo,
}

#[derive(Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    points_count: u64,
}

/// Thin client for one Qdrant collection.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    collection: String,
}

impl QdrantStore {
    pub fn new(config: &VectorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            collection: config.collection.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let req = self.client.request(method, url);
        if self.api_key.is_empty() {
            req
        } else {
            req.header("api-key", &self.api_key)
        }
    }

    async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(GlamBotError::SearchUnavailable(format!(
            "{what} failed with {status}: {text}"
        )))
    }

    /// Create the collection if it does not exist yet (cosine, 1536-wide).
    pub async fn ensure_collection(&self) -> Result<()> {
        let info = self
            .request(reqwest::Method::GET, &format!("/collections/{}", self.collection))
            .send()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("connection failed: {e}")))?;

        if info.status().is_success() {
            let parsed: CollectionInfoResponse = info.json().await.map_err(|e| {
                GlamBotError::SearchUnavailable(format!("invalid collection info: {e}"))
            })?;
            info!(
                "✅ connected to existing collection '{}' ({} points)",
                self.collection, parsed.result.points_count
            );
            return Ok(());
        }

        let body = json!({
            "vectors": { "size": VECTOR_SIZE, "distance": "Cosine" }
        });
        let resp = self
            .request(reqwest::Method::PUT, &format!("/collections/{}", self.collection))
            .json(&body)
            .send()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("connection failed: {e}")))?;
        Self::check(resp, "collection create").await?;
        info!("✅ created collection '{}'", self.collection);
        Ok(())
    }

    /// Upsert documents with their precomputed embeddings.
    pub async fn upsert(&self, docs: &[KnowledgeDoc], embeddings: &[Vec<f32>]) -> Result<()> {
        if docs.len() != embeddings.len() {
            return Err(GlamBotError::SearchUnavailable(format!(
                "{} documents but {} embeddings",
                docs.len(),
                embeddings.len()
            )));
        }

        let points: Vec<Value> = docs
            .iter()
            .zip(embeddings)
            .map(|(doc, vector)| {
                let mut payload = doc.metadata.clone();
                payload.insert("content".into(), Value::String(doc.content.clone()));
                json!({ "id": doc.id, "vector": vector, "payload": payload })
            })
            .collect();

        let path = format!("/collections/{}/points?wait=true", self.collection);
        let resp = self
            .request(reqwest::Method::PUT, &path)
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("connection failed: {e}")))?;
        Self::check(resp, "upsert").await?;
        info!("✅ upserted {} documents into '{}'", docs.len(), self.collection);
        Ok(())
    }

    /// Nearest-neighbor search. Returns chunks ordered best-first, with
    /// similarity already converted to distance.
    pub async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let body = json!({
            "vector": embedding,
            "limit": top_k,
            "with_payload": true,
        });

        let path = format!("/collections/{}/points/search", self.collection);
        let resp = self
            .request(reqwest::Method::POST, &path)
            .json(&body)
            .send()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("connection failed: {e}")))?;
        let resp = Self::check(resp, "search").await?;

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("invalid search response: {e}")))?;

        let chunks = parsed
            .result
            .into_iter()
            .map(|point| {
                let mut metadata = point.payload;
                let content = match metadata.remove("content") {
                    Some(Value::String(text)) => text,
                    _ => String::new(),
                };
                RetrievedChunk {
                    content,
                    distance: 1.0 - point.score,
                    metadata,
                }
            })
            .collect::<Vec<_>>();
        debug!("🔎 vector search returned {} hit(s)", chunks.len());
        Ok(chunks)
    }

    /// Number of points currently in the collection.
    pub async fn count(&self) -> Result<u64> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/collections/{}", self.collection))
            .send()
            .await
            .map_err(|e| GlamBotError::SearchUnavailable(format!("connection failed: {e}")))?;
        let resp = Self::check(resp, "collection info").await?;
        let parsed: CollectionInfoResponse = resp.json().await.map_err(|e| {
            GlamBotError::SearchUnavailable(format!("invalid collection info: {e}"))
        })?;
        Ok(parsed.result.points_count)
    }
}
