//! Evidence resolution behind a single trait.
//!
//! The chat pipeline asks one question: "what do we know that is relevant to
//! this query?" The answer is an [`Evidence`] set, whether it came from a
//! vector search or from the curated facts.

use async_trait::async_trait;
use glambot_core::error::Result;
use glambot_core::types::RetrievedChunk;
use serde_json::Value;
use tracing::{debug, info};

/// Retrieval outcome. An empty set is a normal, structured result: the
/// caller decides what "we found nothing" means for the user.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub chunks: Vec<RetrievedChunk>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Mean similarity across chunks, 0 when empty.
    pub fn avg_similarity(&self) -> f32 {
        if self.chunks.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.chunks.iter().map(|c| c.similarity()).sum();
        sum / self.chunks.len() as f32
    }
}

#[async_trait]
pub trait KnowledgeResolver: Send + Sync {
    /// Resolve evidence for an expanded retrieval query.
    async fn resolve(&self, expanded_query: &str) -> Result<Evidence>;
}

/// Embeds the query and searches Qdrant.
pub struct VectorResolver {
    embedder: crate::EmbeddingClient,
    store: crate::QdrantStore,
    top_k: usize,
    max_chunks: usize,
    distance_threshold: f32,
}

impl VectorResolver {
    pub fn new(
        embedder: crate::EmbeddingClient,
        store: crate::QdrantStore,
        top_k: usize,
        max_chunks: usize,
        distance_threshold: f32,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k,
            max_chunks,
            distance_threshold,
        }
    }

    /// Keep candidates under the distance threshold; if that empties a
    /// non-empty candidate set, fall back to the raw top hits rather than
    /// answering with nothing.
    fn select(&self, hits: Vec<RetrievedChunk>) -> Vec<RetrievedChunk> {
        if hits.is_empty() {
            return hits;
        }
        let filtered: Vec<RetrievedChunk> = hits
            .iter()
            .filter(|c| c.distance < self.distance_threshold)
            .take(self.max_chunks)
            .cloned()
            .collect();
        if filtered.is_empty() {
            debug!("🧮 threshold dropped all {} candidates, keeping raw top hits", hits.len());
            hits.into_iter().take(self.max_chunks).collect()
        } else {
            filtered
        }
    }
}

#[async_trait]
impl KnowledgeResolver for VectorResolver {
    async fn resolve(&self, expanded_query: &str) -> Result<Evidence> {
        let embedding = self.embedder.embed(expanded_query).await?;
        let hits = self.store.search(&embedding, self.top_k).await?;

        let total = hits.len();
        let evidence = Evidence {
            chunks: self.select(hits),
        };
        info!(
            "📚 search results: {total}, relevant: {}, avg similarity: {:.2}",
            evidence.chunks.len(),
            evidence.avg_similarity()
        );
        Ok(evidence)
    }
}

/// Serves the full curated fact set as one stable-order section list.
/// No search step, no failure mode.
pub struct StaticResolver {
    facts: crate::SalonFacts,
}

impl StaticResolver {
    pub fn new(facts: crate::SalonFacts) -> Self {
        Self { facts }
    }
}

#[async_trait]
impl KnowledgeResolver for StaticResolver {
    async fn resolve(&self, _expanded_query: &str) -> Result<Evidence> {
        let chunks: Vec<RetrievedChunk> = self
            .facts
            .sections()
            .into_iter()
            .map(|(label, content)| {
                let mut metadata = std::collections::HashMap::new();
                metadata.insert("section".to_string(), Value::String(label.to_string()));
                RetrievedChunk {
                    content,
                    distance: 0.0,
                    metadata,
                }
            })
            .collect();
        debug!("📚 static evidence: {} section(s)", chunks.len());
        Ok(Evidence { chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glambot_core::config::SalonConfig;

    fn resolver() -> StaticResolver {
        StaticResolver::new(crate::SalonFacts::new(SalonConfig::default()))
    }

    #[tokio::test]
    async fn test_static_evidence_contains_haircut_price() {
        let evidence = resolver().resolve("haircut price").await.unwrap();
        assert!(!evidence.is_empty());
        let joined = evidence
            .chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(joined.contains("Haircut (Men)"));
        assert!(joined.contains("PKR 500"));
    }

    #[tokio::test]
    async fn test_static_evidence_covers_all_sections() {
        let facts = crate::SalonFacts::new(SalonConfig::default());
        let expected = facts.sections().len();
        let evidence = resolver().resolve("anything").await.unwrap();
        assert_eq!(evidence.chunks.len(), expected);
        // Stable order: same query twice, same section sequence.
        let again = resolver().resolve("anything else").await.unwrap();
        let labels = |e: &Evidence| {
            e.chunks
                .iter()
                .map(|c| c.metadata["section"].clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(&evidence), labels(&again));
    }

    #[tokio::test]
    async fn test_static_chunks_carry_zero_distance() {
        let evidence = resolver().resolve("kab open").await.unwrap();
        assert!(evidence.chunks.iter().all(|c| c.distance == 0.0));
        assert!((evidence.avg_similarity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_evidence_similarity_is_zero() {
        assert_eq!(Evidence::default().avg_similarity(), 0.0);
    }

    #[test]
    fn test_threshold_relaxes_to_raw_hits() {
        let embedder = crate::EmbeddingClient::new(
            &glambot_core::config::EmbeddingConfig::default(),
            &glambot_core::config::LlmConfig::default(),
        );
        let store = crate::QdrantStore::new(&glambot_core::config::VectorConfig::default());
        let resolver = VectorResolver::new(embedder, store, 10, 5, 0.5);

        let far = |d: f32| RetrievedChunk::new(format!("chunk at {d}"), d);
        let selected = resolver.select(vec![far(0.8), far(0.9)]);
        assert_eq!(selected.len(), 2, "raw hits survive when the filter empties the set");

        let mixed = resolver.select(vec![far(0.2), far(0.8)]);
        assert_eq!(mixed.len(), 1);
        assert!(mixed[0].distance < 0.5);
    }
}
