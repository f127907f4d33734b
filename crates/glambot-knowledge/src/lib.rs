//! Knowledge retrieval for GlamBot.
//!
//! Two interchangeable evidence sources sit behind the [`KnowledgeResolver`]
//! trait: [`VectorResolver`] embeds the expanded query and searches Qdrant,
//! [`StaticResolver`] serves curated salon facts keyed by intent. The
//! gateway picks one at startup from configuration.

pub mod embeddings;
pub mod facts;
pub mod resolver;
pub mod vector;

pub use embeddings::EmbeddingClient;
pub use facts::SalonFacts;
pub use resolver::{Evidence, KnowledgeResolver, StaticResolver, VectorResolver};
pub use vector::QdrantStore;
