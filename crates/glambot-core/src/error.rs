//! GlamBot error taxonomy.
//!
//! Errors raised before a response stream starts become ordinary failed HTTP
//! responses; errors after streaming has begun are converted to in-band
//! protocol events by the gateway, since the status line is already gone.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlamBotError>;

#[derive(Error, Debug)]
pub enum GlamBotError {
    /// Empty or malformed inbound message — rejected before any session mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session hit its hard turn cap. Never resets for the session's lifetime.
    #[error("Message limit reached. Please start a new conversation.")]
    RateLimited,

    /// The embedding endpoint failed or was unreachable.
    #[error("Embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The vector search endpoint failed or was unreachable.
    #[error("Vector search unavailable: {0}")]
    SearchUnavailable(String),

    /// The text-generation backend failed mid-request.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generic HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
