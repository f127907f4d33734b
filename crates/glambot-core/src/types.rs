//! Shared wire and domain types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chat role, OpenAI-compatible on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversational message. Immutable once created; sessions hold an
/// append-only ordered sequence of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }
}

/// The two languages the bot understands and answers in.
///
/// Serialized as the short codes the frontend sends (`en` / `ur`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ur")]
    RomanUrdu,
}

impl Language {
    /// Human-readable name used in prompt directives.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::RomanUrdu => "Roman Urdu",
        }
    }
}

/// A retrieved unit of evidence text.
///
/// `distance` is `1 - cosine similarity`; lower means more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub distance: f32,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>, distance: f32) -> Self {
        Self { content: content.into(), distance, metadata: HashMap::new() }
    }

    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// One event on the streamed response. Matches the JSON the web client
/// expects: `{"type":"session","sessionId":...}`, `{"type":"token",...}` etc.
///
/// Ordering invariant: `Session` always first, then tokens in order, then
/// exactly one `Done`, preceded by at most one `Error` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    Session {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Token {
        content: String,
    },
    Error {
        message: String,
    },
    Done,
}
