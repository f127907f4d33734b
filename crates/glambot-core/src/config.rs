//! GlamBot configuration system.
//!
//! TOML file with per-field defaults; API keys and endpoints can also come
//! from environment variables so secrets stay out of the config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlamBotConfig {
    #[serde(default)]
    pub salon: SalonConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl GlamBotConfig {
    /// Load config from the default path (~/.glambot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::GlamBotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::GlamBotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::GlamBotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".glambot")
            .join("config.toml")
    }
}

/// Salon identity — parameterizes the persona and every fallback phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalonConfig {
    #[serde(default = "default_salon_name")]
    pub name: String,
    #[serde(default = "default_salon_location")]
    pub location: String,
    #[serde(default = "default_salon_phone")]
    pub phone: String,
}

fn default_salon_name() -> String { "Glam Beauty Salon".into() }
fn default_salon_location() -> String { "Karachi".into() }
fn default_salon_phone() -> String { "+92-300-1234567".into() }

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            name: default_salon_name(),
            location: default_salon_location(),
            phone: default_salon_phone(),
        }
    }
}

/// Text-generation backend (any OpenAI-compatible chat-completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Sent as `HTTP-Referer`; OpenRouter uses it for app attribution.
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Sent as `X-Title`.
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

fn default_llm_base_url() -> String { "https://openrouter.ai/api/v1".into() }
fn default_llm_model() -> String { "openai/gpt-3.5-turbo".into() }
fn default_temperature() -> f32 { 0.4 }
fn default_max_tokens() -> u32 { 300 }
fn default_request_timeout() -> u64 { 60 }
fn default_referer() -> String { "http://localhost:3001".into() }
fn default_app_title() -> String { "Salon RAG Bot".into() }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: config value first, then `OPENROUTER_API_KEY`.
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENROUTER_API_KEY").unwrap_or_default()
    }
}

/// Embedding backend (OpenAI-compatible `/embeddings` endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_embedding_model() -> String { "openai/text-embedding-3-small".into() }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_embedding_model(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl EmbeddingConfig {
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENROUTER_API_KEY").unwrap_or_default()
    }
}

/// Vector database (Qdrant REST API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    #[serde(default = "default_vector_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_context_chunks")]
    pub max_context_chunks: usize,
    /// Accept chunks with distance below this. Deliberately lenient: a chunk
    /// only has to beat similarity 0.05 to make the first cut.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_vector_url() -> String { "http://localhost:6333".into() }
fn default_collection() -> String { "salon_knowledge_base".into() }
fn default_top_k() -> usize { 10 }
fn default_max_context_chunks() -> usize { 5 }
fn default_distance_threshold() -> f32 { 0.95 }

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            url: default_vector_url(),
            api_key: String::new(),
            collection: default_collection(),
            top_k: default_top_k(),
            max_context_chunks: default_max_context_chunks(),
            distance_threshold: default_distance_threshold(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl VectorConfig {
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("QDRANT_API_KEY").unwrap_or_default()
    }
}

/// Session limits and eviction cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard per-session turn cap. Once exceeded, the session is done for good.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    /// Sliding-window cap on retained history entries.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_turns() -> u32 { 20 }
fn default_max_history() -> usize { 20 }
fn default_ttl_secs() -> u64 { 30 * 60 }
fn default_sweep_interval() -> u64 { 30 * 60 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_history: default_max_history(),
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Gateway listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 3001 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { port: default_port(), host: default_host() }
    }
}

/// Which knowledge resolver is active. Exactly one strategy runs at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// `static` renders the whole in-memory fact set; `vector` embeds the
    /// query and searches the vector database.
    #[serde(default = "default_retrieval_mode")]
    pub mode: RetrievalMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    Static,
    Vector,
}

fn default_retrieval_mode() -> RetrievalMode { RetrievalMode::Static }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { mode: default_retrieval_mode() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlamBotConfig::default();
        assert_eq!(config.salon.name, "Glam Beauty Salon");
        assert_eq!(config.session.max_turns, 20);
        assert_eq!(config.session.ttl_secs, 1800);
        assert_eq!(config.retrieval.mode, RetrievalMode::Static);
        assert!((config.llm.temperature - 0.4).abs() < 0.01);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [salon]
            name = "Test Salon"
            phone = "+92-999-0000000"

            [retrieval]
            mode = "vector"

            [vector]
            url = "https://qdrant.example.com"
            top_k = 8
        "#;

        let config: GlamBotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.salon.name, "Test Salon");
        assert_eq!(config.salon.phone, "+92-999-0000000");
        assert_eq!(config.retrieval.mode, RetrievalMode::Vector);
        assert_eq!(config.vector.top_k, 8);
        // Untouched sections fall back to defaults
        assert_eq!(config.gateway.port, 3001);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: GlamBotConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.model, "openai/gpt-3.5-turbo");
        assert_eq!(config.vector.collection, "salon_knowledge_base");
        assert_eq!(config.session.max_history, 20);
    }
}
