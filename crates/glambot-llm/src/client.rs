//! Streaming chat-completions client.
//!
//! Speaks the OpenAI-compatible `stream: true` wire format: an SSE body of
//! `data: {json}` lines terminated by `data: [DONE]`. Tokens are forwarded
//! over a bounded channel; if the consumer drops the stream, the forwarding
//! task notices the closed channel and abandons the HTTP response, which
//! cancels the generation upstream.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use glambot_core::config::LlmConfig;
use glambot_core::error::{GlamBotError, Result};
use glambot_core::types::Message;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// Tokens as they arrive, or the error that ended the stream early.
pub type TokenStream = ReceiverStream<Result<String>>;

/// Anything that can turn a message list into a token stream. The gateway
/// streams against this seam, so tests can script a generation backend.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream>;
}

/// Incremental parser for an SSE byte stream. Feeding it chunk fragments
/// yields complete `data:` payloads; partial lines stay buffered.
#[derive(Default)]
struct SseParser {
    buffer: String,
}

impl SseParser {
    fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].trim().to_string();
            self.buffer.drain(..=newline);
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim().to_string());
            }
        }
        payloads
    }

    /// Flush a trailing payload that arrived without a final newline.
    fn finish(self) -> Option<String> {
        let line = self.buffer.trim();
        line.strip_prefix("data:").map(|d| d.trim().to_string())
    }
}

fn delta_content(payload: &str) -> Option<String> {
    // Malformed frames are skipped rather than failing the stream.
    let value: Value = serde_json::from_str(payload).ok()?;
    value["choices"][0]["delta"]["content"]
        .as_str()
        .map(str::to_string)
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    referer: String,
    title: String,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            referer: config.referer.clone(),
            title: config.app_title.clone(),
        }
    }

    /// Start a streaming completion and return the token stream.
    ///
    /// Connection and status errors surface here, before any token is
    /// produced; mid-stream failures arrive as an `Err` item on the stream.
    pub async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream> {
        if self.api_key.is_empty() {
            return Err(GlamBotError::Generation("no API key configured".into()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": true,
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
            .map_err(|e| GlamBotError::Generation(format!("connection failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GlamBotError::Generation(format!(
                "chat API returned {status}: {text}"
            )));
        }

        let (tx, rx) = mpsc::channel::<Result<String>>(32);
        let model = self.model.clone();
        tokio::spawn(async move {
            let mut parser = SseParser::default();
            let mut bytes = resp.bytes_stream();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("❌ stream from {model} broke: {e}");
                        let _ = tx.send(Err(GlamBotError::Generation(e.to_string()))).await;
                        return;
                    }
                };
                for payload in parser.push(&String::from_utf8_lossy(&chunk)) {
                    if payload == "[DONE]" {
                        return;
                    }
                    if let Some(content) = delta_content(&payload)
                        && tx.send(Ok(content)).await.is_err()
                    {
                        // Consumer went away; stop pulling from the API.
                        debug!("consumer dropped token stream, cancelling");
                        return;
                    }
                }
            }
            if let Some(payload) = parser.finish()
                && payload != "[DONE]"
                && let Some(content) = delta_content(&payload)
            {
                let _ = tx.send(Ok(content)).await;
            }
        });

        Ok(ReceiverStream::new(rx))
    }
}

#[async_trait]
impl TokenSource for ChatClient {
    async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream> {
        ChatClient::stream_chat(self, messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_handles_split_frames() {
        let mut parser = SseParser::default();
        assert!(parser.push("data: {\"choices\":[{\"delta\":{\"co").is_empty());
        let payloads = parser.push("ntent\":\"Hi\"}}]}\n\n");
        assert_eq!(payloads.len(), 1);
        assert_eq!(delta_content(&payloads[0]).as_deref(), Some("Hi"));
    }

    #[test]
    fn test_parser_yields_frames_in_order() {
        let mut parser = SseParser::default();
        let payloads = parser.push(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n\
             data: [DONE]\n\n",
        );
        assert_eq!(payloads.len(), 3);
        assert_eq!(delta_content(&payloads[0]).as_deref(), Some("a"));
        assert_eq!(delta_content(&payloads[1]).as_deref(), Some("b"));
        assert_eq!(payloads[2], "[DONE]");
    }

    #[test]
    fn test_parser_ignores_non_data_lines() {
        let mut parser = SseParser::default();
        let payloads = parser.push(": keep-alive\n\nevent: ping\n\ndata: [DONE]\n");
        assert_eq!(payloads, vec!["[DONE]".to_string()]);
    }

    #[test]
    fn test_finish_flushes_trailing_payload() {
        let mut parser = SseParser::default();
        assert!(parser.push("data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}").is_empty());
        let trailing = parser.finish().unwrap();
        assert_eq!(delta_content(&trailing).as_deref(), Some("tail"));
    }

    #[test]
    fn test_malformed_json_is_skipped() {
        assert_eq!(delta_content("{not json"), None);
        assert_eq!(delta_content("{\"choices\":[]}"), None);
        // Frames without content (role deltas, finish_reason) produce nothing.
        assert_eq!(
            delta_content("{\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}"),
            None
        );
    }
}
