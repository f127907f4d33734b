//! Turn streaming: from a resolved turn to an ordered event stream.
//!
//! Event order is a contract with the frontend: `session` always first, then
//! zero or more `token` events in generation order, then exactly one `done`,
//! preceded by at most one `error` when the turn failed. Every stream that
//! started is closed by `done` so the client never waits on a dead channel.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use glambot_core::error::Result;
use glambot_core::types::{ChatEvent, Language, Message};
use glambot_llm::TokenSource;
use glambot_session::SessionStore;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

/// Reply sent verbatim when retrieval produced no evidence at all.
pub fn no_evidence_reply(language: Language, phone: &str) -> String {
    match language {
        Language::RomanUrdu => format!(
            "Mujhe yeh specific information nahi hai. Behtar hoga aap hamare number \
             par call karein: {phone}"
        ),
        Language::English => format!(
            "I don't have that specific information. Please call us at {phone} for \
             accurate details."
        ),
    }
}

/// Apology for a failure after streaming has started.
pub fn generation_apology(language: Language) -> String {
    match language {
        Language::RomanUrdu => {
            "Maaf kijiye, kuch technical issue ho gaya hai. Kya aap dobara try kar \
             sakte hain?"
                .to_string()
        }
        Language::English => {
            "Sorry, there was a technical issue. Could you please try again?".to_string()
        }
    }
}

/// What a generation attempt came to.
#[derive(Debug, PartialEq)]
enum Outcome {
    /// Stream ran to completion; payload is the full assistant reply.
    Completed(String),
    /// Stream broke midway; an `error` event was already emitted and a
    /// closing `done` is still owed.
    Failed,
    /// Consumer dropped the event channel; nothing more to emit.
    Cancelled,
}

/// Forward tokens to the event channel, accumulating the full reply.
async fn forward_tokens(
    tx: &mpsc::Sender<ChatEvent>,
    mut tokens: impl Stream<Item = Result<String>> + Unpin,
    language: Language,
) -> Outcome {
    let mut full = String::new();
    while let Some(item) = tokens.next().await {
        match item {
            Ok(token) => {
                full.push_str(&token);
                if tx
                    .send(ChatEvent::Token { content: token })
                    .await
                    .is_err()
                {
                    return Outcome::Cancelled;
                }
            }
            Err(e) => {
                error!("❌ generation stream failed: {e}");
                let _ = tx
                    .send(ChatEvent::Error {
                        message: generation_apology(language),
                    })
                    .await;
                return Outcome::Failed;
            }
        }
    }
    Outcome::Completed(full)
}

/// One fully-resolved turn, ready to stream.
pub struct TurnStream {
    pub session_id: String,
    pub language: Language,
    pub salon_phone: String,
    pub messages: Vec<Message>,
    pub has_evidence: bool,
}

impl TurnStream {
    /// Spawn the streaming task and hand back the event stream.
    ///
    /// The assistant reply (real or fallback) is committed to session
    /// history only after the stream completes and only when non-empty, so
    /// an abandoned or blank turn leaves no half-written assistant message
    /// behind.
    pub fn spawn(
        self,
        sessions: Arc<SessionStore>,
        chat: Arc<dyn TokenSource>,
    ) -> ReceiverStream<ChatEvent> {
        let (tx, rx) = mpsc::channel::<ChatEvent>(32);

        tokio::spawn(async move {
            if tx
                .send(ChatEvent::Session {
                    session_id: self.session_id.clone(),
                })
                .await
                .is_err()
            {
                return;
            }

            if !self.has_evidence {
                let fallback = no_evidence_reply(self.language, &self.salon_phone);
                if tx
                    .send(ChatEvent::Token {
                        content: fallback.clone(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                let _ = tx.send(ChatEvent::Done).await;
                sessions
                    .push_message(&self.session_id, Message::assistant(fallback))
                    .await;
                return;
            }

            let tokens = match chat.stream_chat(&self.messages).await {
                Ok(tokens) => tokens,
                Err(e) => {
                    error!("❌ chat completion failed to start: {e}");
                    let _ = tx
                        .send(ChatEvent::Error {
                            message: generation_apology(self.language),
                        })
                        .await;
                    let _ = tx.send(ChatEvent::Done).await;
                    return;
                }
            };

            match forward_tokens(&tx, tokens, self.language).await {
                Outcome::Completed(full) => {
                    let _ = tx.send(ChatEvent::Done).await;
                    if full.is_empty() {
                        info!("💬 empty reply for {}, nothing committed", self.session_id);
                    } else {
                        info!("💬 completed reply for {} ({} chars)", self.session_id, full.len());
                        sessions
                            .push_message(&self.session_id, Message::assistant(full))
                            .await;
                    }
                }
                Outcome::Failed => {
                    let _ = tx.send(ChatEvent::Done).await;
                }
                Outcome::Cancelled => {}
            }
        });

        ReceiverStream::new(rx)
    }
}

/// Scripted generation backend for gateway tests: replays a fixed token
/// sequence and records the messages it was asked to complete.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    tokens: std::sync::Mutex<Vec<Result<String>>>,
    pub(crate) seen_messages: std::sync::Mutex<Vec<Message>>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(tokens: Vec<Result<String>>) -> Self {
        Self {
            tokens: std::sync::Mutex::new(tokens),
            seen_messages: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl TokenSource for ScriptedSource {
    async fn stream_chat(&self, messages: &[Message]) -> Result<glambot_llm::TokenStream> {
        self.seen_messages.lock().unwrap().extend(messages.iter().cloned());
        let tokens = std::mem::take(&mut *self.tokens.lock().unwrap());
        let (tx, rx) = mpsc::channel(tokens.len().max(1));
        for token in tokens {
            let _ = tx.try_send(token);
        }
        Ok(ReceiverStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use glambot_core::config::SessionConfig;
    use glambot_core::error::GlamBotError;
    use glambot_session::SystemClock;

    fn sessions() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(
            SessionConfig::default(),
            Arc::new(SystemClock),
        ))
    }

    fn turn(session_id: &str, language: Language, has_evidence: bool) -> TurnStream {
        TurnStream {
            session_id: session_id.to_string(),
            language,
            salon_phone: "+92-300-1234567".to_string(),
            messages: vec![Message::user("what is the price of a haircut")],
            has_evidence,
        }
    }

    async fn collect(
        tokens: Vec<Result<String>>,
        language: Language,
    ) -> (Vec<ChatEvent>, Outcome) {
        let (tx, mut rx) = mpsc::channel(32);
        let outcome = forward_tokens(&tx, stream::iter(tokens), language).await;
        drop(tx);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        (events, outcome)
    }

    #[tokio::test]
    async fn test_tokens_forwarded_in_order() {
        let tokens = vec![
            Ok("Hair".to_string()),
            Ok("cut is ".to_string()),
            Ok("PKR 500".to_string()),
        ];
        let (events, outcome) = collect(tokens, Language::English).await;
        assert_eq!(outcome, Outcome::Completed("Haircut is PKR 500".to_string()));
        let contents: Vec<&str> = events
            .iter()
            .map(|e| match e {
                ChatEvent::Token { content } => content.as_str(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(contents, vec!["Hair", "cut is ", "PKR 500"]);
    }

    #[tokio::test]
    async fn test_midstream_failure_emits_localized_error() {
        let tokens = vec![
            Ok("Ji ".to_string()),
            Err(GlamBotError::Generation("connection reset".into())),
        ];
        let (events, outcome) = collect(tokens, Language::RomanUrdu).await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(events.len(), 2);
        match &events[1] {
            ChatEvent::Error { message } => {
                assert!(message.starts_with("Maaf kijiye"));
                assert!(!message.contains("connection reset"));
            }
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropped_consumer_cancels() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let tokens = stream::iter(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let outcome = forward_tokens(&tx, tokens, Language::English).await;
        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn test_priced_reply_streams_in_order_and_commits() {
        let sessions = sessions();
        let id = sessions.begin_turn(None).await.unwrap().id;
        let source = Arc::new(ScriptedSource::new(vec![
            Ok("A men's haircut is ".to_string()),
            Ok("PKR 500".to_string()),
            Ok(".".to_string()),
        ]));

        let events: Vec<ChatEvent> = turn(&id, Language::English, true)
            .spawn(sessions.clone(), source)
            .collect()
            .await;

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], ChatEvent::Session { session_id } if *session_id == id));
        let reply: String = events[1..4]
            .iter()
            .map(|e| match e {
                ChatEvent::Token { content } => content.as_str(),
                other => panic!("expected token, got {other:?}"),
            })
            .collect();
        assert!(reply.contains("500"));
        assert!(matches!(events[4], ChatEvent::Done));

        let history = sessions.history(&id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "A men's haircut is PKR 500.");
    }

    #[tokio::test]
    async fn test_failed_turn_closes_with_error_then_done() {
        let sessions = sessions();
        let id = sessions.begin_turn(None).await.unwrap().id;
        let source = Arc::new(ScriptedSource::new(vec![
            Ok("Ji ".to_string()),
            Err(GlamBotError::Generation("upstream hiccup".into())),
        ]));

        let events: Vec<ChatEvent> = turn(&id, Language::RomanUrdu, true)
            .spawn(sessions.clone(), source)
            .collect()
            .await;

        assert!(matches!(events[0], ChatEvent::Session { .. }));
        assert!(matches!(events[1], ChatEvent::Token { .. }));
        assert!(matches!(events[2], ChatEvent::Error { .. }));
        assert!(matches!(events[3], ChatEvent::Done));
        assert_eq!(events.len(), 4);
        // A broken reply never enters the conversation.
        assert!(sessions.history(&id).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_completion_is_not_committed() {
        let sessions = sessions();
        let id = sessions.begin_turn(None).await.unwrap().id;
        let source = Arc::new(ScriptedSource::new(vec![]));

        let events: Vec<ChatEvent> = turn(&id, Language::English, true)
            .spawn(sessions.clone(), source)
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChatEvent::Session { .. }));
        assert!(matches!(events[1], ChatEvent::Done));
        assert!(sessions.history(&id).await.is_empty());
    }

    #[tokio::test]
    async fn test_no_evidence_turn_streams_fallback_and_commits() {
        let sessions = sessions();
        let id = sessions.begin_turn(None).await.unwrap().id;
        let source = Arc::new(ScriptedSource::new(vec![Ok("never asked".to_string())]));

        let events: Vec<ChatEvent> = turn(&id, Language::RomanUrdu, false)
            .spawn(sessions.clone(), source.clone())
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ChatEvent::Session { session_id } if *session_id == id));
        match &events[1] {
            ChatEvent::Token { content } => {
                assert!(content.contains("nahi hai"));
                assert!(content.contains("+92-300-1234567"));
            }
            other => panic!("expected token, got {other:?}"),
        }
        assert!(matches!(events[2], ChatEvent::Done));
        // The generator is bypassed; the fallback becomes the conversation.
        assert!(source.seen_messages.lock().unwrap().is_empty());
        let history = sessions.history(&id).await;
        assert_eq!(history.len(), 1);
        assert!(history[0].content.contains("call karein"));
    }

    #[test]
    fn test_fallback_reply_is_localized() {
        let en = no_evidence_reply(Language::English, "+92-300-1234567");
        assert!(en.starts_with("I don't have"));
        let ur = no_evidence_reply(Language::RomanUrdu, "+92-300-1234567");
        assert!(ur.starts_with("Mujhe yeh"));
    }
}
