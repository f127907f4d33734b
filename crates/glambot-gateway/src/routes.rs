//! Request handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::{Stream, StreamExt};
use glambot_core::error::GlamBotError;
use glambot_core::types::{ChatEvent, Language, Message};
use glambot_llm::{PromptInputs, build_messages};
use glambot_query as query;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Client override for the reply language.
    #[serde(default)]
    pub preferred_language: Option<Language>,
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Localized message for a retrieval failure, without leaking internals.
fn retrieval_apology(err: &GlamBotError, language: Language) -> String {
    match (err, language) {
        (GlamBotError::SearchUnavailable(_), Language::RomanUrdu) => {
            "Maaf kijiye, knowledge base access mein issue hai. Kya aap dobara try \
             kar sakte hain?"
                .to_string()
        }
        (GlamBotError::SearchUnavailable(_), Language::English) => {
            "Sorry, there was an issue accessing the knowledge base. Could you \
             please try again?"
                .to_string()
        }
        (_, Language::RomanUrdu) => {
            "Maaf kijiye, technical issue ho gaya hai. Kya aap dobara try kar \
             sakte hain?"
                .to_string()
        }
        (_, Language::English) => {
            "Sorry, there was a technical issue. Could you please try again?".to_string()
        }
    }
}

/// Resolve the reply language for one turn. An explicit client choice wins;
/// otherwise detection, with the session's pinned preference and then the
/// conversation's lean reclaiming an ambiguous (English-defaulted) message.
fn resolve_language(
    preferred: Option<Language>,
    text: &str,
    pinned: Option<Language>,
    history: &[Message],
) -> Language {
    if let Some(language) = preferred {
        return language;
    }
    let detected = query::detect(text);
    if detected != Language::English {
        return detected;
    }
    if let Some(language) = pinned {
        return language;
    }
    if !history.is_empty() && query::from_history(history) == Language::RomanUrdu {
        return Language::RomanUrdu;
    }
    Language::English
}

/// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Response {
    // Validation rejections happen before the session is touched.
    if req.message.trim().is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "Message is required");
    }
    let sanitized = query::sanitize(&req.message);
    if sanitized.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "Message is required");
    }

    let snapshot = match state.sessions.begin_turn(req.session_id.as_deref()).await {
        Ok(snapshot) => snapshot,
        Err(e @ GlamBotError::RateLimited) => {
            warn!("🚦 session hit its turn cap");
            return error_json(StatusCode::TOO_MANY_REQUESTS, e.to_string());
        }
        Err(e) => return error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let language = resolve_language(
        req.preferred_language,
        &sanitized,
        snapshot.pinned_language,
        &snapshot.history,
    );
    state.sessions.pin_language(&snapshot.id, language).await;

    let normalized = query::normalize(&sanitized);
    let intent = query::classify(&normalized, &snapshot.history);
    let expanded = query::expand(&sanitized, &normalized, intent, &snapshot.history);
    info!(
        "💬 turn session={} language={} intent={intent}",
        snapshot.id,
        language.display_name()
    );

    // Evidence failures happen before any SSE bytes, so they can still be
    // proper HTTP errors.
    let evidence = match state.resolver.resolve(&expanded).await {
        Ok(evidence) => evidence,
        Err(e) => {
            warn!("📚 retrieval failed: {e}");
            return error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                retrieval_apology(&e, language),
            );
        }
    };

    state
        .sessions
        .push_message(&snapshot.id, Message::user(sanitized.clone()))
        .await;

    let messages = build_messages(&PromptInputs {
        salon: &state.config.salon,
        query: &sanitized,
        language,
        intent,
        evidence: &evidence,
        history: &snapshot.history,
    });

    let turn = crate::stream::TurnStream {
        session_id: snapshot.id,
        language,
        salon_phone: state.config.salon.phone.clone(),
        messages,
        has_evidence: !evidence.is_empty(),
    };
    let events = turn.spawn(state.sessions.clone(), state.chat.clone());

    sse_response(events).into_response()
}

fn sse_response(
    events: impl Stream<Item = ChatEvent> + Send + 'static,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = events.map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().data(data))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{ScriptedSource, TurnStream};
    use glambot_core::config::GlamBotConfig;
    use glambot_knowledge::{KnowledgeResolver, SalonFacts, StaticResolver};
    use glambot_session::{SessionStore, SystemClock};

    #[test]
    fn test_preferred_language_always_wins() {
        assert_eq!(
            resolve_language(Some(Language::English), "kya price hai", None, &[]),
            Language::English
        );
        assert_eq!(
            resolve_language(Some(Language::RomanUrdu), "what is the price", None, &[]),
            Language::RomanUrdu
        );
    }

    #[test]
    fn test_pinned_language_reclaims_ambiguous_message() {
        // "bridal makeup package" carries no lexical signal and defaults to
        // English; the session's pinned preference decides.
        assert_eq!(
            resolve_language(None, "bridal makeup package", Some(Language::RomanUrdu), &[]),
            Language::RomanUrdu
        );
        assert_eq!(
            resolve_language(None, "bridal makeup package", Some(Language::English), &[]),
            Language::English
        );
        // A clearly Urdu message overrides a pinned English preference.
        assert_eq!(
            resolve_language(None, "kya timings hain", Some(Language::English), &[]),
            Language::RomanUrdu
        );
    }

    #[test]
    fn test_history_lean_applies_when_nothing_pinned() {
        let history = vec![
            Message::user("kya aap ke pass manicure hai"),
            Message::assistant("Ji bilkul!"),
        ];
        assert_eq!(
            resolve_language(None, "bridal makeup package", None, &history),
            Language::RomanUrdu
        );
        assert_eq!(
            resolve_language(None, "bridal makeup package", None, &[]),
            Language::English
        );
    }

    #[tokio::test]
    async fn test_markup_only_message_rejected_before_session_mutation() {
        let state = Arc::new(AppState::from_config(GlamBotConfig::default()));
        let response = chat(
            State(state.clone()),
            Json(ChatRequest {
                message: "<b></b>".to_string(),
                session_id: None,
                preferred_language: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_urdu_followup_carries_prior_turn_context() {
        let config = GlamBotConfig::default();
        let sessions = Arc::new(SessionStore::new(
            config.session.clone(),
            Arc::new(SystemClock),
        ));

        // Turn 1 already happened.
        let id = sessions.begin_turn(None).await.unwrap().id;
        sessions
            .push_message(&id, Message::user("bridal makeup ka price kya hai"))
            .await;
        sessions
            .push_message(&id, Message::assistant("Bridal Makeup ka price PKR 15,000 hai."))
            .await;

        // Turn 2: a short follow-up that only makes sense with history.
        let snapshot = sessions.begin_turn(Some(&id)).await.unwrap();
        let sanitized = query::sanitize("aur iski duration?");
        let language = resolve_language(
            None,
            &sanitized,
            snapshot.pinned_language,
            &snapshot.history,
        );
        assert_eq!(language, Language::RomanUrdu);

        let normalized = query::normalize(&sanitized);
        let intent = query::classify(&normalized, &snapshot.history);
        let expanded = query::expand(&sanitized, &normalized, intent, &snapshot.history);
        assert!(expanded.contains("bridal"));
        assert!(expanded.contains("makeup"));

        let resolver = StaticResolver::new(SalonFacts::new(config.salon.clone()));
        let evidence = resolver.resolve(&expanded).await.unwrap();
        let messages = glambot_llm::build_messages(&glambot_llm::PromptInputs {
            salon: &config.salon,
            query: &sanitized,
            language,
            intent,
            evidence: &evidence,
            history: &snapshot.history,
        });

        let source = Arc::new(ScriptedSource::new(vec![Ok(
            "Bridal Makeup ki duration 4 hours hai.".to_string(),
        )]));
        let turn = TurnStream {
            session_id: id.clone(),
            language,
            salon_phone: config.salon.phone.clone(),
            messages,
            has_evidence: !evidence.is_empty(),
        };
        let events: Vec<ChatEvent> = turn.spawn(sessions.clone(), source.clone()).collect().await;

        assert!(matches!(events.first(), Some(ChatEvent::Session { .. })));
        assert!(matches!(events.last(), Some(ChatEvent::Done)));

        // The prompt handed to generation carries the first turn verbatim.
        let seen = source.seen_messages.lock().unwrap();
        assert!(seen[0].content.contains("bridal makeup ka price kya hai"));
        assert!(seen[0].content.contains("PKR 15,000"));
        assert!(seen.iter().any(|m| m.content.contains("Roman Urdu")));

        let history = sessions.history(&id).await;
        assert_eq!(history.len(), 3);
        assert!(history[2].content.contains("duration"));
    }

    #[test]
    fn test_chat_request_accepts_frontend_shape() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"kya price hai","sessionId":"session_1_abc","preferredLanguage":"ur"}"#,
        )
        .unwrap();
        assert_eq!(req.message, "kya price hai");
        assert_eq!(req.session_id.as_deref(), Some("session_1_abc"));
        assert_eq!(req.preferred_language, Some(Language::RomanUrdu));

        let bare: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(bare.session_id.is_none());
        assert!(bare.preferred_language.is_none());
    }

    #[test]
    fn test_retrieval_apology_matches_failure_and_language() {
        let search = GlamBotError::SearchUnavailable("qdrant down".into());
        let embed = GlamBotError::EmbeddingUnavailable("429".into());

        let msg = retrieval_apology(&search, Language::RomanUrdu);
        assert!(msg.contains("knowledge base access"));
        assert!(!msg.contains("qdrant"));

        let msg = retrieval_apology(&embed, Language::English);
        assert!(msg.starts_with("Sorry, there was a technical issue"));
        assert!(!msg.contains("429"));
    }
}
