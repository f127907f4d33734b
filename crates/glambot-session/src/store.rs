//! The session map and its lifecycle rules.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glambot_core::config::SessionConfig;
use glambot_core::error::{GlamBotError, Result};
use glambot_core::types::{Language, Message};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::Clock;

#[derive(Debug, Default)]
struct Session {
    history: Vec<Message>,
    message_count: u32,
    pinned_language: Option<Language>,
    last_activity_millis: u64,
}

/// Read-only view of a session at the start of a turn.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: String,
    pub history: Vec<Message>,
    pub pinned_language: Option<Language>,
}

/// All live conversations, keyed by session id.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            config,
        }
    }

    fn generate_id(&self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(9)
            .map(|c| (c as char).to_ascii_lowercase())
            .collect();
        format!("session_{}_{suffix}", self.clock.now_millis())
    }

    /// Start a turn: create or touch the session, enforce the turn cap, and
    /// return a snapshot of the conversation so far.
    ///
    /// The cap is permanent for the session; once hit, every further turn
    /// fails until the client starts a new conversation.
    pub async fn begin_turn(&self, session_id: Option<&str>) -> Result<SessionSnapshot> {
        let mut sessions = self.sessions.lock().await;

        let id = match session_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.generate_id(),
        };

        let session = sessions.entry(id.clone()).or_default();

        // A rejected turn leaves the session untouched, so a capped session
        // still ages out on schedule.
        if session.message_count >= self.config.max_turns {
            return Err(GlamBotError::RateLimited);
        }
        session.message_count += 1;
        session.last_activity_millis = self.clock.now_millis();

        Ok(SessionSnapshot {
            id,
            history: session.history.clone(),
            pinned_language: session.pinned_language,
        })
    }

    /// Pin the reply language for future ambiguous turns.
    pub async fn pin_language(&self, session_id: &str, language: Language) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.pinned_language = Some(language);
        }
    }

    /// Append one message, trimming history to the configured window.
    pub async fn push_message(&self, session_id: &str, message: Message) {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return;
        };
        session.history.push(message);
        if session.history.len() > self.config.max_history {
            let excess = session.history.len() - self.config.max_history;
            session.history.drain(..excess);
        }
        session.last_activity_millis = self.clock.now_millis();
    }

    pub async fn history(&self, session_id: &str) -> Vec<Message> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    /// Drop sessions idle longer than the TTL. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let ttl_millis = self.config.ttl_secs * 1000;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_sub(s.last_activity_millis) <= ttl_millis);
        let removed = before - sessions.len();
        if removed > 0 {
            info!("🧹 swept {removed} expired session(s), {} live", sessions.len());
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Spawn the periodic expiry sweeper.
    pub fn spawn_sweeper(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval = Duration::from_secs(self.config.sweep_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.sweep().await;
                debug!("🧹 sweeper tick, removed {removed}");
            }
        })
    }
}
