//! In-process conversation session tracking.
//!
//! Sessions hold the recent question/answer exchanges for one caller so
//! follow-up queries can carry context. Nothing is persisted; history
//! depth is bounded by `max_history`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// One question/answer exchange.
#[derive(Debug, Clone)]
struct Exchange {
    user: String,
    assistant: String,
}

#[derive(Debug)]
struct SessionState {
    exchanges: Vec<Exchange>,
    created_at: DateTime<Utc>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            exchanges: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Tracks conversation history per session id.
pub struct SessionManager {
    sessions: Mutex<HashMap<Uuid, SessionState>>,
    max_history: usize,
}

impl SessionManager {
    /// Create a manager keeping at most `max_history` exchanges per
    /// session.
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Create a new empty session and return its id.
    pub fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .lock()
            .unwrap()
            .insert(id, SessionState::new());
        id
    }

    /// Formatted history for a session, or `None` when there is none.
    ///
    /// The driver treats this string as opaque context.
    pub fn get_history(&self, session_id: Uuid) -> Option<String> {
        let sessions = self.sessions.lock().unwrap();
        let state = sessions.get(&session_id)?;
        if state.exchanges.is_empty() {
            return None;
        }

        let formatted: Vec<String> = state
            .exchanges
            .iter()
            .map(|e| format!("User: {}\nAssistant: {}", e.user, e.assistant))
            .collect();
        Some(formatted.join("\n"))
    }

    /// Record a completed exchange, trimming to the history bound. An
    /// unknown id starts a fresh session under that id.
    pub fn add_exchange(&self, session_id: Uuid, user: &str, assistant: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let state = sessions
            .entry(session_id)
            .or_insert_with(SessionState::new);

        state.exchanges.push(Exchange {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });

        if state.exchanges.len() > self.max_history {
            let excess = state.exchanges.len() - self.max_history;
            state.exchanges.drain(..excess);
        }
    }

    /// Drop a session's history entirely.
    pub fn clear_session(&self, session_id: Uuid) {
        self.sessions.lock().unwrap().remove(&session_id);
    }

    /// When the session was started, if it exists.
    pub fn created_at(&self, session_id: Uuid) -> Option<DateTime<Utc>> {
        self.sessions
            .lock()
            .unwrap()
            .get(&session_id)
            .map(|s| s.created_at)
    }
}
