use super::model::UserSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Concurrency-safe session map keyed by chat identity.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, UserSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing session for this chat, creating an Idle one on
    /// first contact. A new session supersedes nothing; the returned value is
    /// a snapshot that must be written back with `update`.
    pub async fn get_or_create(&self, chat_id: i64) -> UserSession {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(chat_id)
            .or_insert_with(|| {
                debug!("Creating session for chat {}", chat_id);
                UserSession::new(chat_id)
            })
            .clone()
    }

    pub async fn get(&self, chat_id: i64) -> Option<UserSession> {
        self.sessions.read().await.get(&chat_id).cloned()
    }

    pub async fn update(&self, chat_id: i64, session: UserSession) {
        self.sessions.write().await.insert(chat_id, session);
    }

    pub async fn clear(&self, chat_id: i64) {
        self.sessions.write().await.remove(&chat_id);
        debug!("Cleared session for chat {}", chat_id);
    }
}
