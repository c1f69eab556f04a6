use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use hearth_common::ChatMessage;

const MAX_SESSIONS: usize = 500;
const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
const MAX_MESSAGES_PER_SESSION: usize = 100;

struct SessionEntry {
    messages: Vec<ChatMessage>,
    last_active: Instant,
}

/// In-memory conversation store. Nothing survives a restart.
pub struct SessionStore {
    entries: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Append a message to a session, creating the session on first use.
    ///
    /// When the store is full, sessions idle for over an hour are evicted
    /// before the new one is admitted. Each session keeps only its most
    /// recent messages.
    pub async fn append(&self, session_id: Uuid, message: ChatMessage) {
        let mut entries = self.entries.write().await;

        if entries.len() >= MAX_SESSIONS && !entries.contains_key(&session_id) {
            let now = Instant::now();
            entries.retain(|_, entry| now.duration_since(entry.last_active) < SESSION_IDLE_TTL);
        }

        let entry = entries.entry(session_id).or_insert_with(|| SessionEntry {
            messages: Vec::new(),
            last_active: Instant::now(),
        });
        entry.messages.push(message);
        if entry.messages.len() > MAX_MESSAGES_PER_SESSION {
            let excess = entry.messages.len() - MAX_MESSAGES_PER_SESSION;
            entry.messages.drain(..excess);
        }
        entry.last_active = Instant::now();
    }

    /// Messages for a session in insertion order, or `None` if it does not exist.
    pub async fn history(&self, session_id: Uuid) -> Option<Vec<ChatMessage>> {
        let entries = self.entries.read().await;
        entries.get(&session_id).map(|entry| entry.messages.clone())
    }

    /// Drop a session. Clearing an unknown session is a no-op.
    pub async fn clear(&self, session_id: Uuid) {
        self.entries.write().await.remove(&session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_creates_session_and_keeps_order() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        store.append(id, ChatMessage::user("looking for a flat")).await;
        store
            .append(id, ChatMessage::assistant("here are some options"))
            .await;

        let history = store.history(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "looking for a flat");
        assert_eq!(history[1].content, "here are some options");
    }

    #[tokio::test]
    async fn history_of_unknown_session_is_none() {
        let store = SessionStore::new();
        assert!(store.history(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_session() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        store.append(id, ChatMessage::user("hello")).await;
        store.clear(id).await;
        assert!(store.history(id).await.is_none());
    }

    #[tokio::test]
    async fn clearing_unknown_session_is_a_noop() {
        let store = SessionStore::new();
        store.clear(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn long_sessions_keep_only_recent_messages() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        for i in 0..150 {
            store.append(id, ChatMessage::user(format!("message {i}"))).await;
        }

        let history = store.history(id).await.unwrap();
        assert_eq!(history.len(), MAX_MESSAGES_PER_SESSION);
        assert_eq!(history[0].content, "message 50");
        assert_eq!(history[99].content, "message 149");
    }
}
