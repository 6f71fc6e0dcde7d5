//! Session store
//!
//! In-memory registry of the active conversation per user. Nothing is
//! persisted; a restart forgets every session.

use crate::bot::callback::ActiveCommand;
use crate::bot::state::Session;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Registry of sessions keyed by Telegram user id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl SessionStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's session
    pub async fn get(&self, user_id: i64) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&user_id).cloned()
    }

    /// Flow currently owning the user's callbacks
    pub async fn active_command(&self, user_id: i64) -> Option<ActiveCommand> {
        let sessions = self.sessions.read().await;
        sessions.get(&user_id).map(Session::command)
    }

    /// Store `session`, dropping whatever the user had before
    pub async fn replace(&self, user_id: i64, session: Session) {
        let mut sessions = self.sessions.write().await;
        if let Some(previous) = sessions.insert(user_id, session) {
            debug!(
                user_id = user_id,
                previous = ?previous.command(),
                "Replaced session"
            );
        }
    }

    /// Remove the user's session; returns whether one existed
    pub async fn clear(&self, user_id: i64) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&user_id).is_some();
        if removed {
            debug!(user_id = user_id, "Cleared session");
        }
        removed
    }

    /// Number of users with an active session
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// `true` when no user has an active session
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::state::{AddSession, CatalogIndex, DeleteSession, MessageAnchor};

    const ANCHOR: MessageAnchor = MessageAnchor {
        chat_id: 10,
        message_id: 20,
    };

    fn delete_session() -> Session {
        Session::Delete(DeleteSession::new(ANCHOR, vec![], CatalogIndex::new()))
    }

    #[tokio::test]
    async fn test_replace_swaps_active_command() {
        let store = SessionStore::new();
        store.replace(1, delete_session()).await;
        assert_eq!(store.active_command(1).await, Some(ActiveCommand::Delete));

        store
            .replace(1, Session::Add(AddSession::new(ANCHOR, vec![])))
            .await;
        assert_eq!(store.active_command(1).await, Some(ActiveCommand::Add));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_only_that_user() {
        let store = SessionStore::new();
        store.replace(1, delete_session()).await;
        store.replace(2, delete_session()).await;

        assert!(store.clear(1).await);
        assert!(!store.clear(1).await);
        assert_eq!(store.get(1).await, None);
        assert_eq!(store.active_command(1).await, None);
        assert!(store.get(2).await.is_some());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.active_command(42).await, None);
    }
}
