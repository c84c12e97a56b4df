//! Process-local session store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ConversationSession, Message, SessionStore};
use crate::error::{HoneypotError, Result};

/// Session store backed by a map behind a read-write lock
///
/// Sessions live until cleared or the process exits.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, ConversationSession>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Returns true if no sessions are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    HoneypotError::Storage("session map lock poisoned".to_string()).into()
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<ConversationSession>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(id).cloned())
    }

    async fn append(&self, id: &str, message: Message) -> Result<usize> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| ConversationSession::new(id));
        Ok(session.push(message))
    }

    async fn mark_notified(&self, id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| ConversationSession::new(id));
        let first = !session.notified;
        session.notified = true;
        Ok(first)
    }

    async fn clear(&self, id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(sessions.remove(id).is_some())
    }
}
