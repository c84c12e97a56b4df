//! Conversation sessions and their stores
//!
//! The store is the only shared mutable state in the honeypot. Stores must
//! preserve insertion order and make each individual operation atomic;
//! ordering of the two appends within one turn is guaranteed by the
//! orchestrator, which serializes turns per session id.

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::InMemorySessionStore;
pub use sqlite::SqliteSessionStore;
pub use types::{ConversationSession, Message, Sender};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{SessionBackend, SessionConfig};
use crate::error::Result;

/// Storage for conversation sessions
///
/// # Examples
///
/// ```
/// use scambait::session::{InMemorySessionStore, Message, SessionStore};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// runtime.block_on(async {
///     let store = InMemorySessionStore::new();
///     store.append("abc", Message::inbound("hello")).await.unwrap();
///     assert_eq!(store.get("abc").await.unwrap().len(), 1);
/// });
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, or `None` if the id has never been seen
    async fn load(&self, id: &str) -> Result<Option<ConversationSession>>;

    /// Append one message, creating the session on first use.
    ///
    /// Returns the session's message count after the append.
    async fn append(&self, id: &str, message: Message) -> Result<usize>;

    /// Mark the session as reported.
    ///
    /// Returns `true` only for the call that flipped the flag.
    async fn mark_notified(&self, id: &str) -> Result<bool>;

    /// Remove a session. Returns `false` if it did not exist.
    async fn clear(&self, id: &str) -> Result<bool>;

    /// Messages of a session in order; empty if absent
    async fn get(&self, id: &str) -> Result<Vec<Message>> {
        Ok(self.load(id).await?.map(|s| s.messages).unwrap_or_default())
    }
}

/// Build the store selected by configuration
pub fn create_store(config: &SessionConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        SessionBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        SessionBackend::Sqlite => {
            let store = match &config.sqlite_path {
                Some(path) => SqliteSessionStore::new_with_path(path)?,
                None => SqliteSessionStore::new()?,
            };
            Ok(Arc::new(store))
        }
    }
}
