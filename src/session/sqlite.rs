//! SQLite-backed session store
//!
//! Messages are stored one row per turn so appends never rewrite history.
//! Each operation opens its own connection on a blocking worker thread.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use super::{ConversationSession, Message, Sender, SessionStore};
use crate::error::{HoneypotError, Result};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent session store
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    db_path: PathBuf,
}

impl SqliteSessionStore {
    /// Create a store in the user's data directory
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "scambait", "scambait")
            .ok_or_else(|| HoneypotError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("sessions.db"))
    }

    /// Create a store at an explicit database path
    ///
    /// Parent directories are created as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::session::SqliteSessionStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SqliteSessionStore::new_with_path(dir.path().join("s.db")).unwrap();
    /// assert!(store.db_path().exists());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| HoneypotError::Storage(e.to_string()))?;
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Location of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn init(&self) -> Result<()> {
        let conn = open(&self.db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                notified INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS messages (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                text TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_session ON messages (session_id, seq);",
        )
        .context("Failed to create tables")
        .map_err(|e| HoneypotError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut conn = open(&db_path)?;
            op(&mut conn)
        })
        .await
        .map_err(|e| HoneypotError::Internal(format!("storage task failed: {}", e)))?;
        outcome
    }
}

fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .context("Failed to open database")
        .map_err(|e| HoneypotError::Storage(e.to_string()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("Failed to set busy timeout")
        .map_err(|e| HoneypotError::Storage(e.to_string()))?;
    Ok(conn)
}

fn storage_err(context: &'static str) -> impl FnOnce(rusqlite::Error) -> anyhow::Error {
    move |e| HoneypotError::Storage(format!("{}: {}", context, e)).into()
}

fn ensure_session(conn: &Connection, id: &str, now: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO sessions (id, created_at, updated_at, notified)
        VALUES (?, ?, ?, 0)",
        params![id, now, now],
    )
    .map_err(storage_err("Failed to create session"))?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self, id: &str) -> Result<Option<ConversationSession>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let notified: Option<bool> = conn
                .query_row(
                    "SELECT notified FROM sessions WHERE id = ?",
                    params![id],
                    |row| row.get::<_, i64>(0).map(|n| n != 0),
                )
                .optional()
                .map_err(storage_err("Failed to query session"))?;

            let Some(notified) = notified else {
                return Ok(None);
            };

            let mut stmt = conn
                .prepare(
                    "SELECT sender, text, timestamp FROM messages
                    WHERE session_id = ?
                    ORDER BY seq ASC",
                )
                .map_err(storage_err("Failed to prepare statement"))?;

            let rows = stmt
                .query_map(params![id], |row| {
                    let sender: String = row.get(0)?;
                    let text: String = row.get(1)?;
                    let timestamp: String = row.get(2)?;
                    Ok(Message::at(
                        Sender::from_label(&sender),
                        text,
                        parse_timestamp(&timestamp),
                    ))
                })
                .map_err(storage_err("Failed to query messages"))?;

            let mut messages = Vec::new();
            for row in rows {
                messages.push(row.map_err(storage_err("Failed to read message"))?);
            }

            Ok(Some(ConversationSession {
                id,
                messages,
                notified,
            }))
        })
        .await
    }

    async fn append(&self, id: &str, message: Message) -> Result<usize> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let now = Utc::now().to_rfc3339();
            let tx = conn
                .transaction()
                .map_err(storage_err("Failed to start transaction"))?;

            ensure_session(&tx, &id, &now)?;
            tx.execute(
                "UPDATE sessions SET updated_at = ? WHERE id = ?",
                params![now, id],
            )
            .map_err(storage_err("Failed to update session"))?;
            tx.execute(
                "INSERT INTO messages (session_id, sender, text, timestamp) VALUES (?, ?, ?, ?)",
                params![
                    id,
                    message.sender.as_str(),
                    message.text,
                    message.timestamp.to_rfc3339()
                ],
            )
            .map_err(storage_err("Failed to insert message"))?;

            let count: i64 = tx
                .query_row(
                    "SELECT count(*) FROM messages WHERE session_id = ?",
                    params![id],
                    |row| row.get(0),
                )
                .map_err(storage_err("Failed to count messages"))?;

            tx.commit()
                .map_err(storage_err("Failed to commit transaction"))?;

            Ok(count as usize)
        })
        .await
    }

    async fn mark_notified(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let now = Utc::now().to_rfc3339();
            let tx = conn
                .transaction()
                .map_err(storage_err("Failed to start transaction"))?;

            ensure_session(&tx, &id, &now)?;
            let changed = tx
                .execute(
                    "UPDATE sessions SET notified = 1, updated_at = ? WHERE id = ? AND notified = 0",
                    params![now, id],
                )
                .map_err(storage_err("Failed to mark session notified"))?;

            tx.commit()
                .map_err(storage_err("Failed to commit transaction"))?;

            Ok(changed == 1)
        })
        .await
    }

    async fn clear(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let tx = conn
                .transaction()
                .map_err(storage_err("Failed to start transaction"))?;

            tx.execute("DELETE FROM messages WHERE session_id = ?", params![id])
                .map_err(storage_err("Failed to delete messages"))?;
            let removed = tx
                .execute("DELETE FROM sessions WHERE id = ?", params![id])
                .map_err(storage_err("Failed to delete session"))?;

            tx.commit()
                .map_err(storage_err("Failed to commit transaction"))?;

            Ok(removed > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Returns the store together with its `TempDir` so the directory
    /// outlives the test body.
    fn create_test_store() -> (SqliteSessionStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = SqliteSessionStore::new_with_path(dir.path().join("sessions.db"))
            .expect("failed to create store");
        (store, dir)
    }

    #[test]
    fn test_init_creates_tables() {
        let (store, _dir) = create_test_store();
        let conn = Connection::open(store.db_path()).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name IN ('sessions', 'messages')",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_new_with_path_creates_parent_dirs() {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("nested").join("deeper").join("sessions.db");
        let store = SqliteSessionStore::new_with_path(&db_path).expect("create store");
        assert_eq!(store.db_path(), db_path.as_path());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_append_and_load_preserve_order() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.append("s1", Message::inbound("first")).await.unwrap(), 1);
        assert_eq!(store.append("s1", Message::ai("second")).await.unwrap(), 2);
        assert_eq!(store.append("s1", Message::inbound("third")).await.unwrap(), 3);

        let session = store.load("s1").await.unwrap().expect("session exists");
        let texts: Vec<&str> = session.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(session.messages[1].sender, Sender::Ai);
        assert_eq!(session.messages[0].sender, Sender::Scammer);
        assert!(!session.notified);
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let (store, _dir) = create_test_store();
        assert!(store.load("missing").await.unwrap().is_none());
        assert!(store.get("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_notified_only_first_call_wins() {
        let (store, _dir) = create_test_store();
        store.append("s", Message::inbound("x")).await.unwrap();
        assert!(store.mark_notified("s").await.unwrap());
        assert!(!store.mark_notified("s").await.unwrap());
        assert!(store.load("s").await.unwrap().unwrap().notified);
    }

    #[tokio::test]
    async fn test_clear_removes_session_and_messages() {
        let (store, _dir) = create_test_store();
        store.append("s", Message::inbound("x")).await.unwrap();
        assert!(store.clear("s").await.unwrap());
        assert!(store.load("s").await.unwrap().is_none());
        assert!(!store.clear("s").await.unwrap());

        // A cleared id starts over from an empty history
        assert_eq!(store.append("s", Message::inbound("y")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sessions_survive_reopen() {
        let (store, dir) = create_test_store();
        store.append("keep", Message::inbound("persisted")).await.unwrap();

        let reopened = SqliteSessionStore::new_with_path(dir.path().join("sessions.db")).unwrap();
        let messages = reopened.get("keep").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "persisted");
    }
}
