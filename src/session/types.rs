//! Conversation data types
//!
//! Messages, senders and the wire shape used for supplied history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human end of the conversation (as labelled by the client)
    User,
    /// The honeypot itself
    Ai,
    /// The suspected scammer
    Scammer,
}

impl Sender {
    /// Lenient parse of a client-supplied sender label.
    ///
    /// Unknown labels map to `User`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "ai" | "assistant" | "bot" | "agent" | "honeypot" => Sender::Ai,
            "scammer" => Sender::Scammer,
            _ => Sender::User,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
            Sender::Scammer => "scammer",
        }
    }
}

/// One immutable conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent it
    pub sender: Sender,
    /// UTF-8 text as received
    pub text: String,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::session::{Message, Sender};
    ///
    /// let msg = Message::new(Sender::Scammer, "Your account is blocked");
    /// assert_eq!(msg.sender, Sender::Scammer);
    /// ```
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self::at(sender, text, Utc::now())
    }

    /// Create a message with an explicit timestamp
    pub fn at(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    /// An inbound message from the other party
    pub fn inbound(text: impl Into<String>) -> Self {
        Self::new(Sender::Scammer, text)
    }

    /// A reply produced by the honeypot
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }
}

/// An append-only conversation owned by a session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    /// Opaque client-chosen identifier
    pub id: String,
    /// Messages in conversation order
    pub messages: Vec<Message>,
    /// Whether intelligence for this session has already been reported
    #[serde(default)]
    pub notified: bool,
}

impl ConversationSession {
    /// Create an empty session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            notified: false,
        }
    }

    /// Append a message, returning the new message count
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len()
    }
}
