//! Tolerant decoding of inbound analyze requests
//!
//! Senders are untrusted and have used several body shapes over time. Nothing
//! here fails: missing or malformed fields fall back to defaults so the
//! conversation stays alive.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::session::{Message, Sender};

/// Text used when no message text can be located
pub const PLACEHOLDER_TEXT: &str = "Hello";

/// Session id used when the request carries none
pub const DEFAULT_SESSION_ID: &str = "default";

/// Decoded analyze request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub session_id: String,
    pub text: String,
    /// Client-supplied prior history, if any
    pub history: Option<Vec<Message>>,
}

impl InboundRequest {
    /// Decode a raw body; anything that is not JSON is treated as `{}`
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::server::request::InboundRequest;
    ///
    /// let req = InboundRequest::from_bytes(br#"{"message": "Pay now"}"#);
    /// assert_eq!(req.text, "Pay now");
    /// assert_eq!(req.session_id, "default");
    ///
    /// let req = InboundRequest::from_bytes(b"not json");
    /// assert_eq!(req.text, "Hello");
    /// ```
    pub fn from_bytes(body: &[u8]) -> Self {
        let value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    /// Decode a parsed body
    pub fn from_value(value: &Value) -> Self {
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
            .to_string();

        let text = locate_text(value)
            .unwrap_or(PLACEHOLDER_TEXT)
            .to_string();

        let history = value
            .get("conversationHistory")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(history_entry).collect());

        Self {
            session_id,
            text,
            history,
        }
    }
}

/// `message.text`, then `message` as a string, then top-level `text`
fn locate_text(value: &Value) -> Option<&str> {
    let candidate = match value.get("message") {
        Some(Value::String(text)) => Some(text.as_str()),
        Some(Value::Object(message)) => message.get("text").and_then(Value::as_str),
        _ => None,
    };

    candidate
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            value
                .get("text")
                .and_then(Value::as_str)
                .filter(|t| !t.trim().is_empty())
        })
}

fn history_entry(entry: &Value) -> Option<Message> {
    let text = entry.get("text").and_then(Value::as_str)?;
    let sender = entry
        .get("sender")
        .and_then(Value::as_str)
        .map(Sender::from_label)
        .unwrap_or(Sender::User);
    let timestamp = entry
        .get("timestamp")
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Some(Message::at(sender, text, timestamp))
}

/// RFC 3339 strings or epoch milliseconds
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
