//! Reply generation
//!
//! The orchestrator asks a [`ReplySource`] for the next line on every turn.
//! [`ReplyEngine`] is the default, deterministic implementation.

pub mod engine;

pub use engine::{ReplyCategory, ReplyEngine, FALLBACK_REPLIES, OPENING_REPLY};

use crate::session::Message;

/// Source of the honeypot's next message
///
/// Implementations must always return a non-empty string, must not mutate
/// the history, and must never reveal real personal data.
///
/// # Examples
///
/// ```
/// use scambait::reply::ReplySource;
/// use scambait::session::Message;
///
/// struct Echo;
///
/// impl ReplySource for Echo {
///     fn reply(&self, text: &str, _history: &[Message]) -> String {
///         format!("You said: {}", text)
///     }
/// }
///
/// assert_eq!(Echo.reply("hi", &[]), "You said: hi");
/// ```
pub trait ReplySource: Send + Sync {
    /// Produce a reply to `text` given the conversation so far
    fn reply(&self, text: &str, history: &[Message]) -> String;
}
