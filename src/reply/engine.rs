//! Rule-based stalling replies
//!
//! Replies are chosen from an ordered table of lexical categories. The first
//! category whose trigger appears in the lower-cased message wins; otherwise
//! a generic stalling line is picked by rotating on the history length.

use super::ReplySource;
use crate::session::Message;

/// Reply used when there is no prior history.
pub const OPENING_REPLY: &str = "Hello? Who is this?";

/// Generic stalling lines, rotated by history length.
pub const FALLBACK_REPLIES: &[&str] = &[
    "I see... can you tell me more about this?",
    "Okay, I'm listening. What should I do next?",
    "I'm not sure I understand. Can you explain again?",
    "Hmm, this sounds important. Give me a moment to process this.",
    "Wait, let me get my reading glasses. Can you repeat that?",
    "I want to help, but I need to understand better. What exactly do you need from me?",
];

/// Lexical category of an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCategory {
    /// OTP, PIN, password or CVV requests
    Credential,
    /// Account verification or suspension pretexts
    Account,
    /// Requests to send or deposit money
    MoneyTransfer,
    /// Prize and lottery pretexts
    Prize,
    /// Requests to open a link
    Link,
    /// KYC and identity document pretexts
    Kyc,
    /// Time pressure
    Urgency,
}

struct ReplyRule {
    category: ReplyCategory,
    triggers: &'static [&'static str],
    response: &'static str,
}

impl ReplyRule {
    fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

// Evaluated top to bottom; credential requests outrank the account pretext
// they usually arrive with.
const RULES: &[ReplyRule] = &[
    ReplyRule {
        category: ReplyCategory::Credential,
        triggers: &["otp", "password", "pin", "cvv"],
        response: "You need my OTP? Is that safe? I just got a message... should I share it with you? I'm a bit confused.",
    },
    ReplyRule {
        category: ReplyCategory::Account,
        triggers: &["account", "verify", "suspended", "blocked"],
        response: "Oh no, really? My account is blocked? What do I need to do? I'm not very good with these things...",
    },
    ReplyRule {
        category: ReplyCategory::MoneyTransfer,
        triggers: &["send money", "transfer", "payment", "deposit"],
        response: "Send money? How much? Where do I send it? Can you explain the process? I've never done this before.",
    },
    ReplyRule {
        category: ReplyCategory::Prize,
        triggers: &["won", "prize", "lottery", "congratulations"],
        response: "Really? I won something? That's amazing! What did I win? What do I need to do to claim it?",
    },
    ReplyRule {
        category: ReplyCategory::Link,
        triggers: &["http", "click"],
        response: "You want me to click a link? I'm on my phone right now. Can you send it again? What will happen when I click it?",
    },
    ReplyRule {
        category: ReplyCategory::Kyc,
        triggers: &["kyc", "aadhar", "pan", "document"],
        response: "Update my KYC? Is this mandatory? What documents do you need? Can I do this later?",
    },
    ReplyRule {
        category: ReplyCategory::Urgency,
        triggers: &["urgent", "immediately", "expire", "limited time"],
        response: "Oh, it's urgent? I'm a bit busy right now. How much time do I have? What happens if I don't do it immediately?",
    },
];

/// Deterministic reply engine playing a confused, stalling target
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyEngine;

impl ReplyEngine {
    /// Create the rule-based engine
    pub fn new() -> Self {
        Self
    }

    /// First category whose trigger appears in `text`, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::reply::{ReplyCategory, ReplyEngine};
    ///
    /// let category = ReplyEngine::categorize("Your account is blocked, send OTP");
    /// assert_eq!(category, Some(ReplyCategory::Credential));
    /// assert_eq!(ReplyEngine::categorize("nice weather"), None);
    /// ```
    pub fn categorize(text: &str) -> Option<ReplyCategory> {
        let lowered = text.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category)
    }

    /// Canned reply for a category
    pub fn category_reply(category: ReplyCategory) -> &'static str {
        RULES
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| rule.response)
            .unwrap_or(FALLBACK_REPLIES[0])
    }

    /// Generic stalling line for a history of `history_len` messages
    pub fn fallback_reply(history_len: usize) -> &'static str {
        FALLBACK_REPLIES[history_len % FALLBACK_REPLIES.len()]
    }

    fn select(&self, text: &str, history: &[Message]) -> &'static str {
        if history.is_empty() {
            return OPENING_REPLY;
        }

        match Self::categorize(text) {
            Some(category) => Self::category_reply(category),
            None => Self::fallback_reply(history.len()),
        }
    }
}

impl ReplySource for ReplyEngine {
    fn reply(&self, text: &str, history: &[Message]) -> String {
        self.select(text, history).to_string()
    }
}
