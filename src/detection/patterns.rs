//! Scam-indicator phrase sets and extraction patterns
//!
//! The library is built once at startup and shared read-only between the
//! classifier and the extractor. All phrase sets are stored lower-cased and
//! matched as substrings of the lower-cased message text.

use crate::config::PatternConfig;
use crate::error::{HoneypotError, Result};
use regex::Regex;

/// General scam-indicator phrases. Also the source of `suspiciousKeywords`.
pub const SCAM_KEYWORDS: &[&str] = &[
    "urgent",
    "verify",
    "suspended",
    "blocked",
    "account blocked",
    "click here",
    "confirm your",
    "won",
    "lottery",
    "prize",
    "claim",
    "refund",
    "bank account",
    "card details",
    "cvv",
    "otp",
    "one time password",
    "expire",
    "immediately",
    "act now",
    "limited time",
    "congratulations",
    "tax refund",
    "government",
    "irs",
    "revenue",
    "penalty",
    "arrest warrant",
    "legal action",
    "court",
    "police",
    "officer",
    "paytm",
    "phonepe",
    "gpay",
    "upi",
    "transfer money",
    "update kyc",
    "kyc pending",
    "link aadhar",
    "pan card",
    "covid relief",
    "stimulus",
    "beneficiary",
    "inheritance",
    "nigerian prince",
    "bitcoin",
    "investment opportunity",
    "double your money",
    "guaranteed returns",
    "risk free",
];

/// Time-pressure phrases.
pub const URGENCY_PATTERNS: &[&str] = &["urgent", "immediate", "now", "quickly", "asap", "expire"];

/// Money-movement requests.
pub const FINANCIAL_PATTERNS: &[&str] = &[
    "send money",
    "transfer",
    "pay",
    "payment",
    "deposit",
    "account number",
];

/// Requests for credentials or identity documents.
pub const CREDENTIAL_PATTERNS: &[&str] = &[
    "password",
    "pin",
    "otp",
    "cvv",
    "card number",
    "social security",
    "aadhar",
];

/// Benign small-talk phrases.
pub const SAFE_INDICATORS: &[&str] = &[
    "hello",
    "how are you",
    "good morning",
    "good evening",
    "thank you",
    "thanks",
    "okay",
    "yes",
    "no",
    "bye",
];

/// Handle fragments that mark the domain part of a UPI identifier.
pub const UPI_HANDLES: &[&str] = &[
    "paytm", "ybl", "okaxis", "oksbi", "okhdfcbank", "okicici", "axl", "airtel", "fbl", "ibl",
    "apl", "upi",
];

const UPI_PATTERN: &str = r"\b[\w.\-]+@[\w.\-]+\b";
const PHONE_PATTERN: &str = r"\+91[\-\s]?([6-9][0-9]{9})\b|\b([6-9][0-9]{9})\b";
const LINK_PATTERN: &str = r#"https?://[^\s<>"'{}|\\^`\[\]]+"#;
const ACCOUNT_PATTERN: &str = r"\b[0-9]{9,18}\b";

/// Immutable phrase sets and compiled extraction regexes.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    scam_keywords: Vec<String>,
    urgency: Vec<String>,
    financial: Vec<String>,
    credential: Vec<String>,
    safe: Vec<String>,
    upi_handles: Vec<String>,
    upi_regex: Regex,
    phone_regex: Regex,
    link_regex: Regex,
    account_regex: Regex,
}

impl PatternLibrary {
    /// Build the library from the built-in phrase sets only.
    ///
    /// # Errors
    ///
    /// Returns error if one of the extraction regexes fails to compile
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::detection::PatternLibrary;
    ///
    /// let patterns = PatternLibrary::builtin().unwrap();
    /// assert!(patterns.scam_keywords().iter().any(|k| k == "otp"));
    /// ```
    pub fn builtin() -> Result<Self> {
        Self::with_extras(&PatternConfig::default())
    }

    /// Build the library from the built-in sets plus configured extras.
    ///
    /// Extra keywords join the general scam-indicator set (and therefore the
    /// `suspiciousKeywords` scan); extra handles join the UPI handle set.
    ///
    /// # Errors
    ///
    /// Returns error if an extra entry is blank or a regex fails to compile
    pub fn with_extras(extras: &PatternConfig) -> Result<Self> {
        Ok(Self {
            scam_keywords: merge(SCAM_KEYWORDS, &extras.extra_scam_keywords, "scam keyword")?,
            urgency: merge(URGENCY_PATTERNS, &[], "urgency pattern")?,
            financial: merge(FINANCIAL_PATTERNS, &[], "financial pattern")?,
            credential: merge(CREDENTIAL_PATTERNS, &[], "credential pattern")?,
            safe: merge(SAFE_INDICATORS, &[], "safe indicator")?,
            upi_handles: merge(UPI_HANDLES, &extras.extra_upi_handles, "UPI handle")?,
            upi_regex: Regex::new(UPI_PATTERN)?,
            phone_regex: Regex::new(PHONE_PATTERN)?,
            link_regex: Regex::new(LINK_PATTERN)?,
            account_regex: Regex::new(ACCOUNT_PATTERN)?,
        })
    }

    /// General scam-indicator phrases
    pub fn scam_keywords(&self) -> &[String] {
        &self.scam_keywords
    }

    /// Urgency phrases
    pub fn urgency(&self) -> &[String] {
        &self.urgency
    }

    /// Money-movement phrases
    pub fn financial(&self) -> &[String] {
        &self.financial
    }

    /// Credential-request phrases
    pub fn credential(&self) -> &[String] {
        &self.credential
    }

    /// Benign conversation phrases
    pub fn safe(&self) -> &[String] {
        &self.safe
    }

    /// UPI handle fragments
    pub fn upi_handles(&self) -> &[String] {
        &self.upi_handles
    }

    pub(crate) fn upi_regex(&self) -> &Regex {
        &self.upi_regex
    }

    pub(crate) fn phone_regex(&self) -> &Regex {
        &self.phone_regex
    }

    pub(crate) fn link_regex(&self) -> &Regex {
        &self.link_regex
    }

    pub(crate) fn account_regex(&self) -> &Regex {
        &self.account_regex
    }

    /// Returns true if `domain` contains one of the known UPI handle fragments.
    pub fn is_upi_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.upi_handles.iter().any(|h| domain.contains(h.as_str()))
    }

    /// Scam-indicator phrases present in already lower-cased text.
    pub fn matching_scam_keywords<'a>(
        &'a self,
        lowered: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        matching(&self.scam_keywords, lowered)
    }
}

/// Number of distinct phrases from `set` that occur in `lowered`.
pub fn count_distinct(set: &[String], lowered: &str) -> usize {
    matching(set, lowered).count()
}

fn matching<'a>(set: &'a [String], lowered: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    set.iter()
        .map(String::as_str)
        .filter(move |phrase| lowered.contains(phrase))
}

fn merge(builtin: &[&str], extra: &[String], kind: &str) -> Result<Vec<String>> {
    let mut merged: Vec<String> = builtin.iter().map(|s| s.to_string()).collect();
    for entry in extra {
        let normalized = entry.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(HoneypotError::Pattern(format!("{} cannot be blank", kind)).into());
        }
        if !merged.contains(&normalized) {
            merged.push(normalized);
        }
    }
    Ok(merged)
}
