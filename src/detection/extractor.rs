//! Intelligence extraction
//!
//! Scans a single message for UPI handles, phone numbers, links, bank
//! account numbers, and scam keywords. Artifacts keep their original case;
//! only the keyword scan is case-insensitive.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::patterns::PatternLibrary;

/// Country code that may prefix a phone number
const COUNTRY_CODE: &str = "91";

/// Deduplicated artifacts extracted from one message
///
/// Sets are ordered so that serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceBundle {
    /// Digit runs of 9 to 18 digits that are not phone numbers
    pub bank_accounts: BTreeSet<String>,
    /// `name@handle` identifiers with a known payment handle
    pub upi_ids: BTreeSet<String>,
    /// `http(s)://` links
    pub phishing_links: BTreeSet<String>,
    /// Ten-digit mobile numbers, country code stripped
    pub phone_numbers: BTreeSet<String>,
    /// Scam-indicator phrases present in the message
    pub suspicious_keywords: BTreeSet<String>,
}

impl IntelligenceBundle {
    /// Returns true if every field is empty
    pub fn is_empty(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phishing_links.is_empty()
            && self.phone_numbers.is_empty()
            && self.suspicious_keywords.is_empty()
    }

    /// Returns true if at least one actionable artifact (anything other
    /// than a keyword) was found
    pub fn has_artifacts(&self) -> bool {
        !(self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phishing_links.is_empty()
            && self.phone_numbers.is_empty())
    }

    /// Total number of extracted items across all fields
    pub fn len(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.phone_numbers.len()
            + self.suspicious_keywords.len()
    }
}

/// Regex-driven artifact extractor
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: Arc<PatternLibrary>,
}

impl Extractor {
    /// Create an extractor over a shared pattern library
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }

    /// Extract intelligence from `text`.
    ///
    /// Blank text yields an empty bundle. Phone numbers are resolved before
    /// bank accounts, and any digit run equal to a matched phone number
    /// (with or without the country code) is left out of `bank_accounts`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use scambait::detection::{Extractor, PatternLibrary};
    ///
    /// let extractor = Extractor::new(Arc::new(PatternLibrary::builtin().unwrap()));
    /// let bundle = extractor.extract("pay to rahul@paytm or call 9876543210");
    /// assert!(bundle.upi_ids.contains("rahul@paytm"));
    /// assert!(bundle.phone_numbers.contains("9876543210"));
    /// assert!(bundle.bank_accounts.is_empty());
    /// ```
    pub fn extract(&self, text: &str) -> IntelligenceBundle {
        if text.trim().is_empty() {
            return IntelligenceBundle::default();
        }

        let phone_numbers = self.phone_numbers(text);
        let bank_accounts = self
            .patterns
            .account_regex()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|run| !is_phone_value(run, &phone_numbers))
            .map(str::to_string)
            .collect();

        let lowered = text.to_lowercase();

        IntelligenceBundle {
            bank_accounts,
            upi_ids: self.upi_ids(text),
            phishing_links: self
                .patterns
                .link_regex()
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            phone_numbers,
            suspicious_keywords: self
                .patterns
                .matching_scam_keywords(&lowered)
                .map(str::to_string)
                .collect(),
        }
    }

    fn phone_numbers(&self, text: &str) -> BTreeSet<String> {
        self.patterns
            .phone_regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn upi_ids(&self, text: &str) -> BTreeSet<String> {
        self.patterns
            .upi_regex()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| {
                candidate
                    .split_once('@')
                    .map(|(_, domain)| self.patterns.is_upi_domain(domain))
                    .unwrap_or(false)
            })
            .map(str::to_string)
            .collect()
    }
}

fn is_phone_value(run: &str, phones: &BTreeSet<String>) -> bool {
    if phones.contains(run) {
        return true;
    }
    run.strip_prefix(COUNTRY_CODE)
        .map(|rest| phones.contains(rest))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(Arc::new(PatternLibrary::builtin().unwrap()))
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_upi_and_phone_without_bank_account() {
        let bundle = extractor().extract("Please pay to rahul@paytm and call 9876543210");
        assert_eq!(bundle.upi_ids, set(&["rahul@paytm"]));
        assert_eq!(bundle.phone_numbers, set(&["9876543210"]));
        assert!(bundle.bank_accounts.is_empty());
    }

    #[test]
    fn test_twelve_digit_run_is_bank_account() {
        let bundle = extractor().extract("Deposit into 456789012345 today");
        assert_eq!(bundle.bank_accounts, set(&["456789012345"]));
        assert!(bundle.phone_numbers.is_empty());
    }

    #[test]
    fn test_phone_with_country_code() {
        let bundle = extractor().extract("Call +91 9123456789 or +919123456789 or +91-9123456789");
        assert_eq!(bundle.phone_numbers, set(&["9123456789"]));
        assert!(bundle.bank_accounts.is_empty());
    }

    #[test]
    fn test_phone_must_start_with_six_to_nine() {
        let bundle = extractor().extract("ref 1234567890");
        assert!(bundle.phone_numbers.is_empty());
        assert_eq!(bundle.bank_accounts, set(&["1234567890"]));
    }

    #[test]
    fn test_plain_email_is_not_upi() {
        let bundle = extractor().extract("mail support@gmail.com or pay scam.er@okaxis");
        assert_eq!(bundle.upi_ids, set(&["scam.er@okaxis"]));
    }

    #[test]
    fn test_upi_keeps_original_case() {
        let bundle = extractor().extract("send to Rahul.K@YBL");
        assert_eq!(bundle.upi_ids, set(&["Rahul.K@YBL"]));
    }

    #[test]
    fn test_links_stop_at_whitespace_and_quotes() {
        let bundle =
            extractor().extract(r#"open <a href="https://bit.ly/x1">here</a> or http://fake-bank.in/login now"#);
        assert_eq!(
            bundle.phishing_links,
            set(&["https://bit.ly/x1", "http://fake-bank.in/login"])
        );
    }

    #[test]
    fn test_short_digit_runs_ignored() {
        let bundle = extractor().extract("your OTP is 123456");
        assert!(bundle.bank_accounts.is_empty());
        assert!(bundle.phone_numbers.is_empty());
        assert!(bundle.suspicious_keywords.contains("otp"));
    }

    #[test]
    fn test_blank_text_yields_empty_bundle() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let bundle = extractor().extract("URGENT!! Your account BLOCKED");
        assert!(bundle.suspicious_keywords.contains("urgent"));
        assert!(bundle.suspicious_keywords.contains("blocked"));
        assert!(bundle.suspicious_keywords.contains("account blocked"));
    }

    #[test]
    fn test_doubling_text_does_not_change_sets() {
        let text = "pay rahul@paytm, call 9876543210, visit https://x.io/a, acct 456789012345";
        let once = extractor().extract(text);
        let twice = extractor().extract(&format!("{} {}", text, text));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_phone_never_in_bank_accounts() {
        let bundle = extractor().extract("9876543210 919876543210 8765432109");
        for phone in &bundle.phone_numbers {
            assert!(!bundle.bank_accounts.contains(phone));
        }
        assert!(bundle.bank_accounts.is_empty());
    }

    #[test]
    fn test_has_artifacts_ignores_keywords() {
        let bundle = extractor().extract("urgent lottery");
        assert!(!bundle.is_empty());
        assert!(!bundle.has_artifacts());
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let bundle = extractor().extract("call 9876543210");
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["phoneNumbers"][0], "9876543210");
        assert!(json["bankAccounts"].as_array().unwrap().is_empty());
        assert!(json.get("suspiciousKeywords").is_some());
    }
}
