//! Rule-based fraud classification
//!
//! Scores a single message by counting distinct phrases from four signal
//! families (general scam language, urgency, money movement, credential
//! requests) and one benign family, then maps the weighted total to a
//! label and confidence through a tiered policy.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::patterns::{count_distinct, PatternLibrary};
use crate::config::ClassifierConfig;
use crate::session::Message;

/// Fraud verdict for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudLabel {
    /// Benign small talk with no scam signal
    Safe,
    /// Not enough signal either way
    Unknown,
    /// Scam signals crossed the fraud threshold
    Fraud,
}

impl FraudLabel {
    /// Wire and log representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FraudLabel::Safe => "Safe",
            FraudLabel::Unknown => "Unknown",
            FraudLabel::Fraud => "Fraud",
        }
    }
}

impl fmt::Display for FraudLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw counts behind a classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalBreakdown {
    /// Distinct general scam-indicator phrases
    pub scam_matches: u32,
    /// Distinct urgency phrases
    pub urgency_score: u32,
    /// Distinct money-movement phrases
    pub financial_score: u32,
    /// Distinct credential-request phrases
    pub info_score: u32,
    /// Distinct benign phrases
    pub safe_matches: u32,
    /// Weighted sum of the four scam families
    pub total: u32,
}

/// Label and confidence for one message
///
/// Recomputed for every message; never carried over between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Fraud verdict
    pub label: FraudLabel,
    /// Confidence in `[0, 100]`
    pub confidence: u8,
    /// Counts the verdict was derived from
    pub signals: SignalBreakdown,
}

/// Deterministic keyword-scoring classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Arc<PatternLibrary>,
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier over a shared pattern library
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use scambait::config::ClassifierConfig;
    /// use scambait::detection::{Classifier, FraudLabel, PatternLibrary};
    ///
    /// let patterns = Arc::new(PatternLibrary::builtin().unwrap());
    /// let classifier = Classifier::new(patterns, ClassifierConfig::default());
    /// let result = classifier.classify("Hello, how are you?", &[]);
    /// assert_eq!(result.label, FraudLabel::Safe);
    /// assert_eq!(result.confidence, 80);
    /// ```
    pub fn new(patterns: Arc<PatternLibrary>, config: ClassifierConfig) -> Self {
        Self { patterns, config }
    }

    /// Classify one message.
    ///
    /// `history` is part of the contract so that history-aware scoring can
    /// be added without changing callers; the current policy scores the
    /// message on its own.
    pub fn classify(&self, text: &str, _history: &[Message]) -> ClassificationResult {
        let signals = self.signals(text);
        let (label, confidence) = self.decide(&signals);

        ClassificationResult {
            label,
            confidence,
            signals,
        }
    }

    /// Count the signal families present in `text`
    pub fn signals(&self, text: &str) -> SignalBreakdown {
        let lowered = text.to_lowercase();
        let p = &self.patterns;
        let c = &self.config;

        let scam_matches = count_distinct(p.scam_keywords(), &lowered) as u32;
        let urgency_score = count_distinct(p.urgency(), &lowered) as u32;
        let financial_score = count_distinct(p.financial(), &lowered) as u32;
        let info_score = count_distinct(p.credential(), &lowered) as u32;
        let safe_matches = count_distinct(p.safe(), &lowered) as u32;

        let total = scam_matches
            .saturating_mul(c.scam_weight)
            .saturating_add(urgency_score.saturating_mul(c.urgency_weight))
            .saturating_add(financial_score.saturating_mul(c.financial_weight))
            .saturating_add(info_score.saturating_mul(c.credential_weight));

        SignalBreakdown {
            scam_matches,
            urgency_score,
            financial_score,
            info_score,
            safe_matches,
            total,
        }
    }

    fn decide(&self, s: &SignalBreakdown) -> (FraudLabel, u8) {
        let c = &self.config;
        let total = s.total;

        let (label, raw) = if total >= c.fraud_high_threshold {
            let scaled = c.high_base.saturating_add(c.high_step.saturating_mul(total));
            (FraudLabel::Fraud, scaled.min(c.high_cap))
        } else if total >= c.fraud_low_threshold {
            (
                FraudLabel::Fraud,
                c.low_base.saturating_add(c.low_step.saturating_mul(total)),
            )
        } else if total == 0 && s.safe_matches > s.scam_matches {
            (FraudLabel::Safe, c.safe_confidence)
        } else {
            (
                FraudLabel::Unknown,
                c.unknown_base
                    .saturating_add(c.unknown_step.saturating_mul(s.scam_matches)),
            )
        };

        if raw > 100 {
            tracing::warn!(label = %label, raw, "Confidence above 100, clamping");
        }
        (label, raw.min(100) as u8)
    }
}
