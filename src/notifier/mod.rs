//! Outbound intelligence reporting
//!
//! When a conversation is classified as fraud and yields intelligence, the
//! orchestrator hands an [`IntelligenceReport`] to a [`Notifier`]. Delivery
//! is best-effort: the orchestrator runs it off the request path, bounds it
//! with a timeout, and only logs failures.

pub mod http;

pub use http::HttpNotifier;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NotifierConfig;
use crate::detection::{IntelligenceBundle, SignalBreakdown};
use crate::error::Result;

/// Body posted to the reporting endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceReport {
    /// Session the intelligence came from
    pub session_id: String,
    /// Always true; reports are only sent for fraud
    pub scam_detected: bool,
    /// Session message count including the honeypot's latest reply
    pub total_messages_exchanged: usize,
    /// Artifacts extracted from the triggering message
    pub extracted_intelligence: IntelligenceBundle,
    /// Short description of the tactics observed
    pub agent_notes: String,
}

impl IntelligenceReport {
    /// Build a report for one qualifying message
    ///
    /// # Examples
    ///
    /// ```
    /// use scambait::detection::{IntelligenceBundle, SignalBreakdown};
    /// use scambait::notifier::IntelligenceReport;
    ///
    /// let signals = SignalBreakdown { urgency_score: 1, info_score: 1, ..Default::default() };
    /// let report = IntelligenceReport::new("s1", IntelligenceBundle::default(), 4, &signals);
    /// assert!(report.scam_detected);
    /// assert_eq!(
    ///     report.agent_notes,
    ///     "Scammer used urgency and credential harvesting tactics"
    /// );
    /// ```
    pub fn new(
        session_id: impl Into<String>,
        intelligence: IntelligenceBundle,
        total_messages: usize,
        signals: &SignalBreakdown,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            scam_detected: true,
            total_messages_exchanged: total_messages,
            extracted_intelligence: intelligence,
            agent_notes: agent_notes(signals),
        }
    }
}

fn agent_notes(signals: &SignalBreakdown) -> String {
    let mut tactics = Vec::new();
    if signals.urgency_score > 0 {
        tactics.push("urgency");
    }
    if signals.financial_score > 0 {
        tactics.push("financial manipulation");
    }
    if signals.info_score > 0 {
        tactics.push("credential harvesting");
    }
    if tactics.is_empty() && signals.scam_matches > 0 {
        tactics.push("scam pretext");
    }

    match tactics.as_slice() {
        [] => "Scam indicators detected".to_string(),
        [only] => format!("Scammer used {} tactics", only),
        [init @ .., last] => format!("Scammer used {} and {} tactics", init.join(", "), last),
    }
}

/// Destination for intelligence reports
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one report
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails; callers log and drop it
    async fn send(&self, report: &IntelligenceReport) -> Result<()>;
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, report: &IntelligenceReport) -> Result<()> {
        tracing::debug!(
            session_id = %report.session_id,
            "Notifier disabled, dropping intelligence report"
        );
        Ok(())
    }
}

/// Build the notifier selected by configuration
pub fn create_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    if !config.enabled {
        return Ok(Arc::new(NoopNotifier));
    }

    let url = url::Url::parse(&config.callback_url)
        .map_err(|e| crate::error::HoneypotError::Config(format!("Invalid callback URL: {}", e)))?;
    Ok(Arc::new(HttpNotifier::new(
        url,
        Duration::from_secs(config.timeout_seconds),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_notes_lists_tactics() {
        let signals = SignalBreakdown {
            urgency_score: 2,
            financial_score: 1,
            info_score: 1,
            ..Default::default()
        };
        assert_eq!(
            agent_notes(&signals),
            "Scammer used urgency, financial manipulation and credential harvesting tactics"
        );
    }

    #[test]
    fn test_agent_notes_falls_back_to_pretext() {
        let signals = SignalBreakdown {
            scam_matches: 3,
            ..Default::default()
        };
        assert_eq!(agent_notes(&signals), "Scammer used scam pretext tactics");
        assert_eq!(
            agent_notes(&SignalBreakdown::default()),
            "Scam indicators detected"
        );
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = IntelligenceReport::new(
            "abc",
            IntelligenceBundle::default(),
            6,
            &SignalBreakdown::default(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["scamDetected"], true);
        assert_eq!(json["totalMessagesExchanged"], 6);
        assert!(json["extractedIntelligence"]["upiIds"].is_array());
        assert!(json["agentNotes"].is_string());
    }

    #[tokio::test]
    async fn test_noop_notifier_succeeds() {
        let report = IntelligenceReport::new(
            "abc",
            IntelligenceBundle::default(),
            2,
            &SignalBreakdown::default(),
        );
        assert!(NoopNotifier.send(&report).await.is_ok());
    }

    #[test]
    fn test_create_notifier_disabled_is_noop() {
        let config = NotifierConfig {
            enabled: false,
            callback_url: "not a url".to_string(),
            ..NotifierConfig::default()
        };
        assert!(create_notifier(&config).is_ok());
    }
}
