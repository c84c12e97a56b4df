//! Per-message pipeline
//!
//! The orchestrator records the inbound message, runs the classifier,
//! extractor and reply source over it, records the reply, and decides
//! whether the turn's intelligence should be reported.
//!
//! Turns for the same session id are serialized so the two appends of a
//! turn are never interleaved with another turn's; turns for different
//! sessions proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;

use crate::config::{ClassifierConfig, Config, NotifyPolicy};
use crate::detection::{
    ClassificationResult, Classifier, Extractor, FraudLabel, IntelligenceBundle, PatternLibrary,
};
use crate::error::{HoneypotError, Result};
use crate::metrics::{self, NotificationOutcome};
use crate::notifier::{IntelligenceReport, Notifier};
use crate::reply::{ReplyEngine, ReplySource};
use crate::session::{ConversationSession, Message, SessionStore};

/// Everything produced for one inbound message
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The honeypot's reply
    pub reply: String,
    /// Verdict for this message
    pub classification: ClassificationResult,
    /// Intelligence extracted from this message
    pub intelligence: IntelligenceBundle,
    /// Session message count after this turn
    pub total_messages: usize,
    /// Whether a report was dispatched for this turn
    pub notified: bool,
}

/// Outward result shape returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Always `"success"`
    pub status: String,
    /// The honeypot's reply
    pub reply: String,
    /// Safe, Unknown or Fraud
    #[serde(rename = "fraud_status")]
    pub fraud_status: FraudLabel,
    /// Confidence in `[0, 100]`
    pub confidence: u8,
    /// Intelligence extracted from this message
    pub extracted_intelligence: IntelligenceBundle,
}

impl From<&AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: &AnalysisOutcome) -> Self {
        Self {
            status: "success".to_string(),
            reply: outcome.reply.clone(),
            fraud_status: outcome.classification.label,
            confidence: outcome.classification.confidence,
            extracted_intelligence: outcome.intelligence.clone(),
        }
    }
}

/// Returns true if a turn qualifies for a report
pub fn qualifies_for_report(
    classification: &ClassificationResult,
    intelligence: &IntelligenceBundle,
) -> bool {
    classification.label == FraudLabel::Fraud && !intelligence.is_empty()
}

/// One async mutex per session id
#[derive(Debug, Default)]
struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, id: &str) -> Result<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self
                .inner
                .lock()
                .map_err(|_| HoneypotError::Internal("session lock table poisoned".into()))?;
            Arc::clone(locks.entry(id.to_string()).or_default())
        };
        Ok(lock.lock_owned().await)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    /// Drop the entry for `id` when nobody holds or awaits it
    fn release_if_idle(&self, id: &str) {
        if let Ok(mut locks) = self.inner.lock() {
            if locks.get(id).map(|l| Arc::strong_count(l) == 1).unwrap_or(false) {
                locks.remove(id);
            }
        }
    }
}

/// Ties classifier, extractor, reply source, store and notifier together
pub struct Orchestrator {
    classifier: Classifier,
    extractor: Extractor,
    replies: Arc<dyn ReplySource>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    policy: NotifyPolicy,
    notify_timeout: Duration,
    locks: SessionLocks,
}

impl Orchestrator {
    /// Create an orchestrator with the rule-based reply engine and the
    /// default notification policy
    pub fn new(
        patterns: Arc<PatternLibrary>,
        classifier_config: ClassifierConfig,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&patterns), classifier_config),
            extractor: Extractor::new(patterns),
            replies: Arc::new(ReplyEngine::new()),
            store,
            notifier,
            policy: NotifyPolicy::default(),
            notify_timeout: Duration::from_secs(5),
            locks: SessionLocks::default(),
        }
    }

    /// Create an orchestrator from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the configured pattern extras are invalid
    pub fn from_config(
        config: &Config,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let patterns = Arc::new(PatternLibrary::with_extras(&config.patterns)?);
        Ok(
            Self::new(patterns, config.classifier.clone(), store, notifier).with_notify_policy(
                config.notifier.policy,
                Duration::from_secs(config.notifier.timeout_seconds),
            ),
        )
    }

    /// Replace the reply source
    pub fn with_reply_source(mut self, replies: Arc<dyn ReplySource>) -> Self {
        self.replies = replies;
        self
    }

    /// Set when and how long the notifier may run
    pub fn with_notify_policy(mut self, policy: NotifyPolicy, timeout: Duration) -> Self {
        self.policy = policy;
        self.notify_timeout = timeout;
        self
    }

    /// Process one inbound message.
    ///
    /// When `history` is `None`, the stored messages preceding this turn
    /// are used as history.
    ///
    /// # Errors
    ///
    /// Returns error only if the session store fails. Notifier problems are
    /// logged and never surface here.
    pub async fn process(
        &self,
        session_id: &str,
        text: &str,
        history: Option<Vec<Message>>,
    ) -> Result<AnalysisOutcome> {
        let outcome = {
            let _turn = self.locks.acquire(session_id).await?;
            self.run_turn(session_id, text, history).await
        };
        self.locks.release_if_idle(session_id);
        outcome
    }

    async fn run_turn(
        &self,
        session_id: &str,
        text: &str,
        history: Option<Vec<Message>>,
    ) -> Result<AnalysisOutcome> {
        let history = match history {
            Some(history) => history,
            None => self.store.get(session_id).await?,
        };

        self.store
            .append(session_id, Message::inbound(text))
            .await?;

        let classification = self.classifier.classify(text, &history);
        let intelligence = self.extractor.extract(text);
        let reply = self.replies.reply(text, &history);

        let total_messages = self
            .store
            .append(session_id, Message::ai(reply.clone()))
            .await?;

        let s = &classification.signals;
        tracing::info!(
            session_id,
            label = %classification.label,
            confidence = classification.confidence,
            scam = s.scam_matches,
            urgency = s.urgency_score,
            financial = s.financial_score,
            info = s.info_score,
            safe = s.safe_matches,
            total = s.total,
            artifacts = intelligence.len(),
            "Message analyzed"
        );
        metrics::record_classification(classification.label, classification.confidence);

        let notified = if qualifies_for_report(&classification, &intelligence) {
            self.dispatch_report(session_id, &classification, &intelligence, total_messages)
                .await
        } else {
            false
        };

        Ok(AnalysisOutcome {
            reply,
            classification,
            intelligence,
            total_messages,
            notified,
        })
    }

    /// Load a stored session
    pub async fn session(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        self.store.load(session_id).await
    }

    /// Remove a stored session, waiting for any in-flight turn to finish
    pub async fn clear_session(&self, session_id: &str) -> Result<bool> {
        let removed = {
            let _turn = self.locks.acquire(session_id).await?;
            self.store.clear(session_id).await?
        };
        self.locks.release_if_idle(session_id);
        Ok(removed)
    }

    async fn dispatch_report(
        &self,
        session_id: &str,
        classification: &ClassificationResult,
        intelligence: &IntelligenceBundle,
        total_messages: usize,
    ) -> bool {
        let fire = match self.policy {
            NotifyPolicy::PerMessage => true,
            NotifyPolicy::OncePerSession => match self.store.mark_notified(session_id).await {
                Ok(first) => first,
                Err(e) => {
                    tracing::warn!(session_id, error = %e, "Could not record notification flag, skipping report");
                    false
                }
            },
        };

        if !fire {
            tracing::debug!(session_id, "Session already reported, skipping");
            return false;
        }

        let report = IntelligenceReport::new(
            session_id,
            intelligence.clone(),
            total_messages,
            &classification.signals,
        );
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.notify_timeout;
        tokio::spawn(async move {
            deliver(notifier.as_ref(), &report, timeout).await;
        });

        true
    }
}

/// Deliver one report within `timeout`, logging the outcome
pub(crate) async fn deliver(
    notifier: &dyn Notifier,
    report: &IntelligenceReport,
    timeout: Duration,
) -> NotificationOutcome {
    let outcome = match tokio::time::timeout(timeout, notifier.send(report)).await {
        Ok(Ok(())) => NotificationOutcome::Sent,
        Ok(Err(e)) => {
            tracing::error!(session_id = %report.session_id, error = %e, "Intelligence callback failed");
            NotificationOutcome::Failed
        }
        Err(_) => {
            tracing::error!(
                session_id = %report.session_id,
                timeout_secs = timeout.as_secs_f64(),
                "Intelligence callback timed out"
            );
            NotificationOutcome::TimedOut
        }
    };
    metrics::record_notification(outcome);
    outcome
}
