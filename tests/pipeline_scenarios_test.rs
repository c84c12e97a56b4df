//! End-to-end scenarios through the orchestrator
//!
//! Covers the reference conversations and the cross-cutting properties of
//! the detection pipeline: determinism, confidence bounds, phone/account
//! disambiguation, dedup and fallback rotation.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use common::orchestrator_with;
use scambait::config::{ClassifierConfig, NotifyPolicy};
use scambait::detection::{Classifier, Extractor, FraudLabel, PatternLibrary};
use scambait::notifier::{IntelligenceReport, NoopNotifier, Notifier};
use scambait::reply::{ReplyCategory, ReplyEngine, ReplySource, FALLBACK_REPLIES, OPENING_REPLY};
use scambait::session::{InMemorySessionStore, Message, Sender};

/// Records every report it is handed
#[derive(Default)]
struct RecordingNotifier {
    reports: Mutex<Vec<IntelligenceReport>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, report: &IntelligenceReport) -> scambait::Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

impl RecordingNotifier {
    async fn wait_for(&self, count: usize) -> Vec<IntelligenceReport> {
        for _ in 0..100 {
            {
                let reports = self.reports.lock().unwrap();
                if reports.len() >= count {
                    return reports.clone();
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.reports.lock().unwrap().clone()
    }
}

fn library() -> Arc<PatternLibrary> {
    Arc::new(PatternLibrary::builtin().unwrap())
}

fn history(len: usize) -> Vec<Message> {
    (0..len)
        .map(|i| {
            let sender = if i % 2 == 0 { Sender::Scammer } else { Sender::Ai };
            Message::new(sender, format!("turn {}", i))
        })
        .collect()
}

#[tokio::test]
async fn greeting_on_empty_history() {
    let orch = orchestrator_with(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(NoopNotifier),
        NotifyPolicy::OncePerSession,
    );

    let outcome = orch
        .process("greet", "Hello, how are you?", Some(Vec::new()))
        .await
        .unwrap();

    assert_eq!(outcome.classification.label, FraudLabel::Safe);
    assert_eq!(outcome.classification.confidence, 80);
    assert!(outcome.intelligence.is_empty());
    assert_eq!(outcome.reply, OPENING_REPLY);
}

#[tokio::test]
async fn otp_request_with_history() {
    let orch = orchestrator_with(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(NoopNotifier),
        NotifyPolicy::OncePerSession,
    );

    let outcome = orch
        .process(
            "otp",
            "Your account is blocked, send your OTP 123456 now",
            Some(history(2)),
        )
        .await
        .unwrap();

    assert_eq!(outcome.classification.label, FraudLabel::Fraud);
    assert!(outcome.classification.confidence >= 95);
    assert!(outcome.classification.signals.total >= 5);
    let keywords = &outcome.intelligence.suspicious_keywords;
    assert!(keywords.contains("otp"));
    assert!(keywords.contains("blocked"));
    // "now" is the urgency term here; it feeds urgency_score but is not
    // itself a scam-indicator keyword
    assert!(outcome.classification.signals.urgency_score >= 1);
    assert!(outcome.classification.signals.info_score >= 1);
    assert!(!keywords.contains("now"));
    assert_eq!(
        outcome.reply,
        ReplyEngine::category_reply(ReplyCategory::Credential)
    );
    // A six-digit code is neither a phone number nor an account
    assert!(outcome.intelligence.bank_accounts.is_empty());
    assert!(outcome.intelligence.phone_numbers.is_empty());
}

#[test]
fn upi_and_phone_are_disambiguated() {
    let bundle = Extractor::new(library()).extract("Please pay to rahul@paytm or call 9876543210");

    assert_eq!(
        bundle.upi_ids.iter().collect::<Vec<_>>(),
        vec!["rahul@paytm"]
    );
    assert_eq!(
        bundle.phone_numbers.iter().collect::<Vec<_>>(),
        vec!["9876543210"]
    );
    assert!(bundle.bank_accounts.is_empty());
}

#[test]
fn twelve_digit_run_is_an_account() {
    let bundle = Extractor::new(library()).extract("Deposit to account 456789012345 today");

    assert_eq!(
        bundle.bank_accounts.iter().collect::<Vec<_>>(),
        vec!["456789012345"]
    );
    assert!(bundle.phone_numbers.is_empty());
}

#[tokio::test]
async fn fraud_with_link_notifies_once_and_failure_is_invisible() {
    let notifier = Arc::new(RecordingNotifier::default());
    let orch = orchestrator_with(
        Arc::new(InMemorySessionStore::new()),
        notifier.clone(),
        NotifyPolicy::OncePerSession,
    );

    let text = "URGENT: your account is suspended. Verify immediately at http://secure-sbi.example/kyc";
    let outcome = orch.process("phish", text, None).await.unwrap();

    assert_eq!(outcome.classification.label, FraudLabel::Fraud);
    assert!(!outcome.intelligence.phishing_links.is_empty());
    assert!(outcome.notified);

    let reports = notifier.wait_for(1).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].session_id, "phish");
    assert!(reports[0].scam_detected);
    assert_eq!(reports[0].total_messages_exchanged, 2);
    assert_eq!(reports[0].extracted_intelligence, outcome.intelligence);

    // Second qualifying turn in the same session is not reported again
    let again = orch.process("phish", text, None).await.unwrap();
    assert!(!again.notified);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(notifier.reports.lock().unwrap().len(), 1);
}

#[test]
fn classification_is_deterministic_and_bounded() {
    let classifier = Classifier::new(library(), ClassifierConfig::default());
    let inputs = [
        "",
        "hello",
        "Congratulations! You won the lottery prize, claim now, send OTP, PIN, CVV and password, transfer payment deposit urgent immediate asap",
        "ok thanks bye",
        "9876543210",
    ];

    for text in inputs {
        let first = classifier.classify(text, &[]);
        let second = classifier.classify(text, &history(3));
        assert_eq!(first, second, "text {:?}", text);
        assert!(first.confidence <= 100);
    }
}

#[test]
fn extraction_dedups_repeated_text() {
    let extractor = Extractor::new(library());
    let text = "pay rahul@paytm, call +91 9876543210, visit https://bad.example/x, acct 123456789012";

    let once = extractor.extract(text);
    let twice = extractor.extract(&format!("{} {}", text, text));
    assert_eq!(once, twice);

    for phone in &once.phone_numbers {
        assert!(!once.bank_accounts.contains(phone));
    }
}

#[test]
fn fallback_reply_rotates_with_history_length() {
    let engine = ReplyEngine::new();
    let text = "the weather is nice today";
    let period = FALLBACK_REPLIES.len();

    for k in 1..=period {
        let base = engine.reply(text, &history(k));
        assert_eq!(base, engine.reply(text, &history(k + period)));
        assert_eq!(base, engine.reply(text, &history(k + 3 * period)));
    }
}
