//! Service metrics
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! `prometheus` feature installs an exporter.
//!
//! # Metrics
//!
//! - `honeypot_messages_total{label}`: messages processed, by fraud label
//! - `honeypot_confidence`: histogram of reported confidence
//! - `honeypot_notifications_total{outcome}`: report deliveries by outcome

use metrics::{histogram, increment_counter};

use crate::detection::FraudLabel;

/// Outcome of one notifier delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Delivered with a success status
    Sent,
    /// Delivery returned an error
    Failed,
    /// Delivery exceeded the configured timeout
    TimedOut,
}

impl NotificationOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            NotificationOutcome::Sent => "sent",
            NotificationOutcome::Failed => "failed",
            NotificationOutcome::TimedOut => "timed_out",
        }
    }
}

/// Record one classified message
pub fn record_classification(label: FraudLabel, confidence: u8) {
    increment_counter!("honeypot_messages_total", "label" => label.as_str());
    histogram!("honeypot_confidence", confidence as f64);
}

/// Record one notifier delivery attempt
pub fn record_notification(outcome: NotificationOutcome) {
    increment_counter!("honeypot_notifications_total", "outcome" => outcome.as_str());
}

/// Installs the Prometheus exporter when the `prometheus` feature is enabled.
///
/// Safe to call without the feature; it does nothing.
///
/// # Examples
///
/// ```
/// use scambait::metrics::init_metrics_exporter;
///
/// init_metrics_exporter();
/// ```
pub fn init_metrics_exporter() {
    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let _ = builder.install().map_err(|e| {
            tracing::warn!("Failed to install Prometheus exporter: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_classification(FraudLabel::Fraud, 97);
        record_notification(NotificationOutcome::TimedOut);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(NotificationOutcome::Sent.as_str(), "sent");
        assert_eq!(NotificationOutcome::Failed.as_str(), "failed");
        assert_eq!(NotificationOutcome::TimedOut.as_str(), "timed_out");
    }
}
