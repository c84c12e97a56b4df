//! HTTP callback notifier

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{IntelligenceReport, Notifier};
use crate::error::{HoneypotError, Result};

/// Posts reports as JSON to a callback endpoint
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    callback_url: Url,
}

impl HttpNotifier {
    /// Create a notifier whose requests are bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(callback_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scambait/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            callback_url,
        })
    }

    /// Endpoint reports are posted to
    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, report: &IntelligenceReport) -> Result<()> {
        let response = self
            .client
            .post(self.callback_url.clone())
            .json(report)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(
            session_id = %report.session_id,
            status = status.as_u16(),
            "Intelligence callback sent"
        );

        if !status.is_success() {
            return Err(HoneypotError::Notifier(format!(
                "callback returned status {}",
                status
            ))
            .into());
        }

        Ok(())
    }
}
