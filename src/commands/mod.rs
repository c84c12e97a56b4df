/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `serve`    — Run the HTTP service
- `analyze`  — Run messages through the pipeline locally
- `patterns` — Print the active pattern library
*/

use crate::config::Config;
use crate::error::Result;
use crate::notifier::NoopNotifier;
use crate::orchestrator::{AnalysisOutcome, AnalysisResponse, Orchestrator};
use crate::session::InMemorySessionStore;
use std::io::{BufRead, Write};
use std::sync::Arc;

// Serve command handler
pub mod serve {
    //! HTTP service handler.
    //!
    //! Builds the session store, notifier and orchestrator from
    //! configuration and runs the axum server until Ctrl-C.

    use super::*;
    use crate::notifier::create_notifier;
    use crate::session::create_store;

    /// Run the HTTP service
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub async fn run_serve(config: Config) -> Result<()> {
        crate::metrics::init_metrics_exporter();

        let store = create_store(&config.session)?;
        let notifier = create_notifier(&config.notifier)?;
        let orchestrator = Arc::new(Orchestrator::from_config(&config, store, notifier)?);

        tracing::info!(
            backend = ?config.session.backend,
            notifier_enabled = config.notifier.enabled,
            policy = ?config.notifier.policy,
            "Starting scam honeypot service"
        );

        crate::server::serve(&config, orchestrator).await
    }
}

// Analyze command handler
pub mod analyze {
    //! Local analysis handler.
    //!
    //! Runs the orchestrator against an in-memory store with reporting
    //! disabled, so results match what the service would return.

    use super::*;

    /// Analyze one message, or every stdin line when `text` is empty
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Session id the turns are recorded under
    /// * `json` - Print the JSON response shape instead of a summary
    /// * `text` - Message words; empty means read stdin
    pub async fn run_analyze(
        config: Config,
        session: String,
        json: bool,
        text: Vec<String>,
    ) -> Result<()> {
        let orchestrator = local_orchestrator(&config)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if text.is_empty() {
            tracing::debug!("Reading turns from stdin");
            let stdin = std::io::stdin();
            analyze_lines(&orchestrator, &session, json, stdin.lock(), &mut out).await
        } else {
            let message = text.join(" ");
            let outcome = orchestrator.process(&session, &message, None).await?;
            write_outcome(&mut out, &outcome, json)
        }
    }

    /// Build an orchestrator that records nothing outside the process
    pub fn local_orchestrator(config: &Config) -> Result<Orchestrator> {
        Orchestrator::from_config(
            config,
            Arc::new(InMemorySessionStore::new()),
            Arc::new(NoopNotifier),
        )
    }

    /// Process every non-empty line of `input` as one turn of `session`
    pub async fn analyze_lines<R: BufRead, W: Write>(
        orchestrator: &Orchestrator,
        session: &str,
        json: bool,
        input: R,
        out: &mut W,
    ) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            let outcome = orchestrator.process(session, message, None).await?;
            write_outcome(out, &outcome, json)?;
        }
        Ok(())
    }

    /// Print one outcome as a JSON line or a short summary
    pub fn write_outcome<W: Write>(out: &mut W, outcome: &AnalysisOutcome, json: bool) -> Result<()> {
        if json {
            let body = serde_json::to_string(&AnalysisResponse::from(outcome))?;
            writeln!(out, "{}", body)?;
            return Ok(());
        }

        let c = &outcome.classification;
        writeln!(out, "[{} {}%] {}", c.label, c.confidence, outcome.reply)?;

        let intel = &outcome.intelligence;
        let fields = [
            ("bank accounts", &intel.bank_accounts),
            ("upi ids", &intel.upi_ids),
            ("phishing links", &intel.phishing_links),
            ("phone numbers", &intel.phone_numbers),
            ("keywords", &intel.suspicious_keywords),
        ];
        for (name, values) in fields {
            if !values.is_empty() {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                writeln!(out, "  {}: {}", name, joined.join(", "))?;
            }
        }
        Ok(())
    }
}

// Patterns command handler
pub mod patterns {
    //! Pattern library listing.

    use super::*;
    use crate::detection::PatternLibrary;

    /// Print every phrase family and the UPI handle fragments
    pub fn run_patterns(config: &Config) -> Result<()> {
        let library = PatternLibrary::with_extras(&config.patterns)?;
        let stdout = std::io::stdout();
        write_library(&mut stdout.lock(), &library)
    }

    /// Write the library in a stable, human-readable layout
    pub fn write_library<W: Write>(out: &mut W, library: &PatternLibrary) -> Result<()> {
        let families: [(&str, &[String]); 6] = [
            ("Scam keywords", library.scam_keywords()),
            ("Urgency", library.urgency()),
            ("Financial", library.financial()),
            ("Credential", library.credential()),
            ("Safe indicators", library.safe()),
            ("UPI handles", library.upi_handles()),
        ];

        for (name, phrases) in families {
            writeln!(out, "{} ({}):", name, phrases.len())?;
            writeln!(out, "  {}", phrases.join(", "))?;
        }
        Ok(())
    }
}
