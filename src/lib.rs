//! scambait - conversational scam honeypot library
//!
//! This library classifies inbound messages as scams, extracts payment and
//! contact intelligence from them, and produces stalling replies that keep
//! the scammer engaged.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `detection`: Pattern library, fraud classifier and intelligence extractor
//! - `reply`: Rule-based reply engine behind the `ReplySource` trait
//! - `session`: Conversation history and the `SessionStore` implementations
//! - `notifier`: Best-effort intelligence reporting
//! - `orchestrator`: The per-message pipeline tying the above together
//! - `server`: axum HTTP transport
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scambait::notifier::NoopNotifier;
//! use scambait::session::InMemorySessionStore;
//! use scambait::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let orchestrator = Orchestrator::from_config(
//!         &config,
//!         Arc::new(InMemorySessionStore::new()),
//!         Arc::new(NoopNotifier),
//!     )?;
//!     let outcome = orchestrator
//!         .process("demo", "Your account is blocked, send OTP now", None)
//!         .await?;
//!     println!("{} {}", outcome.classification.label, outcome.reply);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod detection;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod notifier;
pub mod orchestrator;
pub mod reply;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use detection::{Classifier, Extractor, FraudLabel, IntelligenceBundle, PatternLibrary};
pub use error::{HoneypotError, Result};
pub use orchestrator::{AnalysisOutcome, AnalysisResponse, Orchestrator};
