//! Command-line interface definition for scambait
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to run the service, analyze messages locally and
//! inspect the pattern library.

use clap::{Parser, Subcommand};

/// scambait - conversational scam honeypot
///
/// Classifies inbound messages, extracts payment and contact intelligence,
/// and keeps the scammer talking.
#[derive(Parser, Debug, Clone)]
#[command(name = "scambait")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for scambait
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze messages locally without the HTTP service
    ///
    /// With TEXT the words form one message. Without TEXT every non-empty
    /// line on stdin is one turn of the same session.
    Analyze {
        /// Session id the turns are recorded under
        #[arg(short, long, default_value = "cli")]
        session: String,

        /// Print the JSON response shape instead of a summary
        #[arg(long)]
        json: bool,

        /// Message text
        text: Vec<String>,
    },

    /// Print the active pattern library
    Patterns,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve {
                host: None,
                port: None,
            },
        }
    }
}
