//! scambait - conversational scam honeypot
//!
#![doc = "scambait - conversational scam honeypot"]
#![doc = "Main entry point for the scambait service and CLI."]

use anyhow::Result;

use scambait::cli::{Cli, Commands};
use scambait::commands;
use scambait::config::Config;
use scambait::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Logging depends on the loaded configuration
    init_logging(&config.logging)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!(
                "Starting HTTP service on {}:{}",
                config.server.host,
                config.server.port
            );
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Analyze {
            session,
            json,
            text,
        } => {
            tracing::debug!(session = %session, json, "Starting local analysis");
            commands::analyze::run_analyze(config, session, json, text).await?;
            Ok(())
        }
        Commands::Patterns => {
            commands::patterns::run_patterns(&config)?;
            Ok(())
        }
    }
}
