//! Configuration management for Scambait
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{HoneypotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Scambait
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Request authentication
    #[serde(default)]
    pub auth: AuthConfig,
    /// Scoring weights and thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Additions to the built-in pattern library
    #[serde(default)]
    pub patterns: PatternConfig,
    /// Outbound intelligence reporting
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Session storage backend
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Request authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected value of the `x-api-key` header
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_key() -> String {
    "demo123".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

/// Classifier weights, thresholds and confidence constants
///
/// Defaults reproduce the tiered policy: weighted total of at least 5 is
/// high-confidence fraud, 2 to 4 is fraud, zero with more benign than scam
/// phrases is safe, anything else is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Weight of general scam-indicator matches
    pub scam_weight: u32,
    /// Weight of urgency matches
    pub urgency_weight: u32,
    /// Weight of money-movement matches
    pub financial_weight: u32,
    /// Weight of credential-request matches
    pub credential_weight: u32,
    /// Weighted total at or above which the high fraud tier applies
    pub fraud_high_threshold: u32,
    /// Weighted total at or above which the message is fraud
    pub fraud_low_threshold: u32,
    /// High tier confidence base
    pub high_base: u32,
    /// High tier confidence per point of total
    pub high_step: u32,
    /// High tier confidence ceiling
    pub high_cap: u32,
    /// Low tier confidence base
    pub low_base: u32,
    /// Low tier confidence per point of total
    pub low_step: u32,
    /// Confidence reported for safe messages
    pub safe_confidence: u32,
    /// Unknown tier confidence base
    pub unknown_base: u32,
    /// Unknown tier confidence per scam-indicator match
    pub unknown_step: u32,
}

/// Upper bound for classifier weights and confidence steps
pub const MAX_CLASSIFIER_WEIGHT: u32 = 100;

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            scam_weight: 1,
            urgency_weight: 1,
            financial_weight: 2,
            credential_weight: 3,
            fraud_high_threshold: 5,
            fraud_low_threshold: 2,
            high_base: 85,
            high_step: 2,
            high_cap: 99,
            low_base: 60,
            low_step: 5,
            safe_confidence: 80,
            unknown_base: 40,
            unknown_step: 10,
        }
    }
}

/// Extra phrases merged into the built-in pattern library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Additional scam-indicator phrases
    #[serde(default)]
    pub extra_scam_keywords: Vec<String>,

    /// Additional UPI handle fragments
    #[serde(default)]
    pub extra_upi_handles: Vec<String>,
}

/// When the notifier fires for a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// First qualifying message of a session only
    #[default]
    OncePerSession,
    /// Every qualifying message
    PerMessage,
}

impl std::str::FromStr for NotifyPolicy {
    type Err = HoneypotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once_per_session" | "once" => Ok(NotifyPolicy::OncePerSession),
            "per_message" => Ok(NotifyPolicy::PerMessage),
            other => Err(HoneypotError::Config(format!(
                "Invalid notify policy: {}. Must be one of: once_per_session, per_message",
                other
            ))),
        }
    }
}

/// Outbound intelligence reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Whether reports are sent at all
    #[serde(default = "default_notifier_enabled")]
    pub enabled: bool,

    /// Endpoint receiving the JSON report
    #[serde(default = "default_callback_url")]
    pub callback_url: String,

    /// Upper bound on one delivery attempt (seconds)
    #[serde(default = "default_notifier_timeout")]
    pub timeout_seconds: u64,

    /// Fire once per session or on every qualifying message
    #[serde(default)]
    pub policy: NotifyPolicy,
}

fn default_notifier_enabled() -> bool {
    true
}

fn default_callback_url() -> String {
    "https://hackathon.guvi.in/api/updateHoneyPotFinalResult".to_string()
}

fn default_notifier_timeout() -> u64 {
    5
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifier_enabled(),
            callback_url: default_callback_url(),
            timeout_seconds: default_notifier_timeout(),
            policy: NotifyPolicy::default(),
        }
    }
}

/// Session storage backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// SQLite database file
    Sqlite,
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Which backend to use
    #[serde(default)]
    pub backend: SessionBackend,

    /// Database path for the SQLite backend (defaults to the user data dir)
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Level filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,

    /// Optional file receiving a copy of the log output
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| HoneypotError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| HoneypotError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Legacy names first so the prefixed ones win
        if let Ok(api_key) = std::env::var("API_KEY") {
            self.auth.api_key = api_key;
        }
        if let Ok(api_key) = std::env::var("SCAMBAIT_API_KEY") {
            self.auth.api_key = api_key;
        }

        for name in ["PORT", "SCAMBAIT_PORT"] {
            if let Ok(port) = std::env::var(name) {
                match port.parse() {
                    Ok(value) => self.server.port = value,
                    Err(_) => tracing::warn!("Invalid {}: {}", name, port),
                }
            }
        }

        if let Ok(host) = std::env::var("SCAMBAIT_HOST") {
            self.server.host = host;
        }

        if let Ok(url) = std::env::var("SCAMBAIT_CALLBACK_URL") {
            tracing::debug!(callback_url = %url, "Env override: SCAMBAIT_CALLBACK_URL");
            self.notifier.callback_url = url;
        }

        if let Ok(enabled) = std::env::var("SCAMBAIT_NOTIFIER_ENABLED") {
            match enabled.parse::<bool>() {
                Ok(v) => self.notifier.enabled = v,
                Err(_) => {
                    tracing::warn!("Invalid value for SCAMBAIT_NOTIFIER_ENABLED: {}", enabled)
                }
            }
        }

        if let Ok(policy) = std::env::var("SCAMBAIT_NOTIFY_POLICY") {
            match policy.parse::<NotifyPolicy>() {
                Ok(v) => self.notifier.policy = v,
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if let Ok(backend) = std::env::var("SCAMBAIT_SESSION_BACKEND") {
            self.session.backend = match backend.to_lowercase().as_str() {
                "memory" => SessionBackend::Memory,
                "sqlite" => SessionBackend::Sqlite,
                _ => {
                    tracing::warn!("Invalid session backend: {}, keeping current", backend);
                    self.session.backend
                }
            };
        }

        if let Ok(db_path) = std::env::var("SCAMBAIT_SESSION_DB") {
            self.session.sqlite_path = Some(PathBuf::from(db_path));
        }

        if let Ok(level) = std::env::var("SCAMBAIT_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json_logs) = std::env::var("SCAMBAIT_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => tracing::warn!("Invalid value for SCAMBAIT_JSON_LOGS: {}", json_logs),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        if let crate::cli::Commands::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.auth.api_key.trim().is_empty() {
            return Err(HoneypotError::Config("auth.api_key cannot be empty".to_string()).into());
        }

        if self.server.port == 0 {
            return Err(
                HoneypotError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        if self.notifier.timeout_seconds == 0 {
            return Err(HoneypotError::Config(
                "notifier.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.notifier.enabled {
            url::Url::parse(&self.notifier.callback_url).map_err(|e| {
                HoneypotError::Config(format!(
                    "notifier.callback_url is not a valid URL: {}",
                    e
                ))
            })?;
        }

        let c = &self.classifier;
        if c.fraud_low_threshold == 0 {
            return Err(HoneypotError::Config(
                "classifier.fraud_low_threshold must be greater than 0".to_string(),
            )
            .into());
        }

        if c.fraud_low_threshold >= c.fraud_high_threshold {
            return Err(HoneypotError::Config(
                "classifier.fraud_low_threshold must be less than fraud_high_threshold"
                    .to_string(),
            )
            .into());
        }

        let weights = [
            ("scam_weight", c.scam_weight),
            ("urgency_weight", c.urgency_weight),
            ("financial_weight", c.financial_weight),
            ("credential_weight", c.credential_weight),
            ("high_step", c.high_step),
            ("low_step", c.low_step),
            ("unknown_step", c.unknown_step),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, v)| *v > MAX_CLASSIFIER_WEIGHT) {
            return Err(HoneypotError::Config(format!(
                "classifier.{} must be at most {}, got {}",
                name, MAX_CLASSIFIER_WEIGHT, value
            ))
            .into());
        }

        let constants = [
            ("high_base", c.high_base),
            ("high_cap", c.high_cap),
            ("low_base", c.low_base),
            ("safe_confidence", c.safe_confidence),
            ("unknown_base", c.unknown_base),
        ];
        if let Some((name, value)) = constants.iter().find(|(_, v)| *v > 100) {
            return Err(HoneypotError::Config(format!(
                "classifier.{} must be at most 100, got {}",
                name, value
            ))
            .into());
        }

        Ok(())
    }
}
