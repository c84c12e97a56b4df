//! Error types for Scambait
//!
//! This module defines the error types used throughout the honeypot,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Scambait operations
///
/// Covers configuration loading, pattern compilation, session storage,
/// and notifier delivery. Classification, extraction and reply selection
/// are infallible and never produce one of these.
#[derive(Error, Debug)]
pub enum HoneypotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pattern library errors (invalid extra keyword or handle)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Session storage errors (database operations, lock poisoning)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Notifier delivery errors (non-success status, timeout)
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Unexpected internal faults surfaced to the caller
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Regex compilation errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Scambait operations
///
/// Uses `anyhow::Error` as the error type, allowing for rich error context
/// and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = HoneypotError::Config("port must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: port must be greater than 0"
        );
    }

    #[test]
    fn test_storage_error_display() {
        let error = HoneypotError::Storage("database connection failed".to_string());
        assert_eq!(
            error.to_string(),
            "Storage error: database connection failed"
        );
    }

    #[test]
    fn test_notifier_error_display() {
        let error = HoneypotError::Notifier("callback returned 503".to_string());
        assert_eq!(error.to_string(), "Notifier error: callback returned 503");
    }

    #[test]
    fn test_internal_error_display() {
        let error = HoneypotError::Internal("session lock poisoned".to_string());
        assert_eq!(error.to_string(), "Internal error: session lock poisoned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: HoneypotError = io_error.into();
        assert!(matches!(error, HoneypotError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: HoneypotError = json_error.into();
        assert!(matches!(error, HoneypotError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: HoneypotError = yaml_error.into();
        assert!(matches!(error, HoneypotError::Yaml(_)));
    }

    #[test]
    fn test_regex_error_conversion() {
        let regex_error = regex::Regex::new("(unclosed").unwrap_err();
        let error: HoneypotError = regex_error.into();
        assert!(matches!(error, HoneypotError::Regex(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HoneypotError>();
    }
}
