//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid temperature: {0} (must be between 0 and 2)")]
    InvalidTemperature(f32),

    #[error("Invalid minimum confidence: {0} (must be between 0 and 1)")]
    InvalidConfidence(f64),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Sessions directory must not be empty")]
    EmptySessionsDir,
}
