//! Error handling for ZapOfertas
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the ZapOfertas application
#[derive(Error, Debug)]
pub enum ZapOfertasError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Category could not be resolved: {name}")]
    CategoryResolution { name: String },

    #[error("Offers upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Messaging channel error: {0}")]
    Channel(String),

    #[error("No active message template configured")]
    TemplateNotFound,

    #[error("A dispatch batch is already in progress")]
    BatchInProgress,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for ZapOfertas operations
pub type Result<T> = std::result::Result<T, ZapOfertasError>;

impl ZapOfertasError {
    /// Check if the error is recoverable at the next scheduler tick
    pub fn is_recoverable(&self) -> bool {
        match self {
            ZapOfertasError::Database(_) => false,
            ZapOfertasError::Migration(_) => false,
            ZapOfertasError::Http(_) => true,
            ZapOfertasError::Config(_) => false,
            ZapOfertasError::CategoryResolution { .. } => false,
            ZapOfertasError::Upstream { .. } => true,
            ZapOfertasError::Channel(_) => true,
            ZapOfertasError::TemplateNotFound => false,
            ZapOfertasError::BatchInProgress => true,
            ZapOfertasError::InvalidInput(_) => false,
            ZapOfertasError::Serialization(_) => false,
            ZapOfertasError::Io(_) => true,
            ZapOfertasError::UrlParse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_and_channel_errors_are_recoverable() {
        let upstream = ZapOfertasError::Upstream {
            status: 503,
            message: "service unavailable".to_string(),
        };
        assert!(upstream.is_recoverable());
        assert!(ZapOfertasError::Channel("disconnected".to_string()).is_recoverable());
    }

    #[test]
    fn configuration_errors_are_fatal() {
        assert!(!ZapOfertasError::TemplateNotFound.is_recoverable());
        assert!(!ZapOfertasError::Config("missing app_id".to_string()).is_recoverable());
    }
}
