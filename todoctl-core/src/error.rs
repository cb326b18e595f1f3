//! Structured error types for the connection bootstrap.
//!
//! The binary (todoctl-cli) wraps these in `anyhow` and turns them into a
//! non-zero exit; library consumers can match on the variants.

use std::io;
use thiserror::Error;

/// Errors that stop the bootstrap before a handle is published
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The connection string variable is unset or blank
    #[error("{var} not found in environment")]
    MissingDatabaseUrl { var: String },

    /// The single connection attempt failed (bad URL, unreachable host, auth)
    #[error("Failed to connect to database at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// Bootstrap configuration file could not be parsed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

impl BootstrapError {
    pub fn missing_database_url(var: impl Into<String>) -> Self {
        Self::MissingDatabaseUrl { var: var.into() }
    }

    /// `url` must already be redacted; see [`crate::redact_url`]
    pub fn connect(url: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connect {
            url: url.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when bootstrap stopped before any connection attempt
    pub fn is_missing_url(&self) -> bool {
        matches!(self, Self::MissingDatabaseUrl { .. })
    }
}
