//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or did not deserialize.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A loaded setting that the service cannot run with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be set")]
    MissingRequired(&'static str),

    // server
    #[error("'{0}' is not a valid bind address")]
    InvalidBindAddress(String),

    #[error("Port must be non-zero")]
    InvalidPort,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    // database
    #[error("Unsupported database scheme '{0}', expected postgres")]
    UnsupportedDatabase(String),

    #[error("Database pool needs at least one connection")]
    EmptyPool,

    // auth
    #[error("Identity provider URLs must use HTTPS in production")]
    IdentityUrlMustBeHttps,
}
