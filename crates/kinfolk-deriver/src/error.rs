//! Error types for Deriver operations

use thiserror::Error;

/// Result type alias for Deriver operations
pub type Result<T> = std::result::Result<T, DeriverError>;

/// Errors that can occur while configuring or addressing the Deriver
///
/// A derivation pass itself never fails: missing dates and missing relations
/// are skipped, not reported.
#[derive(Error, Debug)]
pub enum DeriverError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event type not present in the registry
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// Event type that does not allow derivation
    #[error("Event type is not derivable: {0}")]
    NotDerivable(String),

    /// Person not present in the ancestry
    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
