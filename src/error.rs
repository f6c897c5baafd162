//! ChatShield error types

use thiserror::Error;

/// ChatShield error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pattern compilation or matching error
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Violation tracker error
    #[error("Tracker error: {0}")]
    Tracker(String),

    /// Service error
    #[error("Service error: {0}")]
    Service(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ChatShield operations
pub type Result<T> = std::result::Result<T, Error>;
