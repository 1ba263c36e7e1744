//! Error types for the Delve core engine.
//!
//! Generation-time anomalies (a blocked branch, no legal key spot, a garbled
//! description batch) are deliberately NOT errors — they degrade gracefully
//! inside the generator. These variants cover the genuinely fatal cases:
//! bad configuration and broken persistence.

use thiserror::Error;

/// Top-level error type for all Delve core operations.
#[derive(Error, Debug)]
pub enum DelveError {
    /// Configuration could not be parsed or is internally inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A zone with the given name was not found in the world.
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// A location with the given name was not found.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// A save file could not be serialized or deserialized.
    #[error("Save format error: {0}")]
    Save(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, DelveError>;
