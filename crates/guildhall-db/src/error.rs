//! Error types for the persistence layer.
//!
//! All errors are propagated via [`PersistenceError`] which wraps the
//! underlying I/O, [`serde_json`], and [`fred`] errors.

/// Errors that can occur while loading or saving a blob.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
