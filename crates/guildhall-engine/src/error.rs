//! Error types for the Guildhall engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and shutdown.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: guildhall_governance::ConfigError,
    },

    /// World artifact serialization failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: guildhall_world::WorldError,
    },

    /// The persistence backend could not be opened.
    #[error("persistence error: {source}")]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: guildhall_db::PersistenceError,
    },

    /// Writing the world artifact failed.
    #[error("failed to write {path}: {source}")]
    Export {
        /// Destination that could not be written.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The periodic flush task panicked or was cancelled.
    #[error("flush task failed: {message}")]
    FlushTask {
        /// Description of the join failure.
        message: String,
    },
}
