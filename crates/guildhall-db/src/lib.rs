//! Persistence layer for Guildhall occupancy snapshots.
//!
//! The governance service saves its occupancy state as one JSON blob under
//! a single key. This crate defines the key/blob contract and the backends
//! that satisfy it.
//!
//! # Modules
//!
//! - [`adapter`] -- The [`PersistenceAdapter`] trait and typed JSON helpers
//! - [`memory`] -- In-process store for tests and ephemeral runs
//! - [`file`] -- One file per key with atomic replace
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) store
//! - [`store`] -- Backend selection at startup
//! - [`error`] -- Shared error types

pub mod adapter;
pub mod dragonfly;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

// Re-export primary types for convenience.
pub use adapter::{PersistenceAdapter, load_json, save_json};
pub use dragonfly::DragonflyStore;
pub use error::PersistenceError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{ConfiguredStore, PersistenceBackend};
