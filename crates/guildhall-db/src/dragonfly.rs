//! `Dragonfly` (Redis-compatible) blob store.
//!
//! Each key maps to a plain string value holding the JSON blob.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `guildhall:occupancy` | JSON | Occupancy snapshot (default key) |

use fred::prelude::*;

use crate::adapter::PersistenceAdapter;
use crate::error::PersistenceError;

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`]; clones share the connection.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Config`] if the URL cannot be parsed.
    /// Returns [`PersistenceError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, PersistenceError> {
        let config = Config::from_url(url)
            .map_err(|e| PersistenceError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Delete a key.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Dragonfly`] if the delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), PersistenceError> {
        let _: u32 = self.client.del(key).await?;
        Ok(())
    }
}

impl PersistenceAdapter for DragonflyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), PersistenceError> {
        let _: () = self.client.set(key, blob.as_str(), None, None, false).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "dragonfly"
    }
}

impl std::fmt::Debug for DragonflyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragonflyStore").finish_non_exhaustive()
    }
}
