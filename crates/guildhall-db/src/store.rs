//! Runtime backend selection.
//!
//! [`PersistenceAdapter`] returns `impl Future`, so it cannot be used as a
//! trait object. [`ConfiguredStore`] closes over the three backends instead
//! and dispatches statically.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::adapter::PersistenceAdapter;
use crate::dragonfly::DragonflyStore;
use crate::error::PersistenceError;
use crate::file::FileStore;
use crate::memory::MemoryStore;

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    /// Keep snapshots in memory only.
    Memory,
    /// One JSON file per key under a data directory.
    #[default]
    File,
    /// A `Dragonfly`/Redis server.
    Dragonfly,
}

/// A store chosen at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    /// In-memory backend.
    Memory(MemoryStore),
    /// File backend.
    File(FileStore),
    /// `Dragonfly` backend.
    Dragonfly(DragonflyStore),
}

impl ConfiguredStore {
    /// Open the backend named by `backend`.
    ///
    /// `dir` is used by the file backend, `dragonfly_url` by the
    /// `Dragonfly` backend.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the `Dragonfly` connection fails.
    pub async fn open(
        backend: PersistenceBackend,
        dir: impl Into<PathBuf>,
        dragonfly_url: &str,
    ) -> Result<Self, PersistenceError> {
        let store = match backend {
            PersistenceBackend::Memory => Self::Memory(MemoryStore::new()),
            PersistenceBackend::File => Self::File(FileStore::new(dir)),
            PersistenceBackend::Dragonfly => {
                Self::Dragonfly(DragonflyStore::connect(dragonfly_url).await?)
            }
        };
        tracing::info!(backend = store.backend(), "persistence backend ready");
        Ok(store)
    }
}

impl PersistenceAdapter for ConfiguredStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
            Self::Dragonfly(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), PersistenceError> {
        match self {
            Self::Memory(store) => store.set(key, blob).await,
            Self::File(store) => store.set(key, blob).await,
            Self::Dragonfly(store) => store.set(key, blob).await,
        }
    }

    fn backend(&self) -> &'static str {
        match self {
            Self::Memory(store) => store.backend(),
            Self::File(store) => store.backend(),
            Self::Dragonfly(store) => store.backend(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_local_backends_without_a_server() {
        let dir = tempfile::tempdir().unwrap();
        let memory = ConfiguredStore::open(PersistenceBackend::Memory, dir.path(), "")
            .await
            .unwrap();
        assert_eq!(memory.backend(), "memory");

        let file = ConfiguredStore::open(PersistenceBackend::File, dir.path(), "")
            .await
            .unwrap();
        file.set("k", "v".to_owned()).await.unwrap();
        assert_eq!(file.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn backend_names_are_lowercase() {
        let parsed: PersistenceBackend = serde_json::from_str("\"dragonfly\"").unwrap();
        assert_eq!(parsed, PersistenceBackend::Dragonfly);
        assert_eq!(PersistenceBackend::default(), PersistenceBackend::File);
    }
}
