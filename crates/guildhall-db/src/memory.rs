//! In-process store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::adapter::PersistenceAdapter;
use crate::error::PersistenceError;

/// Blob store backed by a shared in-memory map.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// a service saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl PersistenceAdapter for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), PersistenceError> {
        self.entries.write().await.insert(key.to_owned(), blob);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
