//! The key/blob persistence contract.
//!
//! Blobs are UTF-8 JSON text. Implementations only move bytes; the shape
//! of the stored document belongs to the caller. [`load_json`] and
//! [`save_json`] layer typed access on top of any adapter.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistenceError;

/// Asynchronous key/blob storage.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the blob stored at `key`. Returns `None` if nothing was saved.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, PersistenceError>> + Send;

    /// Store `blob` at `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        blob: String,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Read and deserialize the JSON document at `key`.
///
/// # Errors
///
/// Returns [`PersistenceError::Serialization`] if the stored blob is not a
/// valid `T`, or the adapter's own error if the read fails.
pub async fn load_json<T, P>(store: &P, key: &str) -> Result<Option<T>, PersistenceError>
where
    T: DeserializeOwned,
    P: PersistenceAdapter,
{
    match store.get(key).await? {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and store it at `key`.
///
/// # Errors
///
/// Returns [`PersistenceError::Serialization`] if serialization fails, or
/// the adapter's own error if the write fails.
pub async fn save_json<T, P>(store: &P, key: &str, value: &T) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
    P: PersistenceAdapter,
{
    let blob = serde_json::to_string(value)?;
    store.set(key, blob).await
}
