//! Integration tests for the `guildhall-db` persistence layer.
//!
//! The memory and file backends run everywhere. The `Dragonfly` tests need
//! a live server and are marked `#[ignore]`. Run them with:
//!
//! ```bash
//! docker run -d -p 6379:6379 docker.dragonflydb.io/dragonflydb/dragonfly
//! DRAGONFLY_URL=redis://localhost:6379 cargo test -p guildhall-db -- --ignored
//! ```

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc
)]

use guildhall_db::{
    DragonflyStore, FileStore, MemoryStore, PersistenceAdapter, PersistenceError, load_json,
    save_json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Doc {
    version: u32,
    entries: Vec<String>,
}

fn doc() -> Doc {
    Doc {
        version: 1,
        entries: vec!["28,28".to_owned(), "15,15".to_owned()],
    }
}

fn dragonfly_url() -> String {
    std::env::var("DRAGONFLY_URL").unwrap_or_else(|_| "redis://localhost:6379".to_owned())
}

async fn typed_round_trip<P: PersistenceAdapter>(store: &P) {
    let missing: Option<Doc> = load_json(store, "guildhall:test").await.unwrap();
    assert!(missing.is_none());
    save_json(store, "guildhall:test", &doc()).await.unwrap();
    let loaded: Option<Doc> = load_json(store, "guildhall:test").await.unwrap();
    assert_eq!(loaded, Some(doc()));
}

#[tokio::test]
async fn memory_store_typed_round_trip() {
    typed_round_trip(&MemoryStore::new()).await;
}

#[tokio::test]
async fn file_store_typed_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    typed_round_trip(&FileStore::new(dir.path())).await;
}

#[tokio::test]
async fn corrupt_blob_surfaces_serialization_error() {
    let store = MemoryStore::new();
    store
        .set("guildhall:test", "{not json".to_owned())
        .await
        .unwrap();
    let result: Result<Option<Doc>, _> = load_json(&store, "guildhall:test").await;
    assert!(matches!(result, Err(PersistenceError::Serialization(_))));
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_json(&FileStore::new(dir.path()), "snap", &doc())
        .await
        .unwrap();
    let reopened = FileStore::new(dir.path());
    let loaded: Option<Doc> = load_json(&reopened, "snap").await.unwrap();
    assert_eq!(loaded, Some(doc()));
}

#[tokio::test]
#[ignore = "requires a live Dragonfly server"]
async fn dragonfly_round_trip() {
    let store = DragonflyStore::connect(&dragonfly_url())
        .await
        .expect("connect to Dragonfly");
    store.delete("guildhall:test").await.unwrap();
    typed_round_trip(&store).await;
    store.delete("guildhall:test").await.unwrap();
}

#[tokio::test]
async fn dragonfly_rejects_bad_url() {
    let result = DragonflyStore::connect("not a url").await;
    assert!(matches!(result, Err(PersistenceError::Config(_))));
}
