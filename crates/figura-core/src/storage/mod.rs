//! Persistence of documents under string keys.
//!
//! Backends store whole [`Document`]s. Loading one back into an editor goes
//! through [`load_into`], which resets history the same way an import does.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::{Document, DocumentError};
use crate::normalize::Normalize;
use crate::store::DocumentStore;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Serialization(#[from] DocumentError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Document storage backend.
///
/// Native backends must be `Send + Sync`; on WASM the bounds are relaxed
/// since it is single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>>;

    /// Remove a document. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All stored keys, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Document storage backend (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>>;

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load `key` from `storage` and make it the store's design.
///
/// Selection and history are cleared, as for any import.
pub async fn load_into<S: Storage + ?Sized>(
    storage: &S,
    key: &str,
    store: &mut DocumentStore,
) -> StorageResult<()> {
    let mut document = storage.load(key).await?;
    document.normalize();
    log::info!("Opened document {} ({} elements)", key, document.len());
    store.load_design(document);
    Ok(())
}

/// Save the store's current document under `key`.
pub async fn save_from<S: Storage + ?Sized>(
    storage: &S,
    key: &str,
    store: &DocumentStore,
) -> StorageResult<()> {
    let document = store.state();
    storage.save(key, &document.document).await?;
    log::info!("Saved document {}", key);
    Ok(())
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Shape;
    use crate::geometry::Bounds;

    #[test]
    fn test_load_into_resets_history() {
        let storage = MemoryStorage::new();
        let mut source = DocumentStore::new();
        let id = source
            .edit()
            .create_shape(Shape::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0)), None);
        block_on(save_from(&storage, "design", &source)).unwrap();

        let mut target = DocumentStore::new();
        target
            .edit()
            .create_shape(Shape::rectangle(Bounds::default()), None);
        block_on(load_into(&storage, "design", &mut target)).unwrap();

        assert_eq!(target.document(), source.document());
        assert!(target.document().contains(&id));
        assert!(!target.can_undo());
        assert!(target.selection().is_none());
    }

    #[test]
    fn test_load_into_missing_key_leaves_store_alone() {
        let storage = MemoryStorage::new();
        let mut store = DocumentStore::new();
        store
            .edit()
            .create_shape(Shape::rectangle(Bounds::default()), None);

        let result = block_on(load_into(&storage, "nope", &mut store));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(store.can_undo());
        assert_eq!(store.document().len(), 1);
    }
}
