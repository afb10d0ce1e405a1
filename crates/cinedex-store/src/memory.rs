use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use cinedex_types::Record;

use crate::codec::{decode_collection, encode_collection, EMPTY_COLLECTION};
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory store holding each collection as serialized JSON.
///
/// Intended for tests and embedding. Keeping the serialized form means the
/// same codec runs as for files, so corrupt content can be simulated with
/// [`InMemoryRecordStore::put_raw`].
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<u8>>>,
    saves: AtomicUsize,
}

impl InMemoryRecordStore {
    /// Create a store with no collections at all.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            saves: AtomicUsize::new(0),
        }
    }

    /// Create a store with the given collections present and empty.
    pub fn with_collections(names: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut map = store.collections.write().expect("lock poisoned");
            for name in names {
                map.insert((*name).to_owned(), EMPTY_COLLECTION.to_vec());
            }
        }
        store
    }

    /// Replace a collection's raw content.
    pub fn put_raw(&self, collection: &str, bytes: impl Into<Vec<u8>>) {
        self.collections
            .write()
            .expect("lock poisoned")
            .insert(collection.to_owned(), bytes.into());
    }

    /// Raw content of a collection, if present.
    pub fn raw(&self, collection: &str) -> Option<Vec<u8>> {
        self.collections
            .read()
            .expect("lock poisoned")
            .get(collection)
            .cloned()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load<R: Record>(&self, collection: &str) -> StoreResult<Vec<R>> {
        let bytes = self.raw(collection).ok_or_else(|| {
            StoreError::unavailable(
                collection,
                io::Error::new(io::ErrorKind::NotFound, "collection does not exist"),
            )
        })?;
        decode_collection(collection, &bytes)
    }

    async fn save<R: Record>(&self, collection: &str, records: &[R]) -> StoreResult<()> {
        let bytes = encode_collection(collection, records)?;
        self.put_raw(collection, bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> StoreResult<bool> {
        let mut map = self.collections.write().expect("lock poisoned");
        if map.contains_key(collection) {
            return Ok(false);
        }
        map.insert(collection.to_owned(), EMPTY_COLLECTION.to_vec());
        Ok(true)
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.collections.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryRecordStore")
            .field("collection_count", &count)
            .field("saves", &self.save_count())
            .finish()
    }
}
