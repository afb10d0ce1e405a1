use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cinedex_types::Record;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::codec::{decode_collection, encode_collection, EMPTY_COLLECTION};
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// File-backed store: collection `name` lives in `<root>/<name>.json`.
///
/// Constructed once per process and shared; it holds no open handles, only
/// the root path.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `collection`.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn staging_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json.tmp"))
    }

    async fn write_atomically(&self, collection: &str, bytes: &[u8]) -> std::io::Result<()> {
        let staging = self.staging_path(collection);
        let mut file = fs::File::create(&staging).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&staging, self.collection_path(collection)).await
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load<R: Record>(&self, collection: &str) -> StoreResult<Vec<R>> {
        let path = self.collection_path(collection);
        let bytes = fs::read(&path)
            .await
            .map_err(|e| StoreError::unavailable(collection, e))?;
        let records = decode_collection(collection, &bytes)?;
        debug!(collection, count = records.len(), "loaded collection");
        Ok(records)
    }

    async fn save<R: Record>(&self, collection: &str, records: &[R]) -> StoreResult<()> {
        let bytes = encode_collection(collection, records)?;
        self.write_atomically(collection, &bytes)
            .await
            .map_err(|e| StoreError::unavailable(collection, e))?;
        debug!(collection, count = records.len(), "saved collection");
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> StoreResult<bool> {
        let path = self.collection_path(collection);
        if fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::unavailable(collection, e))?
        {
            return Ok(false);
        }
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::unavailable(collection, e))?;
        self.write_atomically(collection, EMPTY_COLLECTION)
            .await
            .map_err(|e| StoreError::unavailable(collection, e))?;
        debug!(collection, path = %path.display(), "created empty collection");
        Ok(true)
    }
}
