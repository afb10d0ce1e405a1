use async_trait::async_trait;
use cinedex_types::Record;

use crate::error::StoreResult;

/// Durable load and save of whole named collections.
///
/// All implementations must satisfy these invariants:
/// - `load` returns records in storage order.
/// - `save` replaces the whole collection; readers see either the old or the
///   new content, never a mix.
/// - A missing collection is `StorageUnavailable` on `load`; undecodable
///   content is `CorruptData`.
/// - No locking. Concurrent cycles race and the last `save` wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the full collection.
    async fn load<R: Record>(&self, collection: &str) -> StoreResult<Vec<R>>;

    /// Overwrite the full collection.
    async fn save<R: Record>(&self, collection: &str, records: &[R]) -> StoreResult<()>;

    /// Create the collection empty if it does not exist yet.
    ///
    /// Returns `true` when the collection was created.
    async fn ensure_collection(&self, collection: &str) -> StoreResult<bool>;
}
