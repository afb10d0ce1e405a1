/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The collection file is missing, unreadable or unwritable.
    #[error("collection {collection} is unavailable: {source}")]
    StorageUnavailable {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// The collection content is not a sequence of valid records.
    #[error("collection {collection} is corrupt: {reason}")]
    CorruptData { collection: String, reason: String },

    /// Records could not be serialized for writing.
    #[error("cannot serialize collection {collection}: {reason}")]
    Serialization { collection: String, reason: String },
}

impl StoreError {
    pub(crate) fn unavailable(collection: &str, source: std::io::Error) -> Self {
        Self::StorageUnavailable {
            collection: collection.to_owned(),
            source,
        }
    }

    pub(crate) fn corrupt(collection: &str, reason: impl Into<String>) -> Self {
        Self::CorruptData {
            collection: collection.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
