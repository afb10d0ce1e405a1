use cinedex_store::StoreError;
use cinedex_types::TypeError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors from collection operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record with this id exists in the collection.
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },

    /// The payload does not have the shape the record requires.
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// Storage failure (unavailable or corrupt collection).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub(crate) fn not_found(collection: &'static str, id: &str) -> Self {
        Self::NotFound {
            collection,
            id: id.to_owned(),
        }
    }

    /// Stable, machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Store(StoreError::StorageUnavailable { .. }) => "storage_unavailable",
            Self::Store(StoreError::CorruptData { .. }) => "corrupt_data",
            Self::Store(StoreError::Serialization { .. }) | Self::Internal(_) => "internal",
        }
    }
}

impl From<TypeError> for CatalogError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::Shape { reason, .. } => {
                Self::ValidationFailed(ValidationErrors::single("body", reason))
            }
            TypeError::Encode { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed(errors)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
