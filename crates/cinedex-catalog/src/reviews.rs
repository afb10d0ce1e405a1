use std::sync::Arc;

use cinedex_store::RecordStore;
use cinedex_types::{fields, Payload, ReviewRecord};
use serde_json::Value;

use crate::collection::Collection;
use crate::error::CatalogResult;

/// Reviews, linked to media records by a `parent_id` back-reference.
///
/// The link is not enforced: creating a review under an unknown media id
/// succeeds, and deleting a media record keeps its reviews. Single-review
/// operations look reviews up by their own id only.
pub struct ReviewBoard<S> {
    reviews: Collection<ReviewRecord, S>,
}

impl<S: RecordStore> ReviewBoard<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            reviews: Collection::new(store),
        }
    }

    /// Create a review under `parent_id`. The parent reference in the
    /// payload, if any, is replaced.
    pub async fn create(&self, parent_id: &str, payload: Payload) -> CatalogResult<ReviewRecord> {
        let mut assigned = Payload::new();
        assigned.insert(fields::PARENT_ID.to_owned(), Value::String(parent_id.to_owned()));
        self.reviews.create_with(payload, assigned).await
    }

    /// Every review of every media record.
    pub async fn list_all(&self) -> CatalogResult<Vec<ReviewRecord>> {
        self.reviews.list_all().await
    }

    /// Reviews whose parent reference is `parent_id`, in storage order.
    pub async fn list_for(&self, parent_id: &str) -> CatalogResult<Vec<ReviewRecord>> {
        let mut reviews = self.reviews.list_all().await?;
        reviews.retain(|r| r.parent_id == parent_id);
        Ok(reviews)
    }

    pub async fn get(&self, id: &str) -> CatalogResult<ReviewRecord> {
        self.reviews.get(id).await
    }

    pub async fn update(&self, id: &str, patch: Payload) -> CatalogResult<ReviewRecord> {
        self.reviews.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        self.reviews.delete(id).await
    }
}
