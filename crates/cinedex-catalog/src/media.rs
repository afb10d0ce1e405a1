use std::sync::Arc;

use cinedex_store::RecordStore;
use cinedex_types::{MediaRecord, Payload};
use tracing::{info, warn};

use crate::collection::Collection;
use crate::error::CatalogResult;

/// Outcome of [`MediaCatalog::attach_poster`].
#[derive(Clone, Debug, PartialEq)]
pub enum PosterAttachment {
    /// The poster reference was stored on this record.
    Attached(MediaRecord),
    /// No record had the id. Nothing was written; this is not an error.
    Unmatched,
}

/// The media collection plus the poster-attach operation.
pub struct MediaCatalog<S> {
    media: Collection<MediaRecord, S>,
}

impl<S: RecordStore> MediaCatalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            media: Collection::new(store),
        }
    }

    pub async fn create(&self, payload: Payload) -> CatalogResult<MediaRecord> {
        self.media.create(payload).await
    }

    pub async fn list_all(&self) -> CatalogResult<Vec<MediaRecord>> {
        self.media.list_all().await
    }

    pub async fn get(&self, id: &str) -> CatalogResult<MediaRecord> {
        self.media.get(id).await
    }

    pub async fn update(&self, id: &str, patch: Payload) -> CatalogResult<MediaRecord> {
        self.media.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        self.media.delete(id).await
    }

    /// Store an uploaded poster reference on the matching record.
    ///
    /// Unlike every other mutation, an unknown id is not an error: the call
    /// succeeds with [`PosterAttachment::Unmatched`] and the collection is
    /// left untouched.
    pub async fn attach_poster(&self, id: &str, poster_ref: &str) -> CatalogResult<PosterAttachment> {
        let poster = poster_ref.to_owned();
        match self.media.modify(id, move |m| m.poster = Some(poster)).await? {
            Some(record) => {
                info!(id, poster = poster_ref, "attached poster");
                Ok(PosterAttachment::Attached(record))
            }
            None => {
                warn!(id, "poster uploaded for unknown media; nothing attached");
                Ok(PosterAttachment::Unmatched)
            }
        }
    }
}
