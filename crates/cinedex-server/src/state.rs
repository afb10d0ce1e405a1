use std::sync::Arc;

use cinedex_assets::{PosterFetcher, PosterUploader};
use cinedex_catalog::{MediaCatalog, ReviewBoard};
use cinedex_store::RecordStore;

/// Shared handler state. Both collections sit on the same store.
pub struct AppState<S> {
    pub media: Arc<MediaCatalog<S>>,
    pub reviews: Arc<ReviewBoard<S>>,
    pub uploader: Arc<dyn PosterUploader>,
    pub fetcher: PosterFetcher,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(store: Arc<S>, uploader: Arc<dyn PosterUploader>, fetcher: PosterFetcher) -> Self {
        Self {
            media: Arc::new(MediaCatalog::new(store.clone())),
            reviews: Arc::new(ReviewBoard::new(store)),
            uploader,
            fetcher,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            media: self.media.clone(),
            reviews: self.reviews.clone(),
            uploader: self.uploader.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}
