use std::sync::Arc;
use std::time::Duration;

use cinedex_assets::{CloudinaryUploader, LocalDirUploader, PosterFetcher, PosterUploader};
use cinedex_store::{JsonFileStore, RecordStore};
use cinedex_types::{MediaRecord, Record, ReviewRecord};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, ENDPOINTS};
use crate::state::AppState;

/// Cinedex HTTP server over a directory of JSON collection files.
pub struct CinedexServer {
    config: ServerConfig,
}

impl CinedexServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Pick the uploader: Cloudinary when credentials are configured,
    /// otherwise the local upload directory.
    pub fn uploader(&self) -> ServerResult<Arc<dyn PosterUploader>> {
        let uploads = &self.config.uploads;
        match &uploads.cloudinary {
            Some(cloudinary) => {
                let uploader = CloudinaryUploader::new(
                    cloudinary.clone(),
                    uploads.folder.clone(),
                    Duration::from_secs(uploads.timeout_secs),
                )?;
                Ok(Arc::new(uploader))
            }
            None => Ok(Arc::new(LocalDirUploader::new(uploads.local_dir.clone()))),
        }
    }

    /// Open the store and assemble handler state. With
    /// `storage.create_missing` the collection files are created if absent.
    pub async fn state(&self) -> ServerResult<AppState<JsonFileStore>> {
        let store = Arc::new(JsonFileStore::new(&self.config.data_dir));
        if self.config.storage.create_missing {
            for collection in [MediaRecord::COLLECTION, ReviewRecord::COLLECTION] {
                let created = store
                    .ensure_collection(collection)
                    .await
                    .map_err(cinedex_catalog::CatalogError::from)?;
                if created {
                    info!(collection, dir = %self.config.data_dir.display(), "created empty collection");
                }
            }
        }

        let uploader = self.uploader()?;
        let fetcher = PosterFetcher::new(Duration::from_secs(self.config.uploads.timeout_secs))?;
        info!(uploader = uploader.name(), "poster uploads configured");
        Ok(AppState::new(store, uploader, fetcher))
    }

    /// Build the router (useful for testing).
    pub async fn router(&self) -> ServerResult<axum::Router> {
        Ok(build_router(self.state().await?, self.config.uploads.max_bytes))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router().await?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        for (method, path) in ENDPOINTS {
            info!("{method:<7}{path}");
        }
        info!("cinedex server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
