use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::error::{AssetError, AssetResult};

/// Timeout applied to remote poster downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a stored poster reference to image bytes.
///
/// `http://` and `https://` references are downloaded; anything else is
/// read as a local path, with an optional `file://` prefix.
#[derive(Clone, Debug)]
pub struct PosterFetcher {
    client: Client,
}

impl PosterFetcher {
    pub fn new(timeout: Duration) -> AssetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, reference: &str) -> AssetResult<Bytes> {
        let fail = |reason: String| AssetError::Fetch {
            reference: reference.to_owned(),
            reason,
        };

        if reference.starts_with("http://") || reference.starts_with("https://") {
            debug!(reference, "downloading poster");
            let response = self
                .client
                .get(reference)
                .send()
                .await
                .map_err(|e| fail(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(fail(format!("server answered {status}")));
            }
            return response.bytes().await.map_err(|e| fail(e.to_string()));
        }

        let path = reference.strip_prefix("file://").unwrap_or(reference);
        debug!(path, "reading poster from disk");
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| fail(e.to_string()))
    }
}
