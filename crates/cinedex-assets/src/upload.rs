use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{AssetError, AssetResult};

/// Default folder uploads are filed under.
pub const DEFAULT_FOLDER: &str = "cinedex/media";

/// An image received from a client, ready to hand to an uploader.
#[derive(Clone, Debug)]
pub struct PosterUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Stores an image somewhere stable and returns a reference to it.
///
/// The reference is opaque to the catalog; it is stored as-is in the media
/// record's `poster` field and later handed back to a
/// [`PosterFetcher`](crate::PosterFetcher).
#[async_trait]
pub trait PosterUploader: Send + Sync {
    async fn upload(&self, upload: PosterUpload) -> AssetResult<String>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Cloudinary
// ---------------------------------------------------------------------------

/// Credentials for a Cloudinary account.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    /// Parse a `cloudinary://<api_key>:<api_secret>@<cloud_name>` URL.
    pub fn from_url(url: &str) -> AssetResult<Self> {
        let invalid = || AssetError::Config("expected cloudinary://<key>:<secret>@<cloud>".into());
        let rest = url.trim().strip_prefix("cloudinary://").ok_or_else(invalid)?;
        let (credentials, cloud_name) = rest.rsplit_once('@').ok_or_else(invalid)?;
        let (api_key, api_secret) = credentials.split_once(':').ok_or_else(invalid)?;
        if api_key.is_empty() || api_secret.is_empty() || cloud_name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            cloud_name: cloud_name.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            api_secret: api_secret.to_owned(),
        })
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryErrorBody>,
}

#[derive(Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Uploads posters to Cloudinary with a signed request.
pub struct CloudinaryUploader {
    client: Client,
    config: CloudinaryConfig,
    folder: String,
    endpoint: String,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig, folder: impl Into<String>, timeout: Duration) -> AssetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Config(format!("cannot build HTTP client: {e}")))?;
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );
        Ok(Self {
            client,
            config,
            folder: folder.into(),
            endpoint,
        })
    }

    /// Point the uploader at a different upload URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }
}

/// Signature over the signed parameters: sorted `key=value` pairs joined by
/// `&`, followed by the API secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl PosterUploader for CloudinaryUploader {
    async fn upload(&self, upload: PosterUpload) -> AssetResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let signature = sign_params(
            &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let mut part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| AssetError::Upload(format!("bad content type {content_type}: {e}")))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!(file = %upload.file_name, size = upload.bytes.len(), "uploading poster to cloudinary");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::Upload(e.to_string()))?;

        let status = response.status();
        let body: CloudinaryResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Upload(format!("unreadable response ({status}): {e}")))?;

        match (body.secure_url, body.error) {
            (Some(url), _) if status.is_success() => {
                info!(url = %url, "poster uploaded");
                Ok(url)
            }
            (_, Some(err)) => Err(AssetError::Upload(format!("{status}: {}", err.message))),
            _ => Err(AssetError::Upload(format!("{status}: response has no secure_url"))),
        }
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// Writes posters into a local directory. Used when no cloud credentials
/// are configured.
#[derive(Clone, Debug)]
pub struct LocalDirUploader {
    dir: PathBuf,
}

impl LocalDirUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PosterUploader for LocalDirUploader {
    async fn upload(&self, upload: PosterUpload) -> AssetResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        let path = self
            .dir
            .join(format!("{}{extension}", uuid::Uuid::now_v7().simple()));

        tokio::fs::write(&path, &upload.bytes).await?;
        info!(path = %path.display(), size = upload.bytes.len(), "poster stored locally");
        Ok(path.display().to_string())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
