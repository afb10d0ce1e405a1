use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use cinedex_assets::{CloudinaryConfig, DEFAULT_FOLDER};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `media.json` and `reviews.json`.
    pub data_dir: PathBuf,
    pub storage: StorageConfig,
    pub uploads: UploadsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            data_dir: PathBuf::from("data"),
            storage: StorageConfig::default(),
            uploads: UploadsConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Create the data directory and empty collection files on start-up.
    pub create_missing: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            create_missing: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Remote folder for Cloudinary uploads.
    pub folder: String,
    /// Where posters go when no Cloudinary credentials are set.
    pub local_dir: PathBuf,
    pub cloudinary: Option<CloudinaryConfig>,
    /// Largest accepted multipart body for poster uploads.
    pub max_bytes: usize,
    /// Timeout for remote upload and poster download calls.
    pub timeout_secs: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_owned(),
            local_dir: PathBuf::from("uploads"),
            cloudinary: None,
            max_bytes: 10 * 1024 * 1024,
            timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, otherwise start from defaults, then apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PORT`, `CINEDEX_DATA_DIR` and `CLOUDINARY_URL` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT is not a valid port: {port}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(dir) = lookup("CINEDEX_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("CLOUDINARY_URL") {
            let cloudinary = CloudinaryConfig::from_url(&url)
                .map_err(|e| ServerError::Config(format!("CLOUDINARY_URL: {e}")))?;
            self.uploads.cloudinary = Some(cloudinary);
        }
        Ok(())
    }
}
