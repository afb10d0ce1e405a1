use thiserror::Error;

/// Errors from upload, fetch and render operations.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The upload service rejected the file or could not be reached.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A poster reference could not be fetched.
    #[error("cannot fetch {reference}: {reason}")]
    Fetch { reference: String, reason: String },

    /// The document could not be produced.
    #[error("render failed: {0}")]
    Render(String),

    /// Invalid uploader or fetcher configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AssetResult<T> = Result<T, AssetError>;
