//! Poster assets for cinedex.
//!
//! - [`PosterUploader`]: store an uploaded image and get back a reference
//!   ([`CloudinaryUploader`] or [`LocalDirUploader`]).
//! - [`PosterFetcher`]: turn a stored reference back into bytes.
//! - [`render_media_pdf`]: one-page PDF summary of a media record.

pub mod error;
pub mod fetch;
pub mod pdf;
pub mod upload;

pub use error::{AssetError, AssetResult};
pub use fetch::{PosterFetcher, DEFAULT_FETCH_TIMEOUT};
pub use pdf::render_media_pdf;
pub use upload::{
    sign_params, CloudinaryConfig, CloudinaryUploader, LocalDirUploader, PosterUpload,
    PosterUploader, DEFAULT_FOLDER,
};
