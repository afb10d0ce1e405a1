//! HTTP server for cinedex.
//!
//! Serves the media catalog and its reviews as JSON over REST, accepts
//! poster uploads as multipart forms and exports a media record as PDF.
//! Routes are listed in [`router::ENDPOINTS`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StorageConfig, UploadsConfig};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, ENDPOINTS};
pub use server::CinedexServer;
pub use state::AppState;
