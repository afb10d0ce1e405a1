//! Collection service for cinedex.
//!
//! [`Collection`] implements create / list / get / update / delete over any
//! [`Record`](cinedex_types::Record) type backed by a
//! [`RecordStore`](cinedex_store::RecordStore). [`MediaCatalog`] and
//! [`ReviewBoard`] specialise it for the two collections the service keeps.
//!
//! Payload shape checks for media creation live in [`validation`]; the HTTP
//! layer runs them before calling into the catalog.

pub mod collection;
pub mod error;
pub mod media;
pub mod reviews;
pub mod validation;

pub use collection::Collection;
pub use error::{CatalogError, CatalogResult};
pub use media::{MediaCatalog, PosterAttachment};
pub use reviews::ReviewBoard;
pub use validation::{validate_media_payload, FieldError, ValidationErrors};
