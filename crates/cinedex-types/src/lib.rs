//! Foundation types for cinedex.
//!
//! Every other cinedex crate depends on `cinedex-types`. Records are open
//! maps on disk: a fixed set of typed fields plus a side map of extra fields
//! that survive every load/save round-trip untouched.
//!
//! # Key Types
//!
//! - [`RecordId`]: opaque primary key, generated once at creation
//! - [`Timestamp`]: UTC instant with millisecond precision
//! - [`Year`]: release year, written back in the form it was read
//! - [`Record`]: what a collection needs to know about its element type
//! - [`MediaRecord`]: a catalog entry (title, year, type, poster)
//! - [`ReviewRecord`]: a review pointing back at a media record

pub mod error;
pub mod id;
pub mod media;
pub mod record;
pub mod review;
pub mod temporal;
pub mod year;

pub use error::TypeError;
pub use id::RecordId;
pub use media::MediaRecord;
pub use record::{fields, merge_patch, strip_reserved, Payload, Record};
pub use review::ReviewRecord;
pub use temporal::Timestamp;
pub use year::Year;
