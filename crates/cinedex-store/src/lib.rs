//! Whole-collection record storage for cinedex.
//!
//! A collection is a named, ordered sequence of records. Every load reads
//! the entire sequence and every save rewrites it; there is no index and no
//! partial write.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`JsonFileStore`] -- one `<collection>.json` file per collection
//! - [`InMemoryRecordStore`] -- serialized collections in a `HashMap`, for tests
//!
//! # Design Rules
//!
//! 1. A save is atomic from a reader's point of view: the new file is
//!    written beside the old one and renamed over it.
//! 2. The store never locks. Two overlapping load-mutate-save cycles lose
//!    one of the updates (last write wins); callers that need more serialize
//!    their own writes.
//! 3. Storage order is insertion order; the store never reorders.
//! 4. All I/O and decode errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
