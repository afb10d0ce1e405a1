//! Collection (de)serialization shared by every backend.
//!
//! On disk a collection is a JSON array of objects. Field order is
//! irrelevant; numbers stay numbers and strings stay strings.

use cinedex_types::Record;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Content of a freshly created, empty collection.
pub const EMPTY_COLLECTION: &[u8] = b"[]\n";

/// Decode raw collection bytes into typed records.
pub fn decode_collection<R: Record>(collection: &str, bytes: &[u8]) -> StoreResult<Vec<R>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::corrupt(collection, format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(StoreError::corrupt(collection, "expected a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| StoreError::corrupt(collection, format!("record {index}: {e}")))
        })
        .collect()
}

/// Encode typed records as collection bytes.
pub fn encode_collection<R: Record>(collection: &str, records: &[R]) -> StoreResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Serialization {
        collection: collection.to_owned(),
        reason: e.to_string(),
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
