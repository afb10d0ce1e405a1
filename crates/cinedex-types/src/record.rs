use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TypeError;
use crate::id::RecordId;
use crate::temporal::Timestamp;

/// A JSON object as it arrives from a client or sits in a collection file.
pub type Payload = serde_json::Map<String, Value>;

/// Wire names of the fields the server owns.
pub mod fields {
    pub const MEDIA_ID: &str = "imdbID";
    pub const REVIEW_ID: &str = "_id";
    /// Back-reference from a review to its media record.
    pub const PARENT_ID: &str = "imdbID";
    pub const POSTER: &str = "poster";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// An element of a named collection.
///
/// Implementations are open-map records: typed required fields plus a
/// flattened side map, so arbitrary client fields round-trip verbatim.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name; the file store maps it to `<name>.json`.
    const COLLECTION: &'static str;

    /// Wire name of the primary key.
    const ID_FIELD: &'static str;

    /// Fields a client payload may never set. They are removed before
    /// create and update; the server fills them in itself.
    const RESERVED_FIELDS: &'static [&'static str];

    fn id(&self) -> &RecordId;

    fn created_at(&self) -> &Timestamp;

    fn updated_at(&self) -> &Timestamp;

    /// Record a content change at `at`.
    fn touch(&mut self, at: Timestamp);

    /// Decode a payload into a typed record.
    fn from_payload(payload: Payload) -> Result<Self, TypeError> {
        serde_json::from_value(Value::Object(payload)).map_err(|e| TypeError::Shape {
            record: Self::COLLECTION,
            reason: e.to_string(),
        })
    }

    /// Encode the record as a JSON object (typed fields and extras merged).
    fn to_payload(&self) -> Result<Payload, TypeError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(TypeError::Encode {
                record: Self::COLLECTION,
                reason: format!("expected an object, got {other}"),
            }),
            Err(e) => Err(TypeError::Encode {
                record: Self::COLLECTION,
                reason: e.to_string(),
            }),
        }
    }
}

/// Remove every key in `reserved` from `payload`.
pub fn strip_reserved(payload: &mut Payload, reserved: &[&str]) {
    for key in reserved {
        payload.remove(*key);
    }
}

/// Shallow merge: each top-level key of `patch` replaces the same key in
/// `base`. Nested objects are replaced wholesale, never merged. Keys listed
/// in `reserved` are left alone.
pub fn merge_patch(base: &mut Payload, patch: Payload, reserved: &[&str]) {
    for (key, value) in patch {
        if reserved.contains(&key.as_str()) {
            continue;
        }
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn merge_replaces_top_level_keys() {
        let mut base = object(json!({"title": "Dune", "year": 2021, "cast": {"lead": "A", "support": "B"}}));
        merge_patch(&mut base, object(json!({"cast": {"lead": "C"}, "runtime": 155})), &[]);
        assert_eq!(base["title"], "Dune");
        assert_eq!(base["runtime"], 155);
        // nested objects are replaced, not deep-merged
        assert_eq!(base["cast"], json!({"lead": "C"}));
    }

    #[test]
    fn merge_skips_reserved_keys() {
        let mut base = object(json!({"imdbID": "a", "title": "Dune"}));
        merge_patch(&mut base, object(json!({"imdbID": "b", "title": "Dune II"})), &["imdbID"]);
        assert_eq!(base["imdbID"], "a");
        assert_eq!(base["title"], "Dune II");
    }

    #[test]
    fn strip_removes_only_listed_keys() {
        let mut payload = object(json!({"_id": "x", "createdAt": "t", "comment": "great"}));
        strip_reserved(&mut payload, &["_id", "createdAt"]);
        assert_eq!(payload.len(), 1);
        assert!(payload.contains_key("comment"));
    }
}
