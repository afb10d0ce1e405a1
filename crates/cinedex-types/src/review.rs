use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::record::{fields, Payload, Record};
use crate::temporal::Timestamp;

/// A review of a media record.
///
/// `parent_id` is a plain back-reference: nothing checks that the media
/// record exists, and deleting the media record leaves its reviews alone.
/// Review content (comment, rate, ...) lives in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "imdbID")]
    pub parent_id: RecordId,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Payload,
}

impl Record for ReviewRecord {
    const COLLECTION: &'static str = "reviews";
    const ID_FIELD: &'static str = fields::REVIEW_ID;
    const RESERVED_FIELDS: &'static [&'static str] = &[
        fields::REVIEW_ID,
        fields::PARENT_ID,
        fields::CREATED_AT,
        fields::UPDATED_AT,
    ];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    fn touch(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}
