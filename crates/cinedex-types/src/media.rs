use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::record::{fields, Payload, Record};
use crate::temporal::Timestamp;
use crate::year::Year;

/// A catalog entry.
///
/// `kind`, `title` and `year` are required at creation. `poster` is only
/// ever written by the poster-attach operation. Unknown fields land in
/// `extra` and are written back verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "imdbID")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub year: Year,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Payload,
}

impl Record for MediaRecord {
    const COLLECTION: &'static str = "media";
    const ID_FIELD: &'static str = fields::MEDIA_ID;
    const RESERVED_FIELDS: &'static [&'static str] = &[
        fields::MEDIA_ID,
        fields::POSTER,
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
