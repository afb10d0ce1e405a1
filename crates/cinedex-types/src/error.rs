use thiserror::Error;

/// Errors produced when converting between payloads and typed records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The payload does not fit the typed record (missing or mistyped field).
    #[error("payload does not match {record}: {reason}")]
    Shape { record: &'static str, reason: String },

    /// A record could not be turned back into a JSON object.
    #[error("cannot encode {record}: {reason}")]
    Encode { record: &'static str, reason: String },
}
