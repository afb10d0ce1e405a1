//! Shape checks for media creation payloads.
//!
//! Runs in front of [`MediaCatalog::create`](crate::MediaCatalog::create).
//! Every rule is evaluated so the caller gets the full list of problems at
//! once.

use std::fmt;

use cinedex_types::Payload;
use serde::Serialize;
use serde_json::Value;

/// One violated rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violated rules for one payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Check the required media fields: `type` and `title` are strings, `year`
/// is a whole number (or a string holding one).
pub fn validate_media_payload(payload: &Payload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !matches!(payload.get("type"), Some(Value::String(_))) {
        errors.push("type", "Type is a mandatory and needs to be in string");
    }
    if !matches!(payload.get("title"), Some(Value::String(_))) {
        errors.push("title", "Title is a mandatory and needs to be in string");
    }
    if !payload.get("year").is_some_and(is_whole_number) {
        errors.push("year", "Year is a mandatory and needs to be in number");
    }

    errors.into_result()
}

fn is_whole_number(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.as_i64().is_some_and(|v| i32::try_from(v).is_ok())
                || n.as_f64().is_some_and(|v| v.fract() == 0.0 && v.abs() <= i32::MAX as f64)
        }
        Value::String(s) => s.trim().parse::<i32>().is_ok(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_complete_payload() {
        let p = payload(json!({"type": "movie", "title": "Dune", "year": 2021}));
        assert!(validate_media_payload(&p).is_ok());
    }

    #[test]
    fn accepts_numeric_string_year() {
        let p = payload(json!({"type": "movie", "title": "Dune", "year": "2021"}));
        assert!(validate_media_payload(&p).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let p = payload(json!({"title": 12, "year": "next year"}));
        let errors = validate_media_payload(&p).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["type", "title", "year"]);
    }

    #[test]
    fn fractional_year_is_rejected() {
        let p = payload(json!({"type": "movie", "title": "Dune", "year": 2021.5}));
        let errors = validate_media_payload(&p).unwrap_err();
        assert_eq!(errors.errors()[0].message, "Year is a mandatory and needs to be in number");
    }

    #[test]
    fn serializes_as_list() {
        let errors = ValidationErrors::single("type", "bad");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([{"field": "type", "message": "bad"}])
        );
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::single("type", "bad");
        errors.push("year", "worse");
        assert_eq!(errors.to_string(), "type: bad; year: worse");
    }
}
