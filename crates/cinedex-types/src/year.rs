use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Release year of a media record.
///
/// Accepts `2021`, `2021.0` and `"2021"`. The value is written back exactly
/// as it was read, so loading and saving a collection never rewrites a
/// record nobody touched. Use [`Year::value`] for the number.
#[derive(Clone, Debug)]
pub struct Year {
    value: i32,
    written: Value,
}

impl Year {
    pub fn value(&self) -> i32 {
        self.value
    }

    /// The JSON value this year was read from.
    pub fn as_written(&self) -> &Value {
        &self.written
    }

    fn from_json(written: Value) -> Result<Self, String> {
        let value = match &written {
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    i32::try_from(v).map_err(|_| format!("year {v} is out of range"))?
                } else {
                    match n.as_f64() {
                        Some(v) if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => v as i32,
                        _ => return Err(format!("year {n} is not a whole number in range")),
                    }
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("year {s:?} is not numeric"))?,
            other => return Err(format!("year must be a number or a numeric string, got {other}")),
        };
        Ok(Self { value, written })
    }
}

impl From<i32> for Year {
    fn from(value: i32) -> Self {
        Self {
            value,
            written: Value::from(value),
        }
    }
}

impl PartialEq for Year {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Year {}

impl PartialEq<i32> for Year {
    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.written.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::from_json(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_integer_float_and_text() {
        for raw in [json!(2021), json!(2021.0), json!("2021"), json!(" 2021 ")] {
            let year: Year = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(year, 2021, "{raw}");
        }
    }

    #[test]
    fn writes_back_the_form_it_was_read_in() {
        for raw in [json!(2017), json!(2017.0), json!("2017")] {
            let year: Year = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(serde_json::to_value(&year).unwrap(), raw);
        }
    }

    #[test]
    fn rejects_fractions_text_and_out_of_range() {
        for raw in [json!(2021.5), json!("soon"), json!(1i64 << 40), json!(null), json!([2021])] {
            assert!(serde_json::from_value::<Year>(raw.clone()).is_err(), "{raw}");
        }
    }

    #[test]
    fn new_years_are_plain_integers() {
        assert_eq!(serde_json::to_string(&Year::from(1999)).unwrap(), "1999");
        assert_eq!(Year::from(1999).to_string(), "1999");
    }
}
