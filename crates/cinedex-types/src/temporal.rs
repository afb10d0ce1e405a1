use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// UTC instant with millisecond precision.
///
/// Fresh values serialize as an RFC 3339 string with milliseconds and a `Z`
/// suffix (`2021-10-22T08:15:00.123Z`), the same shape JavaScript `Date`
/// values take in the data files. A value read from a file keeps the text it
/// was read from and writes that text back, so saving a collection does not
/// rewrite timestamps of records nobody touched. Comparison only looks at
/// the instant; sub-millisecond digits are dropped from it.
#[derive(Clone)]
pub struct Timestamp {
    at: DateTime<Utc>,
    stored: Option<Box<str>>,
}

impl Timestamp {
    /// The current wall-clock time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// A timestamp that is strictly later than `previous`.
    ///
    /// Normally this is just [`Timestamp::now`]. When the clock has not
    /// moved past `previous` (fast successive writes, clock skew), the result
    /// is `previous` plus one millisecond.
    pub fn after(previous: &Self) -> Self {
        let now = Self::now();
        if now > *previous {
            now
        } else {
            Self::from_datetime(previous.at + Duration::milliseconds(1))
        }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            at: at.trunc_subsecs(3),
            stored: None,
        }
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.at
    }

    /// Canonical RFC 3339 rendering: milliseconds, `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse an RFC 3339 string. The result renders canonically.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value).map(|at| Self::from_datetime(at.with_timezone(&Utc)))
    }

    /// Text this value was read from, if it came from a file or payload.
    pub fn as_stored(&self) -> Option<&str> {
        self.stored.as_deref()
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.at.hash(state);
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.stored {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_str(&self.to_rfc3339()),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut parsed = Self::parse(&raw).map_err(serde::de::Error::custom)?;
        parsed.stored = Some(raw.into_boxed_str());
        Ok(parsed)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stored {
            Some(text) => f.write_str(text),
            None => f.write_str(&self.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn after_is_strictly_later_than_future_value() {
        let future = Timestamp::from_datetime(Utc::now() + Duration::hours(1));
        let next = Timestamp::after(&future);
        assert!(next > future);
        assert_eq!(*next.as_datetime() - *future.as_datetime(), Duration::milliseconds(1));
    }

    #[test]
    fn serializes_with_millis_and_z_suffix() {
        let ts = Timestamp::parse("2021-10-22T08:15:00.123456Z").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2021-10-22T08:15:00.123Z\"");
    }

    #[test]
    fn parses_offsets_into_utc() {
        let ts = Timestamp::parse("2021-10-22T10:15:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-10-22T08:15:00.000Z");
    }

    #[test]
    fn stored_text_is_written_back_verbatim() {
        for text in ["2021-10-22T08:16:00Z", "2021-10-22T10:16:00+02:00", "2021-10-22T08:16:00.123456Z"] {
            let ts: Timestamp = serde_json::from_value(serde_json::json!(text)).unwrap();
            assert_eq!(ts.as_stored(), Some(text));
            assert_eq!(serde_json::to_value(&ts).unwrap(), serde_json::json!(text));
            assert_eq!(ts.to_string(), text);
        }
    }

    #[test]
    fn equality_ignores_stored_text() {
        let short: Timestamp = serde_json::from_str("\"2021-10-22T08:16:00Z\"").unwrap();
        let long: Timestamp = serde_json::from_str("\"2021-10-22T08:16:00.000Z\"").unwrap();
        assert_eq!(short, long);
        assert_eq!(short, Timestamp::parse("2021-10-22T08:16:00Z").unwrap());
    }

    #[test]
    fn rejects_non_rfc3339_strings() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }

    proptest! {
        #[test]
        fn after_survives_round_trip(offset_ms in -10_000i64..10_000) {
            let prev = Timestamp::from_datetime(Utc::now() + Duration::milliseconds(offset_ms));
            let next = Timestamp::after(&prev);
            let encoded = serde_json::to_string(&next).unwrap();
            let decoded: Timestamp = serde_json::from_str(&encoded).unwrap();
            prop_assert!(decoded > prev);
        }
    }
}
