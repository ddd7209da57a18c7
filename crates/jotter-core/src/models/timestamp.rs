//! Timestamp model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Format older clients wrote before timestamps switched to RFC 3339.
const LEGACY_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// A UTC instant with millisecond precision.
///
/// Serialized as an RFC 3339 string (`2024-05-01T10:15:30.123Z`) so it survives
/// both the SQLite cache and JSON document stores unchanged. Ordering compares
/// instants, not strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time, truncated to milliseconds.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self(DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now))
    }

    /// Build a timestamp from Unix milliseconds.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Unix milliseconds.
    #[must_use]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Parse an RFC 3339 string, falling back to the legacy
    /// `yyyy-MM-dd hh:mm:ss a` format (interpreted as UTC).
    pub fn parse(value: &str) -> Result<Self, Error> {
        let value = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            let utc = parsed.with_timezone(&Utc);
            return Self::from_millis(utc.timestamp_millis())
                .ok_or_else(|| Error::InvalidTimestamp(value.to_string()));
        }

        NaiveDateTime::parse_from_str(value, LEGACY_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| Error::InvalidTimestamp(value.to_string()))
    }

    /// Underlying chrono value.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_millisecond_precise() {
        let now = Timestamp::now();
        assert_eq!(Timestamp::from_millis(now.as_millis()), Some(now));
    }

    #[test]
    fn display_parse_roundtrip() {
        let ts = Timestamp::from_millis(1_714_558_530_123).unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T10:15:30.123Z");
        assert_eq!(ts.to_string().parse::<Timestamp>().unwrap(), ts);
    }

    #[test]
    fn parses_offsets_into_utc() {
        let ts = Timestamp::parse("2024-05-01T12:15:30.123+02:00").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T10:15:30.123Z");
    }

    #[test]
    fn parses_legacy_format() {
        let ts = Timestamp::parse("2019-07-05 03:46:34 PM").unwrap();
        assert_eq!(ts.to_string(), "2019-07-05T15:46:34.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Timestamp::parse("yesterday"),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn orders_by_instant_not_text() {
        // "11:00 AM" sorts after "01:00 PM" as text but is earlier in time.
        let morning = Timestamp::parse("2020-01-01 11:00:00 AM").unwrap();
        let afternoon = Timestamp::parse("2020-01-01 01:00:00 PM").unwrap();
        assert!(afternoon > morning);
    }

    #[test]
    fn serde_uses_strings() {
        let ts = Timestamp::from_millis(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
