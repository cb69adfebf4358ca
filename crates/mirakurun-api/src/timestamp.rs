// Epoch-millisecond timestamps as used by Mirakurun program and event records.
//
// The wire value is an integer count of milliseconds. Only whole seconds are
// kept; the sub-second part is truncated toward zero on decode and encode.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time carried as epoch milliseconds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Build a timestamp from epoch milliseconds, dropping the sub-second part.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn from_millis(ms: i64) -> Option<Self> {
        Utc.timestamp_opt(ms / 1000, 0).single().map(Self)
    }

    /// Epoch milliseconds at whole-second precision.
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp().saturating_mul(1000)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

struct MillisVisitor;

impl Visitor<'_> for MillisVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer count of epoch milliseconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Timestamp::from_millis(v)
            .ok_or_else(|| E::custom(format!("timestamp out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("timestamp out of range: {v}")))?;
        self.visit_i64(v)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_i64(MillisVisitor)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Timelike;

    use super::*;

    #[test]
    fn decodes_new_year_2018() {
        let ts: Timestamp = serde_json::from_str("1514764800000").unwrap();
        assert_eq!(ts.0.to_rfc3339(), "2018-01-01T00:00:00+00:00");
        assert_eq!(ts.0.nanosecond(), 0);
    }

    #[test]
    fn truncates_sub_second_part() {
        let ts: Timestamp = serde_json::from_str("1514764800999").unwrap();
        assert_eq!(ts.0.timestamp(), 1_514_764_800);
        assert_eq!(ts.0.nanosecond(), 0);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1514764800000");
    }

    #[test]
    fn rejects_non_numeric_token() {
        assert!(serde_json::from_str::<Timestamp>("\"2018-01-01\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("null").is_err());
    }

    #[test]
    fn decodes_pre_epoch_values() {
        let ts: Timestamp = serde_json::from_str("-1500").unwrap();
        assert_eq!(ts.0.timestamp(), -1);
    }
}
