//! Fixed-width RFC 3339 timestamps
//!
//! Stored documents are sorted by comparing timestamp strings, which is only
//! chronological when every value has the same shape. Use with
//! `#[serde(with = "crate::domain::timestamp")]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// `2024-05-01T10:00:00.000000Z`
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    DateTime::<Utc>::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whole_seconds_keep_fraction_digits() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(format(&at), "2024-05-01T10:00:00.000000Z");
    }

    #[test]
    fn formatted_values_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let later = earlier + chrono::Duration::microseconds(500_001);
        assert!(format(&earlier) < format(&later));
    }
}
