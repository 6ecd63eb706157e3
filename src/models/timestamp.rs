//! Serde adapter for stored timestamps
//!
//! Timestamps are stored as UTC `NaiveDateTime` and exchanged as RFC 3339
//! strings with an explicit `Z` offset.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    DateTime::<Utc>::from_naive_utc_and_offset(*value, Utc).serialize(serializer)
}

/// Accepts any RFC 3339 offset and converts it to UTC
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<Utc>::deserialize(deserializer).map(|value| value.naive_utc())
}
