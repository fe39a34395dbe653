//! Serde helpers for the dashboard timestamp format (`YYYY-MM-DD HH:MM:SS`).

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format used for every timestamp in JSON responses.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
}
