//! Wall-clock times of day as exchanged with clients ("09:00", "17:30:00").

use crate::domain::foundation::ValidationError;
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const OUTPUT_FORMAT: &str = "%H:%M";
const INPUT_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(field: &str, raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw = raw.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ValidationError::invalid_format(field, "expected HH:MM"))
}

pub fn format_clock_time(time: &NaiveTime) -> String {
    time.format(OUTPUT_FORMAT).to_string()
}

/// serde adapter for `#[serde(with = "clock_time")]` fields.
pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_clock_time(time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_clock_time("time", &raw).map_err(serde::de::Error::custom)
}
