use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ExerciseId;

/// A single entry in a user's log.
///
/// Entries are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Exercise {
    /// Unique identifier for this entry.
    #[serde(rename = "_id")]
    pub id: ExerciseId,
    /// What was done, e.g. `"5k run"`.
    pub description: String,
    /// Duration in minutes.
    #[serde(with = "minutes")]
    pub duration: f64,
    /// When the exercise took place.
    pub date: DateTime<Utc>,
}

impl Exercise {
    /// Create a new entry with a fresh id.
    #[must_use]
    pub fn new(description: impl Into<String>, duration: f64, date: DateTime<Utc>) -> Self {
        Self {
            id: ExerciseId::generate(),
            description: description.into(),
            duration,
            date,
        }
    }
}

/// Parses a client-supplied date.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and a zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Serializes whole-minute durations as JSON integers.
mod minutes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Largest magnitude at which every integer is exactly representable.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    #[allow(clippy::float_cmp, clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() < MAX_EXACT {
            #[allow(clippy::cast_possible_truncation)]
            let whole = *value as i64;
            serializer.serialize_i64(whole)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}
