use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Result, ValidationError};

/// Default timezone for calendar dates.
/// Calendar years and months of activity timestamps are read in this zone
/// unless a caller configures another one.
pub const DEFAULT_REPORTING_TZ: Tz = chrono_tz::Europe::London;

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Converts a UTC instant to a local calendar date in the given timezone.
pub fn local_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date_from_utc(Utc::now(), tz)
}

/// Parses an ISO `YYYY-MM-DD` date supplied by a caller.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ValidationError::DateParse(e).into())
}

/// When an activity happened, as the backend recorded it.
///
/// Values sent with an offset are instants and get converted into the
/// reporting timezone. Values sent without one are already wall-clock time
/// in that zone, so their calendar date is read off unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityTimestamp {
    Instant(DateTime<Utc>),
    WallClock(NaiveDateTime),
}

impl ActivityTimestamp {
    /// Calendar date in the reporting timezone.
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        match self {
            ActivityTimestamp::Instant(instant) => local_date_from_utc(*instant, tz),
            ActivityTimestamp::WallClock(naive) => naive.date(),
        }
    }

    pub fn local_year(&self, tz: Tz) -> i32 {
        self.local_date(tz).year()
    }
}

impl From<DateTime<Utc>> for ActivityTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        ActivityTimestamp::Instant(instant)
    }
}

impl From<NaiveDateTime> for ActivityTimestamp {
    fn from(naive: NaiveDateTime) -> Self {
        ActivityTimestamp::WallClock(naive)
    }
}

impl fmt::Display for ActivityTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityTimestamp::Instant(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ActivityTimestamp::WallClock(naive) => {
                write!(f, "{}", naive.format(WALL_CLOCK_FORMAT))
            }
        }
    }
}

impl Serialize for ActivityTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ActivityTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_flexible_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}")))
    }
}

/// Parses the timestamp shapes the backend emits: RFC 3339, offset-less
/// date-times and bare dates. Only RFC 3339 values become instants.
pub fn parse_flexible_timestamp(raw: &str) -> Option<ActivityTimestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ActivityTimestamp::Instant(ts.with_timezone(&Utc)));
    }
    for format in [WALL_CLOCK_FORMAT, "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ActivityTimestamp::WallClock(naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(ActivityTimestamp::WallClock)
}

/// Calendar date as written, ignoring any time or offset part.
fn parse_written_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    match parse_flexible_timestamp(raw)? {
        ActivityTimestamp::WallClock(naive) => Some(naive.date()),
        ActivityTimestamp::Instant(instant) => Some(instant.date_naive()),
    }
}

/// Optional date field that tolerates `null`, empty strings and full timestamps.
pub(crate) fn deserialize_optional_flexible_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_written_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {value:?}"))),
    }
}
