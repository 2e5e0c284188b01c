//! # Capture Timestamps
//!
//! `date_captured` values in COCO exports come in several layouts. The
//! reference annotations use `2013-11-14 11:18:45`; other tools write
//! ISO-8601 with a `T` separator, with or without an offset, with or
//! without seconds, or a Unix time (as a number or a numeric string).
//!
//! [`CaptureTime`] accepts all of these and stores the instant as a naive
//! UTC date-time. Inputs without an offset are taken as already UTC.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TimestampError;
use crate::fields::json_type;

/// Offset-free layouts, tried in order. `%.f` also matches an absent fraction.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Numeric inputs larger than this are milliseconds rather than seconds.
const MILLIS_THRESHOLD: f64 = 2e10;

const DISPLAY_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The moment an image was captured, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTime(NaiveDateTime);

impl CaptureTime {
    /// Parse a capture time from its string form.
    ///
    /// RFC 3339 strings carrying an offset are converted to UTC. Offset-free
    /// strings may use either `T` or a space between date and time, and may
    /// omit the seconds. A numeric string is a Unix time, as in [`Self::from_unix`].
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Unparseable`] if no layout matches, or
    /// [`TimestampError::OutOfRange`] for a numeric string outside the calendar.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let trimmed = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.naive_utc()));
        }
        if let Ok(unix) = trimmed.parse::<f64>() {
            return Self::from_unix(unix);
        }
        NAIVE_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
            .map(Self)
            .ok_or_else(|| TimestampError::Unparseable {
                input: input.to_string(),
            })
    }

    /// Interpret a Unix time in seconds, or in milliseconds when its
    /// magnitude exceeds 2·10¹⁰.
    pub fn from_unix(value: f64) -> Result<Self, TimestampError> {
        if !value.is_finite() {
            return Err(TimestampError::OutOfRange { value });
        }
        let seconds = if value.abs() > MILLIS_THRESHOLD {
            value / 1000.0
        } else {
            value
        };
        let whole = seconds.floor();
        let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
        DateTime::<Utc>::from_timestamp(whole as i64, nanos)
            .map(|dt| Self(dt.naive_utc()))
            .ok_or(TimestampError::OutOfRange { value })
    }

    /// Interpret a parsed JSON value: strings are parsed, numbers are Unix times.
    pub fn from_value(value: &Value) -> Result<Self, TimestampError> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::from_unix(f),
                None => Err(TimestampError::WrongType {
                    received: json_type(value),
                }),
            },
            other => Err(TimestampError::WrongType {
                received: json_type(other),
            }),
        }
    }

    pub fn naive_utc(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_LAYOUT))
    }
}

impl Serialize for CaptureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}
