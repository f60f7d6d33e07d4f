//! Typed expected values held by comparison conditions.

use chrono::{
    DateTime, Datelike, NaiveDateTime, Offset, SecondsFormat, SubsecRound, TimeZone, Utc,
};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Value family a comparison operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Numeric,
    Timestamp,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "String",
            Self::Numeric => "Numeric",
            Self::Timestamp => "Timestamp",
            Self::Boolean => "Boolean",
        };
        f.write_str(name)
    }
}

/// Numeric literal that keeps track of whether it was integral.
///
/// The text form is canonical: integers print without a fraction and
/// floats print the shortest decimal that reads back to the same `f64`.
///
/// ```rust
/// use statelang::core::NumericValue;
///
/// assert_eq!(NumericValue::from(42).to_string(), "42");
/// assert_eq!(NumericValue::from(9000.1).to_string(), "9000.1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

impl NumericValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Float(value) => value.is_finite(),
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for NumericValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// How much of the time of day a [`Timestamp`] prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimestampPrecision {
    Seconds,
    Millis,
}

/// Why a timestamp was refused.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("not an ISO-8601 timestamp: {0}")]
    Syntax(#[from] chrono::ParseError),

    #[error("year {0} is outside 0000-9999")]
    OutOfRange(i32),
}

/// An absolute instant, normalized to UTC with millisecond precision.
///
/// Instants written with a non-UTC offset or a fractional second print
/// with milliseconds; whole-second UTC instants print to the second.
/// Two timestamps are equal when they denote the same instant, whatever
/// form they were written in.
///
/// ```rust
/// use statelang::core::Timestamp;
///
/// let pacific = Timestamp::parse("2016-03-14T01:59:00.123-08:00").unwrap();
/// let utc = Timestamp::parse("2016-03-14T09:59:00.123Z").unwrap();
/// assert_eq!(pacific, utc);
/// assert_eq!(pacific.to_string(), "2016-03-14T09:59:00.123Z");
///
/// let shifted = Timestamp::parse("2016-03-14T01:59:00-08:00").unwrap();
/// assert_eq!(shifted.to_string(), "2016-03-14T09:59:00.000Z");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    precision: TimestampPrecision,
}

impl Timestamp {
    pub fn new<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        let shifted = instant.offset().fix().local_minus_utc() != 0;
        let precision = if shifted || instant.timestamp_subsec_nanos() != 0 {
            TimestampPrecision::Millis
        } else {
            TimestampPrecision::Seconds
        };
        Self {
            instant: instant.with_timezone(&Utc).trunc_subsecs(3),
            precision,
        }
    }

    /// Parse an ISO-8601 date-time. Text without an offset is read as UTC.
    pub fn parse(text: &str) -> Result<Self, TimestampError> {
        let fraction = text.contains('.');
        let (instant, zulu) = match DateTime::parse_from_rfc3339(text) {
            Ok(instant) => (
                instant.with_timezone(&Utc),
                text.ends_with(['Z', 'z']),
            ),
            Err(err) => {
                let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map_err(|_| err)?;
                (Utc.from_utc_datetime(&naive), true)
            }
        };

        let precision = if fraction || !zulu {
            TimestampPrecision::Millis
        } else {
            TimestampPrecision::Seconds
        };
        let timestamp = Self {
            instant: instant.trunc_subsecs(3),
            precision,
        };
        timestamp.check_range()?;
        Ok(timestamp)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn precision(&self) -> TimestampPrecision {
        self.precision
    }

    /// Only four-digit years have a text form that reads back.
    pub fn check_range(&self) -> Result<(), TimestampError> {
        let year = self.instant.year();
        if (0..=9999).contains(&year) {
            Ok(())
        } else {
            Err(TimestampError::OutOfRange(year))
        }
    }

    /// Canonical text: UTC with a `Z` suffix, to the second or the
    /// millisecond depending on [`precision`](Self::precision).
    pub fn to_iso8601(&self) -> String {
        let format = match self.precision {
            TimestampPrecision::Seconds => SecondsFormat::Secs,
            TimestampPrecision::Millis => SecondsFormat::Millis,
        };
        self.instant.to_rfc3339_opts(format, true)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::new(instant)
    }
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpectedValue {
    String(String),
    Numeric(NumericValue),
    Timestamp(Timestamp),
    Boolean(bool),
}

impl ExpectedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Numeric(_) => ValueType::Numeric,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::Boolean(_) => ValueType::Boolean,
        }
    }

    /// Canonical text of the value.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Numeric(value) => value.to_string(),
            Self::Timestamp(value) => value.to_iso8601(),
            Self::Boolean(value) => value.to_string(),
        }
    }
}

impl From<&str> for ExpectedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ExpectedValue {
    fn from(value: i64) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<i32> for ExpectedValue {
    fn from(value: i32) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<u32> for ExpectedValue {
    fn from(value: u32) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<f64> for ExpectedValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<NumericValue> for ExpectedValue {
    fn from(value: NumericValue) -> Self {
        Self::Numeric(value)
    }
}

impl From<bool> for ExpectedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Timestamp> for ExpectedValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ExpectedValue {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Timestamp(value.into())
    }
}
