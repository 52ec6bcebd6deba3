//! Log timestamp parsing.
//!
//! Timestamps are written as `YYYY-MM-DD HH:MM:SS.mmm` in the server's local
//! time with no zone marker, so they map onto [`NaiveDateTime`] directly.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2})\.([0-9]{3})")
        .expect("timestamp pattern is valid")
});

/// Errors produced while parsing a log timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp does not match YYYY-MM-DD HH:MM:SS.mmm: {0:?}")]
    Malformed(String),

    #[error("timestamp is not a valid calendar instant: {0:?}")]
    OutOfRange(String),
}

/// Parses a log timestamp. Text after the millisecond field is ignored.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimestampError> {
    let caps = TIMESTAMP_RE
        .captures(s)
        .ok_or_else(|| TimestampError::Malformed(s.to_string()))?;

    // Every group is exactly [0-9]{n}, so these cannot overflow u32.
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or_default();
    let year = field(1) as i32;

    NaiveDate::from_ymd_opt(year, field(2), field(3))
        .and_then(|date| date.and_hms_milli_opt(field(4), field(5), field(6), field(7)))
        .ok_or_else(|| TimestampError::OutOfRange(s.to_string()))
}
