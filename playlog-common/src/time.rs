//! Date and time-of-day utilities for play-log fields

use crate::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only layouts accepted in the log date column
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Date-with-time layouts; the time part is discarded
const DATE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a calendar date from the log date column
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| Error::InvalidInput(format!("date {:?}", text)))
}

/// Parse an `H:M:S` time of day
///
/// Each component may be unpadded; hours 0-23, minutes and seconds 0-59.
pub fn parse_clock_time(text: &str) -> Result<NaiveTime> {
    let invalid = || Error::InvalidInput(format!("time of day {:?}", text));

    let parts = split_numeric(text, 3).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(parts[0], parts[1], parts[2]).ok_or_else(invalid)
}

/// Parse an `M:S` duration into whole seconds
///
/// Minutes are unbounded (a 75 minute program is `75:00`).
pub fn parse_minutes_seconds(text: &str) -> Result<u32> {
    let invalid = || Error::InvalidInput(format!("duration {:?}", text));

    let parts = split_numeric(text, 2).ok_or_else(invalid)?;
    parts[0]
        .checked_mul(60)
        .and_then(|secs| secs.checked_add(parts[1]))
        .ok_or_else(invalid)
}

/// Combine a date and time, shift by `offset_ms`, keep the time of day
///
/// The shifted date is dropped: crossing midnight wraps the clock.
pub fn offset_time_of_day(date: NaiveDate, time: NaiveTime, offset_ms: i64) -> Result<NaiveTime> {
    let timestamp = date.and_time(time);

    Duration::try_milliseconds(offset_ms)
        .and_then(|offset| timestamp.checked_add_signed(offset))
        .map(|shifted| shifted.time())
        .ok_or_else(|| Error::OutOfRange(format!("{} shifted by {}ms", timestamp, offset_ms)))
}

/// Format a time of day as `HH:MM:SS`
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn split_numeric(text: &str, expected: usize) -> Option<Vec<u32>> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != expected {
        return None;
    }

    parts.iter().map(|p| p.trim().parse::<u32>().ok()).collect()
}
