//! Naive datetime helpers.
//!
//! All temporal bookkeeping in the core is timezone-free: dates and times
//! come from corpus text and are combined and shifted without any clock
//! access.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Invalid or out-of-range calendar value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    /// Not a valid `HH:MM` or `HH:MM:SS` time of day.
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    /// A datetime shift left the representable range.
    #[error("datetime arithmetic out of range")]
    OutOfRange,
}

/// Parse a `YYYY-MM-DD` date, validating calendar ranges.
pub fn parse_date(text: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(text.to_string()))
}

/// Parse a `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time(text: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| TimeError::InvalidTime(text.to_string()))
}

/// Shift a datetime by a signed number of minutes.
pub fn add_minutes(datetime: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime, TimeError> {
    datetime
        .checked_add_signed(Duration::minutes(minutes))
        .ok_or(TimeError::OutOfRange)
}

/// Whole minutes from `from` to `to` (negative when `to` is earlier).
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_minutes()
}

/// Canonical time rendering: `HH:MM`, with seconds only when nonzero.
pub fn format_time(time: NaiveTime) -> String {
    use chrono::Timelike;
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Canonical datetime rendering: `YYYY-MM-DD HH:MM[:SS]`.
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    format!(
        "{} {}",
        datetime.date().format("%Y-%m-%d"),
        format_time(datetime.time())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("2024.01.01").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("10:00").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("10.30").is_err());
    }

    #[test]
    fn test_add_minutes_crosses_midnight() {
        let start = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let shifted = add_minutes(start, 45).unwrap();
        assert_eq!(format_datetime(shifted), "2026-01-01 00:15");
    }

    #[test]
    fn test_minutes_between() {
        let a = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let b = add_minutes(a, 90).unwrap();
        assert_eq!(minutes_between(a, b), 90);
        assert_eq!(minutes_between(b, a), -90);
    }

    #[test]
    fn test_format_time_seconds_only_when_nonzero() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 0).unwrap()), "09:05");
        assert_eq!(
            format_time(NaiveTime::from_hms_opt(9, 5, 7).unwrap()),
            "09:05:07"
        );
    }
}
