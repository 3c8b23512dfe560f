//! Timestamp formatting utilities
//!
//! The plain-text renderer prints a short wall clock, the JSON renderer a
//! full ISO 8601 stamp with the numeric zone offset.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// 12-hour clock with seconds, no date: `3:04:05 PM`
    #[default]
    Clock,

    /// ISO 8601 with milliseconds and numeric offset: `2025-01-08T10:30:45.123+0700`
    Iso8601Offset,
}

impl TimestampFormat {
    /// Format a datetime in its own zone according to this format
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{FixedOffset, TimeZone};
    /// use service_logger::core::TimestampFormat;
    ///
    /// let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    /// let dt = tz.with_ymd_and_hms(2025, 1, 8, 15, 4, 5).unwrap();
    /// assert_eq!(TimestampFormat::Clock.format(&dt), "3:04:05 PM");
    /// ```
    #[must_use]
    pub fn format<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Clock => datetime.format("%-I:%M:%S %p").to_string(),
            TimestampFormat::Iso8601Offset => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn fixed_datetime(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2025, 1, 8, hour, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(TimestampFormat::Clock.format(&fixed_datetime(10)), "10:30:45 AM");
        assert_eq!(TimestampFormat::Clock.format(&fixed_datetime(15)), "3:30:45 PM");
        assert_eq!(TimestampFormat::Clock.format(&fixed_datetime(0)), "12:30:45 AM");
    }

    #[test]
    fn test_iso8601_offset_format() {
        let result = TimestampFormat::Iso8601Offset.format(&fixed_datetime(10));
        assert_eq!(result, "2025-01-08T10:30:45.123+0700");
    }

    #[test]
    fn test_negative_offset() {
        let dt = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 1, 23, 0, 0)
            .unwrap();
        assert_eq!(
            TimestampFormat::Iso8601Offset.format(&dt),
            "2025-06-01T23:00:00.000-0500"
        );
    }

    #[test]
    fn test_default_is_clock() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Clock);
    }
}
