//! Date formatting for offline captures and cooking notes.

use chrono::{DateTime, NaiveDate};

/// `Mar 4, 2025` for an offline capture time in epoch milliseconds.
pub fn format_saved_at(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// `Mar 4, 2025` for a `YYYY-MM-DD` date, or the input unchanged when it
/// doesn't parse.
pub fn format_day(day: &str) -> String {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| day.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_saved_at() {
        assert_eq!(format_saved_at(1_741_046_400_000), "Mar 4, 2025");
        assert_eq!(format_saved_at(i64::MAX), "unknown date");
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day("2024-12-25"), "Dec 25, 2024");
        assert_eq!(format_day("yesterday"), "yesterday");
    }
}
