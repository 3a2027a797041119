//! Utility functions used across the citegraph workspace

use crate::{CiteGraphError, Result, DATE_FORMAT};
use chrono::{Datelike, NaiveDate};

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        CiteGraphError::Validation {
            message: format!("invalid date '{}': {}", value, e),
            field: Some("Date".to_string()),
        }
    })
}

/// Format a date the way it appears in the log and on chart axes
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whether a date gets a vertical reference line (1st and 15th of the month)
pub fn is_gridline_day(date: NaiveDate) -> bool {
    matches!(date.day(), 1 | 15)
}

/// Truncate to `max_chars` characters and append `...`
///
/// Counts characters rather than bytes so titles with non-ASCII text never
/// split inside a code point.
pub fn truncate_with_ellipsis(value: &str, max_chars: usize) -> String {
    let truncated: String = value.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_iso_date("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        assert!(parse_iso_date(" 2024-02-29 ").is_ok());
        assert!(parse_iso_date("2023-02-29").is_err());
        assert!(parse_iso_date("15/01/2024").is_err());
        assert!(parse_iso_date("").is_err());
    }

    #[test]
    fn test_format_iso_date_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_iso_date(date), "2024-03-05");
    }

    #[test]
    fn test_is_gridline_day() {
        assert!(is_gridline_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(is_gridline_day(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(!is_gridline_day(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()));
        assert!(!is_gridline_day(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        assert_eq!(truncate_with_ellipsis("ab", 40), "ab...");
        assert_eq!(truncate_with_ellipsis("Ünïcödé", 4), "Ünïc...");
    }
}
