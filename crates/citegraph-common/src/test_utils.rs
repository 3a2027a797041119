//! Test utilities and shared fixtures for the citegraph workspace.
//!
//! Enabled for other crates through the `testing` feature.

use crate::{Observation, ObservationSet};
use chrono::NaiveDate;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Shorthand for a calendar date in fixtures.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Shorthand for an observation on an ISO date string.
pub fn obs(iso_date: &str, title: &str, citations: u64) -> Observation {
    let date = NaiveDate::parse_from_str(iso_date, crate::DATE_FORMAT)
        .expect("valid fixture date string");
    Observation::new(date, title, citations)
}

/// The two-paper, two-date scenario used throughout the test suites.
pub fn two_paper_scenario() -> ObservationSet {
    vec![
        obs("2024-01-01", "Paper A", 5),
        obs("2024-01-01", "Paper B", 2),
        obs("2024-01-15", "Paper A", 7),
        obs("2024-01-15", "Paper B", 2),
    ]
    .into()
}

/// Sparse history: A=[1,_,3], B=[_,2,2] over three dates.
pub fn sparse_scenario() -> ObservationSet {
    vec![
        obs("2024-01-01", "A", 1),
        obs("2024-01-03", "A", 3),
        obs("2024-01-02", "B", 2),
        obs("2024-01-03", "B", 2),
    ]
    .into()
}

/// A long-format CSV body with header for store and CLI tests.
pub fn long_format_csv(observations: &ObservationSet) -> String {
    let mut out = String::from("Date,Title,Citations\n");
    for o in observations {
        let title = if o.title.contains(',') || o.title.contains('"') {
            format!("\"{}\"", o.title.replace('"', "\"\""))
        } else {
            o.title.clone()
        };
        out.push_str(&format!(
            "{},{},{}\n",
            o.date.format(crate::DATE_FORMAT),
            title,
            o.citations
        ));
    }
    out
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shapes() {
        assert_eq!(two_paper_scenario().len(), 4);
        assert_eq!(sparse_scenario().len(), 4);
        assert_eq!(obs("2024-01-15", "X", 3).date, date(2024, 1, 15));
    }

    #[test]
    fn test_long_format_csv_quotes_commas() {
        let set: ObservationSet = vec![obs("2024-01-01", "Deep, Wide", 1)].into();
        let csv = long_format_csv(&set);
        assert_eq!(csv, "Date,Title,Citations\n2024-01-01,\"Deep, Wide\",1\n");
    }
}
