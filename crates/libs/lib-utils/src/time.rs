//! # Time Utilities
//!
//! Utilities for time formatting and claim timestamps using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Get the current time as Unix seconds (claim `iat`/`exp` format).
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parse RFC3339 string to UTC DateTime.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::FailToDateParse(moment.to_string()))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_round_trip() {
        let now = now_utc();
        let parsed = parse_utc(&format_time(now)).expect("RFC3339 round trip should parse");
        assert_eq!(parsed.timestamp(), now.timestamp());
    }

    #[test]
    fn test_parse_utc_rejects_garbage() {
        assert!(parse_utc("not-a-date").is_err());
    }
}
