//! Error types for dataset generation.
//!
//! Configuration errors are reported before any random draw is made.
//! `MissingWeather` is an internal invariant violation: the weather phase
//! covers every day of the range, so hitting it means a logic fault.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("event count must be positive, got {0}")]
    NonPositiveEventCount(i64),

    #[error("cannot place {requested} events on distinct days in a {days}-day range")]
    TooManyEvents { requested: usize, days: usize },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("no weather entry for {0}; weather table does not cover the date range")]
    MissingWeather(NaiveDate),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// True for errors caused by bad user configuration rather than a
    /// fault inside the generator or the filesystem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GeneratorError::InvalidDateRange { .. }
                | GeneratorError::NonPositiveEventCount(_)
                | GeneratorError::TooManyEvents { .. }
                | GeneratorError::InvalidDate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        let start = NaiveDate::from_ymd_opt(2045, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2045, 1, 1).unwrap();

        assert!(GeneratorError::InvalidDateRange { start, end }.is_config_error());
        assert!(GeneratorError::NonPositiveEventCount(0).is_config_error());
        assert!(!GeneratorError::MissingWeather(start).is_config_error());
    }

    #[test]
    fn test_error_messages() {
        let date = NaiveDate::from_ymd_opt(2045, 3, 4).unwrap();
        let msg = GeneratorError::MissingWeather(date).to_string();
        assert!(msg.contains("2045-03-04"));

        let msg = GeneratorError::TooManyEvents { requested: 5, days: 3 }.to_string();
        assert!(msg.contains("5 events"));
    }
}
