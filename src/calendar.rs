//! Calendar ranges at daily granularity.
//!
//! All dates are `NaiveDate`: there is no time of day and no timezone, so
//! two dates are the same day exactly when they compare equal.

use std::fmt;

use chrono::{Days, NaiveDate};

use crate::error::{GeneratorError, Result};

/// Text form used for every date written to disk.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| GeneratorError::InvalidDate(text.to_string()))
}

/// Inclusive range of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(GeneratorError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Every day of the given calendar year.
    pub fn year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| GeneratorError::InvalidDate(format!("{}-01-01", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| GeneratorError::InvalidDate(format!("{}-12-31", year)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, endpoints included.
    pub fn len(&self) -> usize {
        self.span_days() as usize + 1
    }

    /// A valid range always holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Days between start and end (0 for a single-day range).
    pub fn span_days(&self) -> u64 {
        self.end.signed_duration_since(self.start).num_days() as u64
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate over every day in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }

    /// The day `offset` days after the start, if it lies in the range.
    pub fn day_at(&self, offset: u64) -> Option<NaiveDate> {
        self.start
            .checked_add_days(Days::new(offset))
            .filter(|d| *d <= self.end)
    }

    /// `count` dates evenly spaced by calendar position, endpoints included.
    ///
    /// Position `i` of `count` lands on day `floor(i * span / (count - 1))`,
    /// the same day a midnight-normalized evenly spaced timestamp falls on.
    /// A single date is placed at the midpoint. Distinct positions map to
    /// distinct days whenever `count <= len()`.
    pub fn evenly_spaced(&self, count: usize) -> Vec<NaiveDate> {
        let span = self.span_days();
        match count {
            0 => Vec::new(),
            1 => self.day_at(span / 2).into_iter().collect(),
            _ => {
                let steps = (count - 1) as u64;
                (0..count as u64)
                    .filter_map(|i| self.day_at(i * span / steps))
                    .collect()
            }
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::new(date(2045, 1, 3), date(2045, 1, 1)).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_year_length() {
        assert_eq!(DateRange::year(2045).unwrap().len(), 365);
        assert_eq!(DateRange::year(2048).unwrap().len(), 366);
    }

    #[test]
    fn test_days_are_contiguous() {
        let range = DateRange::new(date(2045, 2, 27), date(2045, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![date(2045, 2, 27), date(2045, 2, 28), date(2045, 3, 1), date(2045, 3, 2)]
        );
    }

    #[test]
    fn test_evenly_spaced_includes_endpoints() {
        let range = DateRange::year(2045).unwrap();
        let dates = range.evenly_spaced(20);

        assert_eq!(dates.len(), 20);
        assert_eq!(dates[0], date(2045, 1, 1));
        assert_eq!(dates[19], date(2045, 12, 31));
        // 364 / 19 = 19.157..., floored
        assert_eq!(dates[1], date(2045, 1, 20));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_evenly_spaced_single_is_midpoint() {
        let range = DateRange::new(date(2045, 1, 1), date(2045, 1, 3)).unwrap();
        assert_eq!(range.evenly_spaced(1), vec![date(2045, 1, 2)]);
    }

    #[test]
    fn test_evenly_spaced_every_day() {
        let range = DateRange::new(date(2045, 1, 1), date(2045, 1, 5)).unwrap();
        let dates = range.evenly_spaced(5);
        assert_eq!(dates, range.days().collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2045-01-02").unwrap(), date(2045, 1, 2));
        assert!(matches!(parse_date("01/02/2045"), Err(GeneratorError::InvalidDate(_))));
    }
}
