//! Configuration for dataset generation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::error::{GeneratorError, Result};

/// Seed used when none is given, so repeated runs produce identical tables.
pub const DEFAULT_SEED: u64 = 42;

/// Number of galactic events spread across the range by default.
pub const DEFAULT_EVENT_COUNT: i64 = 20;

/// Where the three tables are written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub consumption: PathBuf,
    pub weather: PathBuf,
    pub events: PathBuf,
}

impl OutputPaths {
    /// Standard file names placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            consumption: dir.join("alien_consumption.csv"),
            weather: dir.join("mars_weather.csv"),
            events: dir.join("galactic_events.csv"),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.consumption, &self.weather, &self.events]
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

/// Configuration parameters for one generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the single random stream shared by all phases.
    pub seed: u64,

    /// First day of generated data.
    pub start_date: NaiveDate,

    /// Last day of generated data (inclusive).
    pub end_date: NaiveDate,

    /// Number of galactic events. Signed so a bad value from a config file
    /// is reported instead of wrapping.
    pub event_count: i64,

    pub output: OutputPaths,

    /// Starter notebook destination; `None` skips it.
    pub notebook_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start_date: NaiveDate::from_ymd_opt(2045, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2045, 12, 31).unwrap_or_default(),
            event_count: DEFAULT_EVENT_COUNT,
            output: OutputPaths::default(),
            notebook_path: Some(PathBuf::from(crate::notebook::DEFAULT_NOTEBOOK_PATH)),
        }
    }
}

impl GeneratorConfig {
    /// Three days with one event in the middle; small enough to inspect by hand.
    pub fn minimal() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2045, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2045, 1, 3).unwrap_or_default(),
            event_count: 1,
            notebook_path: None,
            ..Default::default()
        }
    }

    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Check the configuration and return the validated range and event count.
    pub fn validate(&self) -> Result<(DateRange, usize)> {
        let range = self.date_range()?;

        if self.event_count <= 0 {
            return Err(GeneratorError::NonPositiveEventCount(self.event_count));
        }
        let requested = self.event_count as usize;
        if requested > range.len() {
            return Err(GeneratorError::TooManyEvents {
                requested,
                days: range.len(),
            });
        }

        Ok((range, requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.event_count, 20);

        let (range, count) = config.validate().unwrap();
        assert_eq!(range.len(), 365);
        assert_eq!(count, 20);
        assert_eq!(config.output.weather, PathBuf::from("data/mars_weather.csv"));
    }

    #[test]
    fn test_rejects_non_positive_event_count() {
        let config = GeneratorConfig {
            event_count: 0,
            ..GeneratorConfig::minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::NonPositiveEventCount(0))
        ));

        let config = GeneratorConfig {
            event_count: -3,
            ..GeneratorConfig::minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::NonPositiveEventCount(-3))
        ));
    }

    #[test]
    fn test_rejects_more_events_than_days() {
        let config = GeneratorConfig {
            event_count: 4,
            ..GeneratorConfig::minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::TooManyEvents { requested: 4, days: 3 })
        ));
    }

    #[test]
    fn test_rejects_reversed_range() {
        let config = GeneratorConfig {
            start_date: NaiveDate::from_ymd_opt(2045, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2045, 5, 1).unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "seed": 7, "end_date": "2045-01-31" }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.event_count, 20);
        assert_eq!(config.validate().unwrap().0.len(), 31);
    }
}
