//! The full generation pipeline.
//!
//! # Usage
//!
//! ```ignore
//! use mars_colony_data::config::GeneratorConfig;
//! use mars_colony_data::dataset::Dataset;
//!
//! let dataset = Dataset::generate(&GeneratorConfig::default())?;
//! println!("{}", dataset.stats());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::calendar::DateRange;
use crate::config::GeneratorConfig;
use crate::consumption::{generate_consumption, ConsumptionRecord, Resource};
use crate::error::Result;
use crate::events::{generate_events, EventIndex, GalacticEvent};
use crate::weather::{generate_weather, WeatherTable};

/// The three generated tables
#[derive(Clone, Debug)]
pub struct Dataset {
    pub range: DateRange,
    pub events: Vec<GalacticEvent>,
    pub weather: WeatherTable,
    pub consumption: Vec<ConsumptionRecord>,
}

impl Dataset {
    /// Seed a fresh generator from `config.seed` and run the pipeline.
    pub fn generate(config: &GeneratorConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        generate_dataset(config, &mut rng)
    }

    /// Event lookup by date, rebuilt from the event table.
    pub fn event_index(&self) -> EventIndex {
        EventIndex::from_events(&self.events)
    }

    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            event_count: self.events.len(),
            weather_days: self.weather.len(),
            consumption_records: self.consumption.len(),
            extreme_days: self.weather.iter().filter(|d| d.is_extreme()).count(),
            ..Default::default()
        };

        for record in &self.consumption {
            *stats.totals.entry(record.resource).or_insert(0.0) += record.quantity;
            stats.max_factor = stats.max_factor.max(record.factor());
        }
        stats
    }
}

/// Run event, weather and consumption generation in order on one generator.
///
/// The configuration is validated before the first draw, and nothing is
/// returned unless all three phases succeed.
pub fn generate_dataset(config: &GeneratorConfig, rng: &mut ChaCha8Rng) -> Result<Dataset> {
    let (range, event_count) = config.validate()?;
    info!(
        "Generating dataset for {} ({} days, {} events)",
        range,
        range.len(),
        event_count
    );

    let events = generate_events(&range, event_count, rng)?;
    let index = EventIndex::from_events(&events);
    let weather = generate_weather(&range, &index, rng);
    let consumption = generate_consumption(&range, &weather, &index, rng)?;

    Ok(Dataset {
        range,
        events,
        weather,
        consumption,
    })
}

/// Summary of a generated dataset
#[derive(Clone, Debug, Default)]
pub struct DatasetStats {
    pub event_count: usize,
    pub weather_days: usize,
    pub consumption_records: usize,
    pub extreme_days: usize,
    /// Total scaled quantity per resource
    pub totals: BTreeMap<Resource, f64>,
    /// Largest multiplier applied to any record
    pub max_factor: f64,
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Galactic events: {}", self.event_count)?;
        writeln!(
            f,
            "  Weather days: {} ({} extreme)",
            self.weather_days, self.extreme_days
        )?;
        writeln!(f, "  Consumption records: {}", self.consumption_records)?;
        for (resource, total) in &self.totals {
            writeln!(f, "    {}: {:.1}", resource, total)?;
        }
        write!(f, "  Max multiplier: {}x", self.max_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use chrono::NaiveDate;
    use rand::RngCore;

    #[test]
    fn test_default_run_shape() {
        let dataset = Dataset::generate(&GeneratorConfig::default()).unwrap();
        let stats = dataset.stats();

        assert_eq!(stats.event_count, 20);
        assert_eq!(stats.weather_days, 365);
        assert_eq!(stats.consumption_records, 365 * 3);
        assert_eq!(stats.extreme_days, 20);
        assert_eq!(stats.totals.len(), 3);
        assert!(stats.max_factor >= 20.0);
    }

    #[test]
    fn test_minimal_scenario() {
        let dataset = Dataset::generate(&GeneratorConfig::minimal()).unwrap();
        let event_day = NaiveDate::from_ymd_opt(2045, 1, 2).unwrap();

        assert_eq!(dataset.events.len(), 1);
        assert_eq!(dataset.events[0].date, event_day);
        assert_eq!(dataset.weather.len(), 3);
        assert_eq!(dataset.consumption.len(), 9);
        assert!(dataset.weather.get(event_day).unwrap().is_extreme());

        for record in &dataset.consumption {
            if record.date == event_day {
                assert_eq!(record.event_id.as_deref(), Some("E001"));
                assert_eq!(record.factor() % 20.0, 0.0);
            } else {
                assert!(record.event_id.is_none());
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let config = GeneratorConfig::default();
        let a = Dataset::generate(&config).unwrap();
        let b = Dataset::generate(&config).unwrap();

        assert_eq!(a.events, b.events);
        assert_eq!(a.consumption, b.consumption);
        assert!(a.weather.iter().eq(b.weather.iter()));
    }

    #[test]
    fn test_different_seed_differs() {
        let a = Dataset::generate(&GeneratorConfig::default()).unwrap();
        let b = Dataset::generate(&GeneratorConfig {
            seed: 43,
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a.consumption, b.consumption);
    }

    #[test]
    fn test_invalid_config_draws_nothing() {
        let config = GeneratorConfig {
            event_count: 0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut untouched = rng.clone();

        assert!(matches!(
            generate_dataset(&config, &mut rng),
            Err(GeneratorError::NonPositiveEventCount(0))
        ));
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }
}
