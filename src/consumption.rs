//! Alien resource consumption.
//!
//! Each day gets one record per resource. The base quantity is a uniform
//! draw from the resource's range, then scaled by independent multipliers
//! for extreme temperature, high radiation and galactic events.

use std::fmt;
use std::ops::Range;

use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::error::{GeneratorError, Result};
use crate::events::EventIndex;
use crate::weather::WeatherTable;

// =============================================================================
// SCALING RULES
// =============================================================================

/// Below this temperature consumption is scaled by `TEMPERATURE_MULTIPLIER`
pub const COLD_THRESHOLD: f64 = -50.0;

/// Above this temperature consumption is scaled by `TEMPERATURE_MULTIPLIER`
pub const HEAT_THRESHOLD: f64 = 10.0;

/// Radiation above this level scales consumption by `RADIATION_MULTIPLIER`
pub const RADIATION_THRESHOLD: f64 = 8.0;

pub const TEMPERATURE_MULTIPLIER: f64 = 10.0;
pub const RADIATION_MULTIPLIER: f64 = 6.0;
pub const EVENT_MULTIPLIER: f64 = 20.0;

/// Product of every multiplier: the largest possible scaling.
pub const MAX_MULTIPLIER: f64 = TEMPERATURE_MULTIPLIER * RADIATION_MULTIPLIER * EVENT_MULTIPLIER;

/// Combined multiplier for one record.
///
/// Each condition contributes its factor independently.
pub fn consumption_factor(temperature: f64, solar_radiation: f64, has_event: bool) -> f64 {
    let mut factor = 1.0;
    if temperature < COLD_THRESHOLD || temperature > HEAT_THRESHOLD {
        factor *= TEMPERATURE_MULTIPLIER;
    }
    if solar_radiation > RADIATION_THRESHOLD {
        factor *= RADIATION_MULTIPLIER;
    }
    if has_event {
        factor *= EVENT_MULTIPLIER;
    }
    factor
}

// =============================================================================
// RESOURCES
// =============================================================================

/// Colony resources, in generation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Power,
    Water,
    RareMinerals,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[Resource::Power, Resource::Water, Resource::RareMinerals]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resource::Power => "power",
            Resource::Water => "water",
            Resource::RareMinerals => "rare_minerals",
        }
    }

    /// Range of the unscaled daily draw
    pub fn base_range(&self) -> Range<f64> {
        match self {
            Resource::Power => 100.0..200.0,
            Resource::Water => 50.0..100.0,
            Resource::RareMinerals => 30.0..70.0,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Consumption of one resource on one day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub resource: Resource,
    pub quantity: f64,
    /// Copied from the day's weather
    pub temperature: f64,
    /// Copied from the day's weather
    pub solar_radiation: f64,
    pub event_id: Option<String>,
    /// Unscaled draw; kept for auditing, not exported
    #[serde(skip)]
    pub base_quantity: f64,
}

impl ConsumptionRecord {
    /// The multiplier implied by this record's own weather and event fields.
    pub fn factor(&self) -> f64 {
        consumption_factor(self.temperature, self.solar_radiation, self.event_id.is_some())
    }
}

/// Generate consumption records for every day and resource.
///
/// Draws one base quantity per (day, resource), days in order and resources
/// in `Resource::all()` order. A day without weather is a logic fault and
/// aborts the whole phase.
pub fn generate_consumption(
    range: &DateRange,
    weather: &WeatherTable,
    events: &EventIndex,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<ConsumptionRecord>> {
    let resources = Resource::all();
    let mut records = Vec::with_capacity(range.len() * resources.len());

    for date in range.days() {
        let day = weather
            .get(date)
            .ok_or(GeneratorError::MissingWeather(date))?;
        let event_id = events.event_on(date);

        for &resource in resources {
            let base_quantity = rng.gen_range(resource.base_range());
            let quantity = base_quantity
                * consumption_factor(
                    day.avg_temperature_celsius,
                    day.solar_radiation_kwh_m2,
                    event_id.is_some(),
                );

            records.push(ConsumptionRecord {
                date,
                resource,
                quantity,
                temperature: day.avg_temperature_celsius,
                solar_radiation: day.solar_radiation_kwh_m2,
                event_id: event_id.map(str::to_string),
                base_quantity,
            });
        }
    }

    debug!("Generated {} consumption records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{generate_weather, WeatherDay};
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_factor_rules() {
        assert_eq!(consumption_factor(0.0, 6.0, false), 1.0);
        assert_eq!(consumption_factor(-60.0, 6.0, false), 10.0);
        assert_eq!(consumption_factor(15.0, 6.0, false), 10.0);
        assert_eq!(consumption_factor(0.0, 9.0, false), 6.0);
        assert_eq!(consumption_factor(0.0, 6.0, true), 20.0);
        assert_eq!(consumption_factor(50.0, 15.0, true), MAX_MULTIPLIER);
        assert_eq!(MAX_MULTIPLIER, 1200.0);
    }

    #[test]
    fn test_factor_thresholds_are_strict() {
        assert_eq!(consumption_factor(COLD_THRESHOLD, 5.0, false), 1.0);
        assert_eq!(consumption_factor(HEAT_THRESHOLD, 5.0, false), 1.0);
        assert_eq!(consumption_factor(0.0, RADIATION_THRESHOLD, false), 1.0);
        // Extreme event-day values
        assert_eq!(consumption_factor(-80.0, 0.0, true), 200.0);
        assert_eq!(consumption_factor(50.0, 0.0, true), 200.0);
        assert_eq!(consumption_factor(-80.0, 15.0, true), 1200.0);
    }

    #[test]
    fn test_three_records_per_day_in_resource_order() {
        let range = DateRange::year(2045).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let events = EventIndex::default();
        let weather = generate_weather(&range, &events, &mut rng);
        let records = generate_consumption(&range, &weather, &events, &mut rng).unwrap();

        assert_eq!(records.len(), 365 * 3);
        for (chunk, date) in records.chunks(3).zip(range.days()) {
            let resources: Vec<_> = chunk.iter().map(|r| r.resource).collect();
            assert_eq!(resources, Resource::all());
            assert!(chunk.iter().all(|r| r.date == date));
        }
    }

    #[test]
    fn test_quantity_is_scaled_base() {
        let range = DateRange::year(2045).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let events = EventIndex::default();
        let weather = generate_weather(&range, &events, &mut rng);
        let records = generate_consumption(&range, &weather, &events, &mut rng).unwrap();

        for record in &records {
            assert!(record.quantity > 0.0);
            assert!(record.resource.base_range().contains(&record.base_quantity));
            assert_eq!(record.quantity, record.base_quantity * record.factor());

            let day = weather.get(record.date).unwrap();
            assert_eq!(record.temperature, day.avg_temperature_celsius);
            assert_eq!(record.solar_radiation, day.solar_radiation_kwh_m2);
            assert!(record.event_id.is_none());
        }
    }

    #[test]
    fn test_missing_weather_is_fatal() {
        let range = DateRange::new(date(2045, 1, 1), date(2045, 1, 2)).unwrap();
        let mut weather = WeatherTable::new();
        weather.insert(WeatherDay {
            date: date(2045, 1, 1),
            avg_temperature_celsius: 0.0,
            solar_radiation_kwh_m2: 6.0,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let result = generate_consumption(&range, &weather, &EventIndex::default(), &mut rng);
        match result {
            Err(GeneratorError::MissingWeather(d)) => assert_eq!(d, date(2045, 1, 2)),
            other => panic!("expected MissingWeather, got {:?}", other),
        }
    }
}
