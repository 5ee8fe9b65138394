//! Daily Martian weather.
//!
//! Ordinary days draw temperature and solar radiation from continuous
//! ranges. Days with a galactic event draw from a small extreme set instead.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::events::EventIndex;

// =============================================================================
// VALUE RANGES
// =============================================================================

/// Temperature range on ordinary days (°C)
pub const NORMAL_TEMPERATURE: Range<f64> = -80.0..20.0;

/// Solar radiation range on ordinary days (kWh/m²)
pub const NORMAL_RADIATION: Range<f64> = 5.0..10.0;

/// Possible temperatures on event days
pub const EXTREME_TEMPERATURES: [f64; 2] = [-80.0, 50.0];

/// Possible radiation values on event days
pub const EXTREME_RADIATION: [f64; 2] = [0.0, 15.0];

// =============================================================================
// WEATHER TABLE
// =============================================================================

/// Weather for one day
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub avg_temperature_celsius: f64,
    pub solar_radiation_kwh_m2: f64,
}

impl WeatherDay {
    /// Whether both values come from the event-day sets
    pub fn is_extreme(&self) -> bool {
        EXTREME_TEMPERATURES.contains(&self.avg_temperature_celsius)
            && EXTREME_RADIATION.contains(&self.solar_radiation_kwh_m2)
    }
}

/// One weather entry per calendar day, keyed by date.
#[derive(Clone, Debug, Default)]
pub struct WeatherTable {
    days: BTreeMap<NaiveDate, WeatherDay>,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day, replacing any existing entry for that date.
    pub fn insert(&mut self, day: WeatherDay) {
        self.days.insert(day.date, day);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WeatherDay> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in date order
    pub fn iter(&self) -> impl Iterator<Item = &WeatherDay> {
        self.days.values()
    }
}

/// Generate weather for every day of `range`.
///
/// Draws per day, in order: temperature, then radiation.
pub fn generate_weather(
    range: &DateRange,
    events: &EventIndex,
    rng: &mut ChaCha8Rng,
) -> WeatherTable {
    let mut table = WeatherTable::new();
    let mut extreme_days = 0usize;

    for date in range.days() {
        let day = if events.is_event_day(date) {
            extreme_days += 1;
            let temperature = EXTREME_TEMPERATURES[rng.gen_range(0..EXTREME_TEMPERATURES.len())];
            let radiation = EXTREME_RADIATION[rng.gen_range(0..EXTREME_RADIATION.len())];
            WeatherDay {
                date,
                avg_temperature_celsius: temperature,
                solar_radiation_kwh_m2: radiation,
            }
        } else {
            let temperature = rng.gen_range(NORMAL_TEMPERATURE);
            let radiation = rng.gen_range(NORMAL_RADIATION);
            WeatherDay {
                date,
                avg_temperature_celsius: temperature,
                solar_radiation_kwh_m2: radiation,
            }
        };
        table.insert(day);
    }

    debug!(
        "Generated weather for {} days ({} extreme)",
        table.len(),
        extreme_days
    );
    table
}
