//! Galactic event generation.
//!
//! Events are spread evenly across the date range. Each one gets a random
//! type and intensity, and an id of the form `E001`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::error::{GeneratorError, Result};

/// Inclusive bounds for event intensity.
pub const MIN_INTENSITY: u8 = 5;
pub const MAX_INTENSITY: u8 = 10;

/// Kinds of galactic event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SolarFlare,
    CosmicStorm,
    AsteroidFlyby,
}

impl EventType {
    pub fn all() -> &'static [EventType] {
        &[EventType::SolarFlare, EventType::CosmicStorm, EventType::AsteroidFlyby]
    }

    /// Label written to the events table
    pub fn label(&self) -> &'static str {
        match self {
            EventType::SolarFlare => "solar_flare",
            EventType::CosmicStorm => "cosmic_storm",
            EventType::AsteroidFlyby => "asteroid_flyby",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A dated galactic event. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalacticEvent {
    pub event_id: String,
    pub date: NaiveDate,
    pub event_type: EventType,
    pub intensity: u8,
}

/// Format the id for the event at 0-based position `index`.
pub fn event_id(index: usize) -> String {
    format!("E{:03}", index + 1)
}

/// Lookup from calendar day to the id of the event on that day.
#[derive(Clone, Debug, Default)]
pub struct EventIndex {
    by_date: BTreeMap<NaiveDate, String>,
}

impl EventIndex {
    pub fn from_events(events: &[GalacticEvent]) -> Self {
        let by_date = events
            .iter()
            .map(|e| (e.date, e.event_id.clone()))
            .collect();
        Self { by_date }
    }

    /// Id of the event on exactly this day, if any.
    pub fn event_on(&self, date: NaiveDate) -> Option<&str> {
        self.by_date.get(&date).map(String::as_str)
    }

    pub fn is_event_day(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// Generate `count` events evenly spaced across `range`.
///
/// Draws per event, in order: event type, then intensity.
pub fn generate_events(
    range: &DateRange,
    count: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<GalacticEvent>> {
    if count == 0 {
        return Err(GeneratorError::NonPositiveEventCount(0));
    }
    if count > range.len() {
        return Err(GeneratorError::TooManyEvents {
            requested: count,
            days: range.len(),
        });
    }

    let types = EventType::all();
    let events: Vec<GalacticEvent> = range
        .evenly_spaced(count)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let event_type = types[rng.gen_range(0..types.len())];
            let intensity = rng.gen_range(MIN_INTENSITY..=MAX_INTENSITY);
            GalacticEvent {
                event_id: event_id(i),
                date,
                event_type,
                intensity,
            }
        })
        .collect();

    debug!("Generated {} galactic events over {}", events.len(), range);
    Ok(events)
}
