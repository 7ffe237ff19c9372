use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// Best geocoding match for a city query.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// `"<name> (<country>)"`, or just `"<name>"` when the country is unknown.
    pub canonical_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// Wall-clock hour at the queried location, `HH:MM`.
    pub display_time: String,
    pub temperature: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Polish day abbreviation followed by `dd.mm`, e.g. `Śr 15.05`.
    pub display_day: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub condition: Condition,
}

/// Everything the display layer needs to render one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_display_name: String,
    pub current_temp: f64,
    pub current_condition: Condition,
    /// At most 24 entries, starting at the current or next hour.
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

/// Outcome of a city lookup that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(WeatherSnapshot),
    NotFound { query: String },
}

impl Lookup {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            Lookup::Found(snapshot) => Some(snapshot),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound { .. })
    }
}
