//! Human-friendly and JSON output for lookup results.

use std::fmt;

use atmo_core::{Lookup, LookupError, WeatherSnapshot};
use serde_json::{Value, json};

pub const NOT_FOUND: &str = "Nie znaleziono";

/// Text rendering of one snapshot, with a star for favorites.
pub struct SnapshotView<'a> {
    pub snapshot: &'a WeatherSnapshot,
    pub favorite: bool,
}

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        let star = if self.favorite { " ★" } else { "" };

        writeln!(f, "{}{}", snapshot.city_display_name, star)?;
        writeln!(
            f,
            "  {:.1}°C  {} [{}]",
            snapshot.current_temp,
            snapshot.current_condition,
            snapshot.current_condition.icon()
        )?;

        // Today's range comes from the first daily entry, when there is one.
        if let Some(today) = snapshot.daily.first() {
            writeln!(f, "  max {:.1}° / min {:.1}°", today.max_temp, today.min_temp)?;
        }

        if !snapshot.hourly.is_empty() {
            writeln!(f, "\nPrognoza godzinowa")?;
            for hour in &snapshot.hourly {
                writeln!(
                    f,
                    "  {}  {:>6.1}°C  {}",
                    hour.display_time, hour.temperature, hour.condition
                )?;
            }
        }

        if !snapshot.daily.is_empty() {
            writeln!(f, "\nPrognoza dzienna")?;
            for day in &snapshot.daily {
                writeln!(
                    f,
                    "  {:<10} {:>5.1}° / {:>5.1}°  {}",
                    day.display_day, day.max_temp, day.min_temp, day.condition
                )?;
            }
        }

        Ok(())
    }
}

pub fn snapshot_text(snapshot: &WeatherSnapshot, favorite: bool) -> String {
    SnapshotView { snapshot, favorite }.to_string()
}

pub fn not_found_text(query: &str) -> String {
    format!("{NOT_FOUND}: {query}\n")
}

/// One JSON object per requested city.
pub fn lookup_json(query: &str, result: &Result<Lookup, LookupError>) -> Value {
    match result {
        Ok(Lookup::Found(snapshot)) => json!({ "query": query, "snapshot": snapshot }),
        Ok(Lookup::NotFound { .. }) => json!({ "query": query, "snapshot": null }),
        Err(err) => json!({ "query": query, "error": err.to_string() }),
    }
}
