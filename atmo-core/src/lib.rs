//! Core library for the `atmo` weather viewer.
//!
//! This crate defines:
//! - Classification of WMO weather codes into display conditions
//! - Open-Meteo geocoding and forecast providers
//! - The city lookup entry point used by front ends
//! - Configuration and the favorites store
//!
//! It is used by `atmo-cli`, but can also be reused by other front ends.

pub mod condition;
pub mod config;
pub mod error;
pub mod favorites;
pub mod lookup;
pub mod model;
pub mod provider;

pub use condition::{Condition, Icon};
pub use config::Config;
pub use error::{LookupError, Service};
pub use favorites::FavoritesStore;
pub use lookup::WeatherLookup;
pub use model::{Coordinates, DailyEntry, HourlyEntry, Lookup, WeatherSnapshot};
pub use provider::{ForecastFetcher, Geocoder};
