use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{Config, DEFAULT_GEOCODING_URL, DEFAULT_LANGUAGE},
    error::{LookupError, Service},
    model::Coordinates,
};

use super::{Geocoder, get_json};

/// Open-Meteo geocoding search.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
    language: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            url: DEFAULT_GEOCODING_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(http)
            .with_url(&config.geocoding_url)
            .with_language(&config.language)
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

impl From<GeoResult> for Coordinates {
    fn from(result: GeoResult) -> Self {
        Coordinates {
            latitude: result.latitude,
            longitude: result.longitude,
            canonical_name: canonical_name(&result.name, result.country.as_deref()),
        }
    }
}

/// `"Szczecin (Polska)"`, or the bare name when no country was returned.
pub fn canonical_name(name: &str, country: Option<&str>) -> String {
    match country.filter(|c| !c.is_empty()) {
        Some(country) => format!("{name} ({country})"),
        None => name.to_string(),
    }
}

/// Bare place name to search for again: `"Szczecin (Polska)"` gives
/// `"Szczecin"`.
pub fn search_name(canonical: &str) -> &str {
    canonical
        .split_once(" (")
        .map_or(canonical, |(name, _)| name)
        .trim()
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, city: &str) -> Result<Option<Coordinates>, LookupError> {
        let parsed: GeoResponse = get_json(
            &self.http,
            Service::Geocoding,
            &self.url,
            &[
                ("name", city),
                ("count", "1"),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
        )
        .await?;

        let Some(best) = parsed.results.and_then(|r| r.into_iter().next()) else {
            tracing::debug!("No geocoding match for '{}'", city);
            return Ok(None);
        };

        let coords = Coordinates::from(best);
        tracing::info!(
            "Resolved '{}' to {} ({:.4}, {:.4})",
            city,
            coords.canonical_name,
            coords.latitude,
            coords.longitude
        );
        Ok(Some(coords))
    }
}
