use std::sync::Arc;

use crate::{
    Config,
    error::LookupError,
    model::Lookup,
    provider::{ForecastFetcher, Geocoder, OpenMeteoForecast, OpenMeteoGeocoder, http_client},
};

/// Single entry point for the display layer: city name in, snapshot out.
///
/// Holds no per-lookup state, so one instance can serve any number of
/// concurrent lookups; clones share the same providers.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastFetcher>,
}

impl WeatherLookup {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastFetcher>) -> Self {
        Self { geocoder, forecast }
    }

    /// Open-Meteo providers sharing one HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config)?;

        Ok(Self::new(
            Arc::new(OpenMeteoGeocoder::from_config(http.clone(), config)),
            Arc::new(OpenMeteoForecast::from_config(http, config)),
        ))
    }

    /// Resolve `city`, then fetch its forecast.
    ///
    /// The forecast service is only contacted when geocoding found a match.
    pub async fn lookup(&self, city: &str) -> Result<Lookup, LookupError> {
        let Some(coords) = self.geocoder.resolve(city).await? else {
            return Ok(Lookup::NotFound {
                query: city.to_string(),
            });
        };

        let snapshot = self
            .forecast
            .fetch(&coords.canonical_name, coords.latitude, coords.longitude)
            .await?;

        Ok(Lookup::Found(snapshot))
    }

    /// Canonical name for `city`, without fetching a forecast.
    pub async fn canonical_name(&self, city: &str) -> Result<Option<String>, LookupError> {
        Ok(self
            .geocoder
            .resolve(city)
            .await?
            .map(|coords| coords.canonical_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::Condition,
        error::Service,
        model::{Coordinates, WeatherSnapshot},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedGeocoder(Option<Coordinates>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, _city: &str) -> Result<Option<Coordinates>, LookupError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct BrokenGeocoder;

    #[async_trait]
    impl Geocoder for BrokenGeocoder {
        async fn resolve(&self, _city: &str) -> Result<Option<Coordinates>, LookupError> {
            Err(LookupError::parse(Service::Geocoding, "expected value at line 1"))
        }
    }

    #[derive(Debug, Default)]
    struct CountingForecast {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastFetcher for CountingForecast {
        async fn fetch(
            &self,
            city_display_name: &str,
            latitude: f64,
            longitude: f64,
        ) -> Result<WeatherSnapshot, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherSnapshot {
                city_display_name: city_display_name.to_string(),
                current_temp: latitude + longitude,
                current_condition: Condition::from_code(61),
                hourly: Vec::new(),
                daily: Vec::new(),
            })
        }
    }

    fn szczecin() -> Coordinates {
        Coordinates {
            latitude: 53.4,
            longitude: 14.55,
            canonical_name: "Szczecin (Poland)".into(),
        }
    }

    #[tokio::test]
    async fn found_city_is_fetched_under_canonical_name() {
        let forecast = Arc::new(CountingForecast::default());
        let lookup = WeatherLookup::new(Arc::new(FixedGeocoder(Some(szczecin()))), forecast.clone());

        let result = lookup.lookup("Szczecin").await.expect("lookup");
        let snapshot = result.snapshot().expect("found");

        assert_eq!(snapshot.city_display_name, "Szczecin (Poland)");
        assert_eq!(snapshot.current_temp, 53.4 + 14.55);
        assert_eq!(snapshot.current_condition.description(), "Umiarkowany deszcz");
        assert_eq!(forecast.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_skips_forecast() {
        let forecast = Arc::new(CountingForecast::default());
        let lookup = WeatherLookup::new(Arc::new(FixedGeocoder(None)), forecast.clone());

        let result = lookup.lookup("Atlantyda").await.expect("lookup");

        assert_eq!(
            result,
            Lookup::NotFound {
                query: "Atlantyda".into()
            }
        );
        assert!(result.is_not_found());
        assert_eq!(forecast.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn geocoding_errors_propagate() {
        let forecast = Arc::new(CountingForecast::default());
        let lookup = WeatherLookup::new(Arc::new(BrokenGeocoder), forecast.clone());

        let err = lookup.lookup("Szczecin").await.unwrap_err();

        assert!(err.is_parse());
        assert_eq!(err.service(), Service::Geocoding);
        assert_eq!(forecast.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn canonical_name_only_geocodes() {
        let forecast = Arc::new(CountingForecast::default());
        let lookup = WeatherLookup::new(Arc::new(FixedGeocoder(Some(szczecin()))), forecast.clone());

        let name = lookup.canonical_name("szczecin").await.expect("resolve");

        assert_eq!(name.as_deref(), Some("Szczecin (Poland)"));
        assert_eq!(forecast.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn from_default_config_builds() {
        assert!(WeatherLookup::from_config(&Config::default()).is_ok());
    }
}
