use crate::{
    Config, Coordinates, WeatherSnapshot,
    error::{LookupError, Service},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub mod forecast;
pub mod geocoding;

pub use forecast::OpenMeteoForecast;
pub use geocoding::OpenMeteoGeocoder;

const USER_AGENT: &str = concat!("atmo/", env!("CARGO_PKG_VERSION"));

/// Resolves free-text city names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `Ok(None)` when the service knows no such place.
    async fn resolve(&self, city: &str) -> Result<Option<Coordinates>, LookupError>;
}

/// Fetches and normalizes a forecast for a resolved location.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch(
        &self,
        city_display_name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, LookupError>;
}

/// Build the HTTP client shared by both providers.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout())
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Send a GET request and decode a JSON body, mapping failures onto
/// [`LookupError`].
pub(crate) async fn get_json<T, Q>(
    http: &Client,
    service: Service,
    url: &str,
    query: &Q,
) -> Result<T, LookupError>
where
    T: DeserializeOwned,
    Q: serde::Serialize + ?Sized,
{
    tracing::debug!("Sending {} request to {}", service, url);

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| LookupError::Transport { service, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| LookupError::Transport { service, source })?;

    if !status.is_success() {
        tracing::warn!("{} request failed with status {}", service, status);
        return Err(LookupError::Status {
            service,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| LookupError::parse(service, e.to_string()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("Not Found"), "Not Found");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = "ś".repeat(250);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn http_client_builds_from_default_config() {
        assert!(http_client(&Config::default()).is_ok());
    }
}
