use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Weekday};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    condition::Condition,
    config::{Config, DEFAULT_FORECAST_URL},
    error::{LookupError, Service},
    model::{DailyEntry, HourlyEntry, WeatherSnapshot},
};

use super::{ForecastFetcher, get_json};

/// Number of hourly entries kept in a snapshot.
pub const HOURS_SHOWN: usize = 24;

/// Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
    now: fn() -> NaiveDateTime,
}

impl OpenMeteoForecast {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            url: DEFAULT_FORECAST_URL.to_string(),
            now: local_now,
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(http).with_url(&config.forecast_url)
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Replace the wall clock used to find the current hour.
    pub fn with_clock(mut self, now: fn() -> NaiveDateTime) -> Self {
        self.now = now;
        self
    }
}

/// Naive wall-clock time of the machine running the viewer.
///
/// Hourly timestamps come back in the queried city's zone (`timezone=auto`),
/// so for a city in another zone the selected "current hour" is shifted by
/// the zone difference. Kept as is to match the desktop app.
fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weather_code: Vec<i32>,
}

#[async_trait]
impl ForecastFetcher for OpenMeteoForecast {
    async fn fetch(
        &self,
        city_display_name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, LookupError> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();

        let parsed: ForecastResponse = get_json(
            &self.http,
            Service::Forecast,
            &self.url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", "temperature_2m,weather_code"),
                ("hourly", "temperature_2m,weather_code"),
                ("daily", "weather_code,temperature_2m_max,temperature_2m_min"),
                ("timezone", "auto"),
            ],
        )
        .await?;

        build_snapshot(city_display_name, parsed, (self.now)())
    }
}

fn build_snapshot(
    city_display_name: &str,
    response: ForecastResponse,
    now: NaiveDateTime,
) -> Result<WeatherSnapshot, LookupError> {
    let hourly = hourly_entries(response.hourly, now)?;
    let daily = daily_entries(response.daily)?;

    tracing::debug!(
        "Forecast for {}: {} hourly, {} daily entries",
        city_display_name,
        hourly.len(),
        daily.len()
    );

    Ok(WeatherSnapshot {
        city_display_name: city_display_name.to_string(),
        current_temp: response.current.temperature_2m,
        current_condition: Condition::from_code(response.current.weather_code),
        hourly,
        daily,
    })
}

fn hourly_entries(
    block: HourlyBlock,
    now: NaiveDateTime,
) -> Result<Vec<HourlyEntry>, LookupError> {
    ensure_parallel(
        "hourly",
        block.time.len(),
        &[
            ("temperature_2m", block.temperature_2m.len()),
            ("weather_code", block.weather_code.len()),
        ],
    )?;

    let times = block
        .time
        .iter()
        .map(String::as_str)
        .map(parse_hour)
        .collect::<Result<Vec<_>, _>>()?;
    let start = current_hour_index(&times, now);

    Ok(times
        .iter()
        .zip(block.temperature_2m)
        .zip(block.weather_code)
        .skip(start)
        .take(HOURS_SHOWN)
        .map(|((time, temperature), code)| HourlyEntry {
            display_time: time.format("%H:%M").to_string(),
            temperature,
            condition: Condition::from_code(code),
        })
        .collect())
}

fn daily_entries(block: DailyBlock) -> Result<Vec<DailyEntry>, LookupError> {
    ensure_parallel(
        "daily",
        block.time.len(),
        &[
            ("temperature_2m_max", block.temperature_2m_max.len()),
            ("temperature_2m_min", block.temperature_2m_min.len()),
            ("weather_code", block.weather_code.len()),
        ],
    )?;

    block
        .time
        .iter()
        .zip(block.temperature_2m_max)
        .zip(block.temperature_2m_min)
        .zip(block.weather_code)
        .map(|(((day, max_temp), min_temp), code)| -> Result<DailyEntry, LookupError> {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
                LookupError::parse(Service::Forecast, format!("invalid date '{day}': {e}"))
            })?;
            Ok(DailyEntry {
                display_day: day_label(date),
                max_temp,
                min_temp,
                condition: Condition::from_code(code),
            })
        })
        .collect()
}

fn ensure_parallel(
    block: &str,
    expected: usize,
    series: &[(&str, usize)],
) -> Result<(), LookupError> {
    for (name, len) in series {
        if *len != expected {
            return Err(LookupError::parse(
                Service::Forecast,
                format!("{block}.{name} has {len} values, {block}.time has {expected}"),
            ));
        }
    }
    Ok(())
}

fn parse_hour(raw: &str) -> Result<NaiveDateTime, LookupError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| LookupError::parse(Service::Forecast, format!("invalid time '{raw}': {e}")))
}

/// Index of the first timestamp at or after `now`; 0 when every timestamp is
/// in the past.
pub fn current_hour_index(times: &[NaiveDateTime], now: NaiveDateTime) -> usize {
    times.iter().position(|t| *t >= now).unwrap_or(0)
}

pub fn day_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Pon",
        Weekday::Tue => "Wt",
        Weekday::Wed => "Śr",
        Weekday::Thu => "Czw",
        Weekday::Fri => "Pt",
        Weekday::Sat => "Sob",
        Weekday::Sun => "Ndz",
    }
}

/// `"Śr 15.05"` for 2024-05-15.
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", day_abbrev(date.weekday()), date.format("%d.%m"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .expect("date")
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("time"))
    }

    /// Hourly series of `hours` entries starting at 2024-05-15T00:00.
    fn response(hours: usize) -> ForecastResponse {
        let time: Vec<String> = (0..hours)
            .map(|h| {
                (at("2024-05-15", 0, 0) + chrono::Duration::hours(h as i64))
                    .format("%Y-%m-%dT%H:%M")
                    .to_string()
            })
            .collect();
        let temps: Vec<f64> = (0..hours).map(|h| h as f64 / 2.0).collect();
        let codes: Vec<i32> = (0..hours).map(|h| if h % 2 == 0 { 0 } else { 3 }).collect();

        serde_json::from_value(json!({
            "current": {"time": "2024-05-15T10:00", "temperature_2m": 14.2, "weather_code": 61},
            "hourly": {"time": time, "temperature_2m": temps, "weather_code": codes},
            "daily": {
                "time": ["2024-05-15", "2024-05-16", "2024-05-17"],
                "temperature_2m_max": [18.1, 19.4, 16.0],
                "temperature_2m_min": [8.3, 9.0, 7.5],
                "weather_code": [3, 80, 999]
            }
        }))
        .expect("valid forecast json")
    }

    #[test]
    fn hourly_starts_at_first_hour_not_before_now() {
        let snapshot = build_snapshot("Szczecin", response(168), at("2024-05-15", 10, 30))
            .expect("snapshot");

        assert_eq!(snapshot.hourly.len(), 24);
        assert_eq!(snapshot.hourly[0].display_time, "11:00");
        assert_eq!(snapshot.hourly[0].temperature, 5.5);
        assert_eq!(snapshot.hourly[0].condition, Condition::Overcast);
        assert_eq!(snapshot.hourly[23].display_time, "10:00");
    }

    #[test]
    fn exact_hour_match_is_kept() {
        let snapshot =
            build_snapshot("Szczecin", response(48), at("2024-05-15", 10, 0)).expect("snapshot");

        assert_eq!(snapshot.hourly[0].display_time, "10:00");
        assert_eq!(snapshot.hourly[0].condition, Condition::Clear);
    }

    #[test]
    fn short_tail_yields_fewer_entries() {
        // k = 20, series length 30 -> 10 entries
        let snapshot =
            build_snapshot("Szczecin", response(30), at("2024-05-15", 19, 1)).expect("snapshot");

        assert_eq!(snapshot.hourly.len(), 10);
        assert_eq!(snapshot.hourly[0].display_time, "20:00");
        assert_eq!(snapshot.hourly[9].display_time, "05:00");
    }

    #[test]
    fn all_hours_in_past_falls_back_to_start() {
        let snapshot =
            build_snapshot("Szczecin", response(30), at("2024-06-01", 12, 0)).expect("snapshot");

        assert_eq!(snapshot.hourly.len(), 24);
        assert_eq!(snapshot.hourly[0].display_time, "00:00");
    }

    #[test]
    fn current_and_daily_are_normalized() {
        let snapshot =
            build_snapshot("Szczecin (Poland)", response(24), at("2024-05-15", 0, 0))
                .expect("snapshot");

        assert_eq!(snapshot.city_display_name, "Szczecin (Poland)");
        assert_eq!(snapshot.current_temp, 14.2);
        assert_eq!(snapshot.current_condition.description(), "Umiarkowany deszcz");

        let labels: Vec<&str> = snapshot.daily.iter().map(|d| d.display_day.as_str()).collect();
        assert_eq!(labels, ["Śr 15.05", "Czw 16.05", "Pt 17.05"]);
        assert_eq!(snapshot.daily[1].max_temp, 19.4);
        assert_eq!(snapshot.daily[1].min_temp, 9.0);
        assert_eq!(snapshot.daily[1].condition, Condition::RainShowers);
        assert_eq!(snapshot.daily[2].condition, Condition::Unknown);
    }

    #[test]
    fn mismatched_series_is_a_parse_error() {
        let mut bad = response(24);
        bad.hourly.weather_code.pop();

        let err = build_snapshot("X", bad, at("2024-05-15", 0, 0)).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("hourly.weather_code has 23 values"));
    }

    #[test]
    fn malformed_timestamp_is_a_parse_error() {
        let mut bad = response(24);
        bad.daily.time[0] = "15/05/2024".into();

        let err = build_snapshot("X", bad, at("2024-05-15", 0, 0)).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn timestamps_with_seconds_are_accepted() {
        assert_eq!(parse_hour("2024-05-15T07:00:00").expect("parse"), at("2024-05-15", 7, 0));
        assert_eq!(parse_hour("2024-05-15T07:00").expect("parse"), at("2024-05-15", 7, 0));
    }

    #[test]
    fn day_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).expect("date");
        assert_eq!(date.weekday().number_from_monday(), 3);
        assert_eq!(day_label(date), "Śr 15.05");

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).expect("date");
        assert_eq!(day_label(sunday), "Ndz 07.01");
    }

    #[test]
    fn current_hour_index_handles_empty_series() {
        assert_eq!(current_hour_index(&[], at("2024-05-15", 0, 0)), 0);
    }
}
