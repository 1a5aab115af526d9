//! OpenWeatherMap history API client.
//!
//! Commercial weather-history source. Only constructed when an API key is
//! supplied; without a credential the pipeline never touches this host.
//! Hourly history for the race date is aggregated into one observed record.

use std::time::Duration;

use serde::Deserialize;

use super::pacing::RequestPacer;
use super::source::{HistoricalWeatherSource, SourceError};
use crate::domain::{WeatherRecord, WeatherSource, RACE_NAME};
use crate::weather::synth::round1;
use crate::weather::{approximate_race_date, condition_for};

pub const DEFAULT_BASE_URL: &str = "http://history.openweathermap.org/data/2.5/history/city";

// Marina Bay.
const SINGAPORE_LAT: f64 = 1.3521;
const SINGAPORE_LON: f64 = 103.8198;

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    list: Vec<HourNode>,
}

#[derive(Debug, Deserialize)]
struct HourNode {
    main: MainNode,
    wind: Option<WindNode>,
    rain: Option<RainNode>,
}

#[derive(Debug, Deserialize)]
struct MainNode {
    /// Kelvin.
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct WindNode {
    /// m/s.
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RainNode {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

const KELVIN_OFFSET: f64 = 273.15;

fn aggregate_hours(year: i32, hours: &[HourNode]) -> Option<WeatherRecord> {
    if hours.is_empty() {
        return None;
    }

    let temps: Vec<f64> = hours.iter().map(|h| h.main.temp - KELVIN_OFFSET).collect();
    let temp_min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let temp_max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let temp_avg = temps.iter().sum::<f64>() / temps.len() as f64;

    let n = hours.len() as f64;
    let humidity = hours.iter().map(|h| h.main.humidity).sum::<f64>() / n;
    let pressure = hours.iter().map(|h| h.main.pressure).sum::<f64>() / n;

    let winds: Vec<&WindNode> = hours.iter().filter_map(|h| h.wind.as_ref()).collect();
    let wind_speed = if winds.is_empty() {
        f64::NAN
    } else {
        winds.iter().filter_map(|w| w.speed).sum::<f64>() / winds.len() as f64 * 3.6
    };
    let wind_direction = if winds.is_empty() {
        f64::NAN
    } else {
        winds.iter().filter_map(|w| w.deg).sum::<f64>() / winds.len() as f64
    };

    // This source does carry a gauge: total the hourly accumulations.
    let precipitation: f64 = hours
        .iter()
        .filter_map(|h| h.rain.as_ref())
        .filter_map(|r| r.one_hour)
        .sum();

    let condition = condition_for(precipitation, humidity);

    Some(WeatherRecord {
        year,
        race: RACE_NAME.to_string(),
        date: approximate_race_date(year),
        temp_min_c: round1(temp_min),
        temp_max_c: round1(temp_max),
        temp_avg_c: round1(temp_avg),
        humidity_pct: round1(humidity),
        precipitation_mm: round1(precipitation),
        wind_speed_kmh: round1(wind_speed),
        wind_direction_deg: wind_direction.round(),
        pressure_hpa: round1(pressure),
        condition: condition.to_string(),
        source: WeatherSource::Observed,
    })
}

/// Blocking OpenWeatherMap history client.
pub struct OpenWeatherClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    pacer: RequestPacer,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration, pacer: RequestPacer) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            pacer,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn history(&self, year: i32) -> Option<HistoryResponse> {
        match self.try_history(year) {
            Ok(resp) => Some(resp),
            Err(e) => {
                eprintln!("openweathermap: {e}");
                None
            }
        }
    }

    fn try_history(&self, year: i32) -> Result<HistoryResponse, SourceError> {
        let date = approximate_race_date(year);
        let start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight exists")
            .and_utc()
            .timestamp();
        let end = start + 86_400;

        self.pacer.pause();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", SINGAPORE_LAT.to_string()),
                ("lon", SINGAPORE_LON.to_string()),
                ("type", "hour".to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.base_url.clone(),
            });
        }
        resp.json().map_err(|e| SourceError::Decode {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

impl HistoricalWeatherSource for OpenWeatherClient {
    fn race_weather(&self, year: i32) -> Option<WeatherRecord> {
        let history = self.history(year)?;
        aggregate_hours(year, &history.list)
    }
}
