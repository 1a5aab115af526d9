//! OpenF1 session-level API client.
//!
//! Secondary, richer provider: race-session lookup by year, the per-session
//! driver roster, starting grid, and classification, plus weather telemetry
//! sampled through the session. The endpoints return bare JSON arrays keyed
//! by `session_key`; classification rows are joined to the roster by driver
//! number. Weather samples are aggregated into a single observed race-day
//! record.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::pacing::RequestPacer;
use super::source::{SessionDataSource, SourceError};
use crate::domain::{SessionResult, WeatherRecord, WeatherSource, RACE_NAME};
use crate::weather::approximate_race_date;
use crate::weather::synth::round1;

pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

// ─── Response rows ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SessionNode {
    session_key: i64,
    date_start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterNode {
    driver_number: u32,
    name_acronym: Option<String>,
    full_name: Option<String>,
    team_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GridNode {
    driver_number: u32,
    position: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ClassificationNode {
    driver_number: u32,
    position: Option<u32>,
    points: Option<f64>,
    dnf: Option<bool>,
    dns: Option<bool>,
    dsq: Option<bool>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherSampleNode {
    air_temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    rainfall: Option<f64>,
    wind_direction: Option<f64>,
    wind_speed: Option<f64>,
}

// ─── Flattening ─────────────────────────────────────────────────────

fn status_of(row: &ClassificationNode) -> &'static str {
    if row.dsq.unwrap_or(false) {
        "Disqualified"
    } else if row.dns.unwrap_or(false) {
        "Did not start"
    } else if row.dnf.unwrap_or(false) {
        "Did not finish"
    } else {
        "Finished"
    }
}

/// Render a race time in seconds as `h:mm:ss.mmm` (or `m:ss.mmm` under an
/// hour).
fn format_race_time(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{ms:03}")
    } else {
        format!("{mins}:{secs:02}.{ms:03}")
    }
}

fn join_results(
    year: i32,
    date: Option<NaiveDate>,
    roster: Vec<RosterNode>,
    grid: Vec<GridNode>,
    classification: Vec<ClassificationNode>,
) -> Vec<SessionResult> {
    let roster_by_number: HashMap<u32, &RosterNode> =
        roster.iter().map(|d| (d.driver_number, d)).collect();
    let grid_by_number: HashMap<u32, u32> = grid
        .iter()
        .filter_map(|g| g.position.map(|p| (g.driver_number, p)))
        .collect();

    let mut rows: Vec<SessionResult> = classification
        .iter()
        .map(|row| {
            let driver = roster_by_number.get(&row.driver_number);
            SessionResult {
                year,
                race: RACE_NAME.to_string(),
                date,
                driver_code: driver
                    .and_then(|d| d.name_acronym.clone())
                    .unwrap_or_else(|| row.driver_number.to_string()),
                full_name: driver
                    .and_then(|d| d.full_name.clone())
                    .unwrap_or_default(),
                team_name: driver
                    .and_then(|d| d.team_name.clone())
                    .unwrap_or_default(),
                position: row.position,
                points: row.points.unwrap_or(0.0),
                grid: grid_by_number.get(&row.driver_number).copied(),
                status: status_of(row).to_string(),
                time: row.duration.map(format_race_time),
                // The session provider exposes no per-driver fastest lap.
                fastest_lap_time: None,
            }
        })
        .collect();

    // Classified finishers first, in order; unclassified rows last.
    rows.sort_by_key(|r| r.position.unwrap_or(u32::MAX));
    rows
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.iter().sum::<f64>() / collected.len() as f64)
    }
}

/// Collapse session weather telemetry into one observed record.
///
/// Telemetry carries a boolean rainfall flag rather than a gauge, so the
/// record reports 0.0 mm and derives its condition from the wet-sample
/// fraction, falling back to the humidity threshold.
fn aggregate_weather(
    year: i32,
    date: NaiveDate,
    samples: &[WeatherSampleNode],
) -> Option<WeatherRecord> {
    let temps: Vec<f64> = samples.iter().filter_map(|s| s.air_temperature).collect();
    if temps.is_empty() {
        return None;
    }
    let temp_min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let temp_max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let temp_avg = temps.iter().sum::<f64>() / temps.len() as f64;

    let humidity = mean(samples.iter().filter_map(|s| s.humidity)).unwrap_or(f64::NAN);
    let pressure = mean(samples.iter().filter_map(|s| s.pressure)).unwrap_or(f64::NAN);
    // Telemetry wind speed is m/s.
    let wind_speed =
        mean(samples.iter().filter_map(|s| s.wind_speed)).map_or(f64::NAN, |v| v * 3.6);
    let wind_direction = mean(samples.iter().filter_map(|s| s.wind_direction)).unwrap_or(f64::NAN);

    let rain_flags: Vec<f64> = samples.iter().filter_map(|s| s.rainfall).collect();
    let wet_fraction = if rain_flags.is_empty() {
        0.0
    } else {
        rain_flags.iter().filter(|&&r| r > 0.0).count() as f64 / rain_flags.len() as f64
    };
    let condition = if wet_fraction >= 0.25 {
        "Rain"
    } else if wet_fraction > 0.0 {
        "Light Rain"
    } else if humidity > 85.0 {
        "Humid"
    } else {
        "Clear"
    };

    Some(WeatherRecord {
        year,
        race: RACE_NAME.to_string(),
        date,
        temp_min_c: round1(temp_min),
        temp_max_c: round1(temp_max),
        temp_avg_c: round1(temp_avg),
        humidity_pct: round1(humidity),
        precipitation_mm: 0.0,
        wind_speed_kmh: round1(wind_speed),
        wind_direction_deg: wind_direction.round(),
        pressure_hpa: round1(pressure),
        condition: condition.to_string(),
        source: WeatherSource::Observed,
    })
}

fn parse_session_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.date_naive())
}

// ─── Client ─────────────────────────────────────────────────────────

/// Blocking OpenF1 client with a fixed request timeout and paced requests.
pub struct OpenF1Client {
    client: reqwest::blocking::Client,
    base_url: String,
    pacer: RequestPacer,
}

impl OpenF1Client {
    pub fn new(timeout: Duration, pacer: RequestPacer) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            pacer,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One paced request to `{base}/{path}`. Failures are logged and become
    /// `None`; the calling collector skips the key.
    fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Option<Vec<T>> {
        match self.try_get(path, params) {
            Ok(rows) => Some(rows),
            Err(e) => {
                eprintln!("openf1: {e}");
                None
            }
        }
    }

    fn try_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        self.pacer.pause();
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }
        resp.json().map_err(|e| SourceError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    /// The race session for one Singapore GP year, if the provider has it.
    fn race_session(&self, year: i32) -> Option<SessionNode> {
        self.get::<SessionNode>(
            "sessions",
            &[
                ("year", year.to_string()),
                ("country_name", RACE_NAME.to_string()),
                ("session_name", "Race".to_string()),
            ],
        )?
        .into_iter()
        .next()
    }
}

impl SessionDataSource for OpenF1Client {
    fn race_results(&self, year: i32) -> Option<Vec<SessionResult>> {
        let session = self.race_session(year)?;
        let key = [("session_key", session.session_key.to_string())];
        let roster: Vec<RosterNode> = self.get("drivers", &key)?;
        // Grid is a separate endpoint; its absence degrades to None per row.
        let grid: Vec<GridNode> = self.get("starting_grid", &key).unwrap_or_default();
        let classification: Vec<ClassificationNode> = self.get("session_result", &key)?;

        let date = parse_session_date(session.date_start.as_deref());
        Some(join_results(year, date, roster, grid, classification))
    }

    fn race_weather(&self, year: i32) -> Option<WeatherRecord> {
        let session = self.race_session(year)?;
        let key = [("session_key", session.session_key.to_string())];
        let samples: Vec<WeatherSampleNode> = self.get("weather", &key)?;

        let date = parse_session_date(session.date_start.as_deref())
            .unwrap_or_else(|| approximate_race_date(year));
        aggregate_weather(year, date, &samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temp: f64, humidity: f64, rainfall: f64) -> WeatherSampleNode {
        WeatherSampleNode {
            air_temperature: Some(temp),
            humidity: Some(humidity),
            pressure: Some(1010.0),
            rainfall: Some(rainfall),
            wind_direction: Some(180.0),
            wind_speed: Some(2.5),
        }
    }

    #[test]
    fn format_race_time_over_an_hour() {
        assert_eq!(format_race_time(7036.304), "1:57:16.304");
    }

    #[test]
    fn format_race_time_under_an_hour() {
        assert_eq!(format_race_time(3436.304), "57:16.304");
    }

    #[test]
    fn aggregate_weather_min_max_avg_and_units() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 17).unwrap();
        let samples = vec![sample(28.0, 80.0, 0.0), sample(30.0, 82.0, 0.0)];
        let record = aggregate_weather(2023, date, &samples).unwrap();

        assert_eq!(record.year, 2023);
        assert_eq!(record.temp_min_c, 28.0);
        assert_eq!(record.temp_max_c, 30.0);
        assert_eq!(record.temp_avg_c, 29.0);
        assert_eq!(record.humidity_pct, 81.0);
        // 2.5 m/s → 9 km/h
        assert_eq!(record.wind_speed_kmh, 9.0);
        assert_eq!(record.source, WeatherSource::Observed);
        assert_eq!(record.condition, "Clear");
    }

    #[test]
    fn aggregate_weather_condition_from_wet_fraction() {
        let date = NaiveDate::from_ymd_opt(2022, 10, 2).unwrap();

        let mostly_wet = vec![
            sample(27.0, 90.0, 1.0),
            sample(27.0, 90.0, 1.0),
            sample(27.0, 90.0, 0.0),
        ];
        assert_eq!(
            aggregate_weather(2022, date, &mostly_wet).unwrap().condition,
            "Rain"
        );

        let briefly_wet = vec![
            sample(27.0, 80.0, 1.0),
            sample(27.0, 80.0, 0.0),
            sample(27.0, 80.0, 0.0),
            sample(27.0, 80.0, 0.0),
            sample(27.0, 80.0, 0.0),
        ];
        assert_eq!(
            aggregate_weather(2022, date, &briefly_wet).unwrap().condition,
            "Light Rain"
        );

        let dry_and_humid = vec![sample(27.0, 90.0, 0.0)];
        assert_eq!(
            aggregate_weather(2022, date, &dry_and_humid).unwrap().condition,
            "Humid"
        );
    }

    #[test]
    fn aggregate_weather_without_temperature_is_absent() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 17).unwrap();
        let samples = vec![WeatherSampleNode {
            air_temperature: None,
            humidity: Some(80.0),
            pressure: None,
            rainfall: None,
            wind_direction: None,
            wind_speed: None,
        }];
        assert!(aggregate_weather(2023, date, &samples).is_none());
    }

    #[test]
    fn join_results_maps_roster_grid_and_status() {
        let roster = vec![
            RosterNode {
                driver_number: 1,
                name_acronym: Some("VER".into()),
                full_name: Some("Max Verstappen".into()),
                team_name: Some("Red Bull Racing".into()),
            },
            RosterNode {
                driver_number: 55,
                name_acronym: Some("SAI".into()),
                full_name: Some("Carlos Sainz".into()),
                team_name: Some("Ferrari".into()),
            },
        ];
        let grid = vec![
            GridNode { driver_number: 55, position: Some(1) },
            GridNode { driver_number: 1, position: Some(11) },
        ];
        let classification = vec![
            ClassificationNode {
                driver_number: 1,
                position: Some(5),
                points: Some(10.0),
                dnf: Some(false),
                dns: None,
                dsq: None,
                duration: Some(7036.304),
            },
            ClassificationNode {
                driver_number: 55,
                position: Some(1),
                points: Some(25.0),
                dnf: None,
                dns: None,
                dsq: None,
                duration: Some(7015.0),
            },
            ClassificationNode {
                driver_number: 44,
                position: None,
                points: None,
                dnf: Some(true),
                dns: None,
                dsq: None,
                duration: None,
            },
        ];

        let date = NaiveDate::from_ymd_opt(2023, 9, 17);
        let rows = join_results(2023, date, roster, grid, classification);

        assert_eq!(rows.len(), 3);
        // Sorted by classified position, unclassified last.
        assert_eq!(rows[0].driver_code, "SAI");
        assert_eq!(rows[0].grid, Some(1));
        assert_eq!(rows[0].points, 25.0);
        assert_eq!(rows[1].driver_code, "VER");
        assert_eq!(rows[1].time.as_deref(), Some("1:57:16.304"));
        // Driver 44 missing from the roster: code falls back to the number.
        assert_eq!(rows[2].driver_code, "44");
        assert_eq!(rows[2].status, "Did not finish");
        assert_eq!(rows[2].position, None);
        assert_eq!(rows[2].grid, None);
    }
}
