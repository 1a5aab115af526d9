//! Flat record types for the collected tables.
//!
//! Every entity is a plain record keyed by natural identifiers (year, round,
//! driver code, circuit id). Records are never mutated after creation; each
//! collection run produces an immutable snapshot file per domain. Optional
//! nested payload fields (no finish time, no fastest lap, no constructor for
//! a mid-season driver) are `Option<T>` rather than dropped rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The race every collected table is scoped to.
pub const RACE_NAME: &str = "Singapore";

/// One driver's classification in one race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceResult {
    pub year: i32,
    pub round: u32,
    pub race_name: String,
    pub date: Option<NaiveDate>,
    pub position: u32,
    pub position_text: String,
    pub points: f64,
    pub driver_number: Option<u32>,
    pub driver_code: String,
    pub given_name: String,
    pub family_name: String,
    pub constructor_name: String,
    pub constructor_id: String,
    pub grid: u32,
    pub laps: u32,
    pub status: String,
    pub time: Option<String>,
    pub fastest_lap_rank: Option<u32>,
    pub fastest_lap_time: Option<String>,
    pub fastest_lap_avg_speed: Option<f64>,
}

/// One row of the end-of-season driver championship table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverStanding {
    pub year: i32,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub driver_code: String,
    pub given_name: String,
    pub family_name: String,
    pub constructor_name: Option<String>,
    pub constructor_id: Option<String>,
}

/// One row of the end-of-season constructor championship table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructorStanding {
    pub year: i32,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub constructor_name: String,
    pub constructor_id: String,
}

/// Static circuit reference row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitInfo {
    pub circuit_id: String,
    pub circuit_name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub locality: String,
}

/// One race on a season calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub year: i32,
    pub round: u32,
    pub race_name: String,
    pub circuit_id: String,
    pub circuit_name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub country: String,
    pub locality: String,
}

/// One driver's classification from the session-level provider.
///
/// Richer than [`RaceResult`] in provenance (live session telemetry) but
/// flatter in shape; the two tables are persisted separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResult {
    pub year: i32,
    pub race: String,
    pub date: Option<NaiveDate>,
    pub driver_code: String,
    pub full_name: String,
    pub team_name: String,
    pub position: Option<u32>,
    pub points: f64,
    pub grid: Option<u32>,
    pub status: String,
    pub time: Option<String>,
    pub fastest_lap_time: Option<String>,
}

/// Where a weather record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    Observed,
    Synthetic,
}

impl WeatherSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Race-day weather for one year, observed or synthesized.
///
/// After reconciliation there is exactly one record per year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    pub year: i32,
    pub race: String,
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub temp_avg_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub pressure_hpa: f64,
    pub condition: String,
    pub source: WeatherSource,
}
