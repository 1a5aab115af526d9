//! CSV snapshot export.
//!
//! One function per output table, each producing the full file contents as a
//! string; the orchestrator writes it to disk in a single `fs::write`, so a
//! partially-written table never exists on disk. Absent optional fields are
//! empty cells.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use podium_core::domain::{
    CircuitInfo, ConstructorStanding, DriverStanding, RaceResult, ScheduleEntry, SessionResult,
    WeatherRecord, RACE_NAME,
};

// Output file names, fixed per domain.
pub const RESULTS_FILE: &str = "singapore_gp_results_ergast_2008_2024.csv";
pub const DRIVER_STANDINGS_FILE: &str = "driver_standings_2015_2024.csv";
pub const CONSTRUCTOR_STANDINGS_FILE: &str = "constructor_standings_2015_2024.csv";
pub const CIRCUITS_FILE: &str = "circuits_info.csv";
pub const SCHEDULES_FILE: &str = "season_schedules_2015_2024.csv";
pub const WEATHER_FILE: &str = "singapore_weather_2008_2024.csv";
pub const SESSION_RESULTS_FILE: &str = "singapore_gp_results_openf1_2008_2024.csv";

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_num<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

fn opt_date(value: &Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write one table to disk in full.
pub fn write_table(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

pub fn race_results_csv(rows: &[RaceResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Year",
        "Race",
        "Date",
        "Round",
        "RaceName",
        "Position",
        "PositionText",
        "Points",
        "DriverNumber",
        "DriverCode",
        "DriverGivenName",
        "DriverFamilyName",
        "ConstructorName",
        "ConstructorId",
        "Grid",
        "Laps",
        "Status",
        "Time",
        "FastestLapRank",
        "FastestLapTime",
        "FastestLapAvgSpeed",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            RACE_NAME,
            &opt_date(&r.date),
            &r.round.to_string(),
            &r.race_name,
            &r.position.to_string(),
            &r.position_text,
            &r.points.to_string(),
            &opt_num(&r.driver_number),
            &r.driver_code,
            &r.given_name,
            &r.family_name,
            &r.constructor_name,
            &r.constructor_id,
            &r.grid.to_string(),
            &r.laps.to_string(),
            &r.status,
            &opt_str(&r.time),
            &opt_num(&r.fastest_lap_rank),
            &opt_str(&r.fastest_lap_time),
            &opt_num(&r.fastest_lap_avg_speed),
        ])?;
    }

    finish(wtr)
}

pub fn driver_standings_csv(rows: &[DriverStanding]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Year",
        "Position",
        "Points",
        "Wins",
        "DriverCode",
        "DriverGivenName",
        "DriverFamilyName",
        "ConstructorName",
        "ConstructorId",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            &r.position.to_string(),
            &r.points.to_string(),
            &r.wins.to_string(),
            &r.driver_code,
            &r.given_name,
            &r.family_name,
            &opt_str(&r.constructor_name),
            &opt_str(&r.constructor_id),
        ])?;
    }

    finish(wtr)
}

pub fn constructor_standings_csv(rows: &[ConstructorStanding]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Year", "Position", "Points", "Wins", "ConstructorName", "ConstructorId"])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            &r.position.to_string(),
            &r.points.to_string(),
            &r.wins.to_string(),
            &r.constructor_name,
            &r.constructor_id,
        ])?;
    }

    finish(wtr)
}

pub fn circuits_csv(rows: &[CircuitInfo]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["CircuitId", "CircuitName", "Country", "Latitude", "Longitude", "Locality"])?;

    for r in rows {
        wtr.write_record([
            &r.circuit_id,
            &r.circuit_name,
            &r.country,
            &r.latitude.to_string(),
            &r.longitude.to_string(),
            &r.locality,
        ])?;
    }

    finish(wtr)
}

pub fn schedules_csv(rows: &[ScheduleEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Year",
        "Round",
        "RaceName",
        "CircuitName",
        "CircuitId",
        "Date",
        "Time",
        "Country",
        "Locality",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            &r.round.to_string(),
            &r.race_name,
            &r.circuit_name,
            &r.circuit_id,
            &opt_date(&r.date),
            &opt_str(&r.time),
            &r.country,
            &r.locality,
        ])?;
    }

    finish(wtr)
}

pub fn session_results_csv(rows: &[SessionResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Year",
        "Race",
        "Date",
        "DriverCode",
        "FullName",
        "TeamName",
        "Position",
        "Points",
        "Grid",
        "Status",
        "Time",
        "FastestLapTime",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            &r.race,
            &opt_date(&r.date),
            &r.driver_code,
            &r.full_name,
            &r.team_name,
            &opt_num(&r.position),
            &r.points.to_string(),
            &opt_num(&r.grid),
            &r.status,
            &opt_str(&r.time),
            &opt_str(&r.fastest_lap_time),
        ])?;
    }

    finish(wtr)
}

pub fn weather_csv(rows: &[WeatherRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Year",
        "Race",
        "Date",
        "Temperature_Min_C",
        "Temperature_Max_C",
        "Temperature_Avg_C",
        "Humidity_Percent",
        "Precipitation_mm",
        "Wind_Speed_kmh",
        "Wind_Direction_deg",
        "Pressure_hPa",
        "Weather_Condition",
        "Data_Source",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.year.to_string(),
            &r.race,
            &r.date.to_string(),
            &r.temp_min_c.to_string(),
            &r.temp_max_c.to_string(),
            &r.temp_avg_c.to_string(),
            &r.humidity_pct.to_string(),
            &r.precipitation_mm.to_string(),
            &r.wind_speed_kmh.to_string(),
            &r.wind_direction_deg.to_string(),
            &r.pressure_hpa.to_string(),
            &r.condition,
            r.source.as_str(),
        ])?;
    }

    finish(wtr)
}
