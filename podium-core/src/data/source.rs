//! Source traits, structured client errors, and progress reporting.
//!
//! The source traits abstract over the concrete HTTP clients so collectors
//! can be exercised against scripted sources in tests. Every trait method
//! issues (at most) one upstream request per key and returns `None` on any
//! failure — the error has already been logged by the client, and the caller
//! simply skips the key.

use crate::domain::{
    CircuitInfo, ConstructorStanding, DriverStanding, RaceResult, ScheduleEntry, SessionResult,
    WeatherRecord,
};
use thiserror::Error;

/// Structured error types for source clients.
///
/// These never cross a collector boundary; clients log them and surface an
/// absent result instead.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("bad payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Historical results/standings provider (year- and endpoint-addressed).
pub trait RaceDataSource: Send + Sync {
    /// Race classification for one circuit in one season.
    fn race_results(&self, year: i32, circuit_id: &str) -> Option<Vec<RaceResult>>;

    /// End-of-season driver championship table.
    fn driver_standings(&self, year: i32) -> Option<Vec<DriverStanding>>;

    /// End-of-season constructor championship table.
    fn constructor_standings(&self, year: i32) -> Option<Vec<ConstructorStanding>>;

    /// Static circuit reference table.
    fn circuits(&self) -> Option<Vec<CircuitInfo>>;

    /// Season calendar for one year.
    fn season_schedule(&self, year: i32) -> Option<Vec<ScheduleEntry>>;
}

/// Session-level provider: richer per-race classification plus weather
/// telemetry for the race session.
pub trait SessionDataSource: Send + Sync {
    fn race_results(&self, year: i32) -> Option<Vec<SessionResult>>;

    /// Observed race-day weather aggregated from session telemetry.
    fn race_weather(&self, year: i32) -> Option<WeatherRecord>;
}

/// Commercial weather-history provider, keyed by race date.
pub trait HistoricalWeatherSource: Send + Sync {
    fn race_weather(&self, year: i32) -> Option<WeatherRecord>;
}

/// Progress callback for multi-key collection runs.
pub trait CollectProgress: Send {
    /// Called when starting to fetch a key.
    fn on_start(&self, key: &str, index: usize, total: usize);

    /// Called when a key finishes; `records` is `None` when the fetch failed.
    fn on_complete(&self, key: &str, index: usize, total: usize, records: Option<usize>);

    /// Called once the whole domain is done.
    fn on_batch_complete(&self, domain: &str, records: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl CollectProgress for StdoutProgress {
    fn on_start(&self, key: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {key}...", index + 1, total);
    }

    fn on_complete(&self, key: &str, _index: usize, _total: usize, records: Option<usize>) {
        match records {
            Some(n) => println!("  OK: {key}: {n} records"),
            None => println!("  MISS: {key}"),
        }
    }

    fn on_batch_complete(&self, domain: &str, records: usize) {
        println!("{domain}: {records} records collected");
    }
}

/// No-op progress reporter for tests and embedding callers.
pub struct SilentProgress;

impl CollectProgress for SilentProgress {
    fn on_start(&self, _key: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _key: &str, _index: usize, _total: usize, _records: Option<usize>) {}
    fn on_batch_complete(&self, _domain: &str, _records: usize) {}
}
