//! Fixed-sequence collection run.
//!
//! Order: historical tables (results, standings, circuits, schedules) →
//! weather reconciliation → richer session results → summary. Each domain's
//! total failure is logged and the run proceeds; an empty domain leaves no
//! output file behind. Strictly sequential — one writer process, each
//! collector owning a disjoint set of output files.

use std::path::Path;

use anyhow::{Context, Result};

use podium_core::data::{
    CollectProgress, HistoricalWeatherSource, RaceDataSource, SessionDataSource,
};

use crate::collectors::{
    collect_circuits, collect_constructor_standings, collect_driver_standings,
    collect_schedules, collect_session_results, collect_singapore_results, collect_weather,
};
use crate::config::CollectionConfig;
use crate::export::{
    circuits_csv, constructor_standings_csv, driver_standings_csv, race_results_csv,
    schedules_csv, session_results_csv, weather_csv, write_table, CIRCUITS_FILE,
    CONSTRUCTOR_STANDINGS_FILE, DRIVER_STANDINGS_FILE, RESULTS_FILE, SCHEDULES_FILE,
    SESSION_RESULTS_FILE, WEATHER_FILE,
};
use crate::summary::{summarize, CollectionSummary};

/// Outcome of one domain within a run.
#[derive(Debug, Clone)]
pub struct DomainOutcome {
    pub name: &'static str,
    pub file: &'static str,
    pub records: usize,
    pub written: bool,
}

/// Outcome of a full collection run.
#[derive(Debug)]
pub struct CollectionReport {
    pub domains: Vec<DomainOutcome>,
    pub summary: CollectionSummary,
}

/// Persist one domain table, tolerating the write failure.
fn persist(
    name: &'static str,
    file: &'static str,
    records: usize,
    data_dir: &Path,
    contents: Result<String>,
) -> DomainOutcome {
    if records == 0 {
        eprintln!("WARNING: no data collected for {name}");
        return DomainOutcome {
            name,
            file,
            records: 0,
            written: false,
        };
    }

    let written = match contents.and_then(|csv| write_table(&data_dir.join(file), &csv)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("ERROR: {name}: {e}");
            false
        }
    };

    DomainOutcome {
        name,
        file,
        records,
        written,
    }
}

/// Run every collector in sequence and inventory the results.
pub fn run_collection(
    config: &CollectionConfig,
    ergast: &dyn RaceDataSource,
    session: &dyn SessionDataSource,
    commercial: Option<&dyn HistoricalWeatherSource>,
    progress: &dyn CollectProgress,
) -> Result<CollectionReport> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;

    let data_dir = config.data_dir.as_path();
    let results_years = config.results_years();
    let standings_years = config.standings_years();
    let mut domains = Vec::new();

    // Step 1: historical tables.
    let rows = collect_singapore_results(ergast, &results_years, progress);
    domains.push(persist(
        "singapore race results",
        RESULTS_FILE,
        rows.len(),
        data_dir,
        race_results_csv(&rows),
    ));

    let rows = collect_driver_standings(ergast, &standings_years, progress);
    domains.push(persist(
        "driver standings",
        DRIVER_STANDINGS_FILE,
        rows.len(),
        data_dir,
        driver_standings_csv(&rows),
    ));

    let rows = collect_constructor_standings(ergast, &standings_years, progress);
    domains.push(persist(
        "constructor standings",
        CONSTRUCTOR_STANDINGS_FILE,
        rows.len(),
        data_dir,
        constructor_standings_csv(&rows),
    ));

    let rows = collect_circuits(ergast, progress);
    domains.push(persist(
        "circuit reference",
        CIRCUITS_FILE,
        rows.len(),
        data_dir,
        circuits_csv(&rows),
    ));

    let rows = collect_schedules(ergast, &standings_years, progress);
    domains.push(persist(
        "season schedules",
        SCHEDULES_FILE,
        rows.len(),
        data_dir,
        schedules_csv(&rows),
    ));

    // Step 2: weather (observed merged over synthetic).
    match collect_weather(session, commercial, &results_years, progress) {
        Some(rows) => domains.push(persist(
            "weather",
            WEATHER_FILE,
            rows.len(),
            data_dir,
            weather_csv(&rows),
        )),
        None => domains.push(persist("weather", WEATHER_FILE, 0, data_dir, Ok(String::new()))),
    }

    // Step 3: richer per-race results.
    let rows = collect_session_results(session, &results_years, progress);
    domains.push(persist(
        "session results",
        SESSION_RESULTS_FILE,
        rows.len(),
        data_dir,
        session_results_csv(&rows),
    ));

    // Step 4: observational summary; its failure never fails the run.
    let summary = summarize(data_dir).unwrap_or_else(|e| {
        eprintln!("WARNING: could not summarize {}: {e}", data_dir.display());
        CollectionSummary {
            files: Vec::new(),
            total_records: 0,
            key_files: Vec::new(),
        }
    });

    Ok(CollectionReport { domains, summary })
}
