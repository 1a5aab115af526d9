//! Weather collection and reconciliation.
//!
//! Observed records come from the session provider's weather telemetry, one
//! paced attempt per year. Years still missing are then tried against the
//! commercial history source when a credential is configured. The merged set
//! goes through [`reconcile`], which fills the whole range synthetically
//! when observed coverage is under half.

use std::collections::HashSet;

use podium_core::data::{CollectProgress, HistoricalWeatherSource, SessionDataSource};
use podium_core::domain::WeatherRecord;
use podium_core::weather::reconcile;

/// Returns `None` when no data exists from either path; the caller writes
/// nothing in that case.
pub fn collect_weather(
    session: &dyn SessionDataSource,
    commercial: Option<&dyn HistoricalWeatherSource>,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Option<Vec<WeatherRecord>> {
    let total = years.len();
    let mut observed = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match session.race_weather(year) {
            Some(record) => {
                progress.on_complete(&key, i, total, Some(1));
                observed.push(record);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    if let Some(source) = commercial {
        let covered: HashSet<i32> = observed.iter().map(|w| w.year).collect();
        for &year in years.iter().filter(|y| !covered.contains(y)) {
            if let Some(record) = source.race_weather(year) {
                observed.push(record);
            }
        }
    }

    let merged = reconcile(observed, years);
    match &merged {
        Some(rows) => progress.on_batch_complete("weather", rows.len()),
        None => progress.on_batch_complete("weather", 0),
    }
    merged
}
