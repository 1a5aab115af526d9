//! Singapore GP race-result collection.

use podium_core::data::{CollectProgress, RaceDataSource};
use podium_core::domain::RaceResult;

/// Ergast circuit id for the Marina Bay street circuit.
pub const SINGAPORE_CIRCUIT_ID: &str = "marina_bay";

/// One fetch per year; failed years are skipped.
pub fn collect_singapore_results(
    source: &dyn RaceDataSource,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Vec<RaceResult> {
    let total = years.len();
    let mut rows = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match source.race_results(year, SINGAPORE_CIRCUIT_ID) {
            Some(mut page) => {
                progress.on_complete(&key, i, total, Some(page.len()));
                rows.append(&mut page);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    progress.on_batch_complete("singapore race results", rows.len());
    rows
}
