//! Championship standings collection (driver and constructor variants).

use podium_core::data::{CollectProgress, RaceDataSource};
use podium_core::domain::{ConstructorStanding, DriverStanding};

pub fn collect_driver_standings(
    source: &dyn RaceDataSource,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Vec<DriverStanding> {
    let total = years.len();
    let mut rows = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match source.driver_standings(year) {
            Some(mut page) => {
                progress.on_complete(&key, i, total, Some(page.len()));
                rows.append(&mut page);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    progress.on_batch_complete("driver standings", rows.len());
    rows
}

pub fn collect_constructor_standings(
    source: &dyn RaceDataSource,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Vec<ConstructorStanding> {
    let total = years.len();
    let mut rows = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match source.constructor_standings(year) {
            Some(mut page) => {
                progress.on_complete(&key, i, total, Some(page.len()));
                rows.append(&mut page);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    progress.on_batch_complete("constructor standings", rows.len());
    rows
}
