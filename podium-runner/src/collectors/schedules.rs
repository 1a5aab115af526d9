//! Season schedule collection.

use podium_core::data::{CollectProgress, RaceDataSource};
use podium_core::domain::ScheduleEntry;

pub fn collect_schedules(
    source: &dyn RaceDataSource,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Vec<ScheduleEntry> {
    let total = years.len();
    let mut rows = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match source.season_schedule(year) {
            Some(mut page) => {
                progress.on_complete(&key, i, total, Some(page.len()));
                rows.append(&mut page);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    progress.on_batch_complete("season schedules", rows.len());
    rows
}
