//! Richer per-race results from the session-level provider.

use podium_core::data::{CollectProgress, SessionDataSource};
use podium_core::domain::SessionResult;

pub fn collect_session_results(
    source: &dyn SessionDataSource,
    years: &[i32],
    progress: &dyn CollectProgress,
) -> Vec<SessionResult> {
    let total = years.len();
    let mut rows = Vec::new();

    for (i, &year) in years.iter().enumerate() {
        let key = year.to_string();
        progress.on_start(&key, i, total);
        match source.race_results(year) {
            Some(mut page) => {
                progress.on_complete(&key, i, total, Some(page.len()));
                rows.append(&mut page);
            }
            None => progress.on_complete(&key, i, total, None),
        }
    }

    progress.on_batch_complete("session results", rows.len());
    rows
}
