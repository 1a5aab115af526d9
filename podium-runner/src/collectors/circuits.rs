//! Circuit reference table collection (a single fixed request).

use podium_core::data::{CollectProgress, RaceDataSource};
use podium_core::domain::CircuitInfo;

pub fn collect_circuits(
    source: &dyn RaceDataSource,
    progress: &dyn CollectProgress,
) -> Vec<CircuitInfo> {
    progress.on_start("circuits", 0, 1);
    let rows = match source.circuits() {
        Some(rows) => {
            progress.on_complete("circuits", 0, 1, Some(rows.len()));
            rows
        }
        None => {
            progress.on_complete("circuits", 0, 1, None);
            Vec::new()
        }
    };

    progress.on_batch_complete("circuit reference", rows.len());
    rows
}
