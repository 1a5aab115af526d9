//! End-of-run collection summary.
//!
//! Enumerates the CSV files actually present in the data directory, counts
//! their records, and checks a fixed list of key files. Purely
//! observational: the summary never gates success or failure of a run.

use std::path::Path;

use anyhow::{Context, Result};

use crate::export::{
    CONSTRUCTOR_STANDINGS_FILE, DRIVER_STANDINGS_FILE, RESULTS_FILE, WEATHER_FILE,
};

/// Files a complete run is expected to leave behind.
pub const KEY_FILES: [&str; 4] = [
    RESULTS_FILE,
    DRIVER_STANDINGS_FILE,
    CONSTRUCTOR_STANDINGS_FILE,
    WEATHER_FILE,
];

#[derive(Debug, Clone)]
pub struct FileSummary {
    pub name: String,
    pub records: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct CollectionSummary {
    pub files: Vec<FileSummary>,
    pub total_records: usize,
    /// (file name, present on disk).
    pub key_files: Vec<(String, bool)>,
}

/// Inventory the data directory.
pub fn summarize(data_dir: &Path) -> Result<CollectionSummary> {
    let mut files = Vec::new();

    if data_dir.exists() {
        let entries = std::fs::read_dir(data_dir)
            .with_context(|| format!("failed to read {}", data_dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let records = match count_records(&path) {
                Ok(n) => n,
                Err(e) => {
                    eprintln!("WARNING: could not read {name}: {e}");
                    0
                }
            };
            files.push(FileSummary { name, records, bytes });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    let total_records = files.iter().map(|f| f.records).sum();

    let key_files = KEY_FILES
        .iter()
        .map(|name| (name.to_string(), data_dir.join(name).exists()))
        .collect();

    Ok(CollectionSummary {
        files,
        total_records,
        key_files,
    })
}

fn count_records(path: &Path) -> Result<usize> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(rdr.records().flatten().count())
}

/// Human-readable report.
pub fn render_report(summary: &CollectionSummary) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(&format!("Collected {} data files:\n", summary.files.len()));
    for f in &summary.files {
        out.push_str(&format!(
            "  OK {}: {} records ({:.1} KB)\n",
            f.name,
            f.records,
            f.bytes as f64 / 1024.0
        ));
    }
    out.push_str(&format!("\nTotal records: {}\n", summary.total_records));

    out.push_str("\nKey data files:\n");
    for (name, present) in &summary.key_files {
        if *present {
            out.push_str(&format!("  OK {name}\n"));
        } else {
            out.push_str(&format!("  MISSING {name}\n"));
        }
    }

    out
}
