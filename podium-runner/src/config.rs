//! Collection run configuration.
//!
//! Serializable, loadable from TOML with every field defaulted, so a config
//! file only needs to name what it changes. CLI flags override on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters of one collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Output directory for the snapshot tables.
    pub data_dir: PathBuf,

    /// Singapore GP result years (the race first ran in 2008).
    pub results_start_year: i32,
    pub results_end_year: i32,

    /// Standings/schedule years (recent seasons only).
    pub standings_start_year: i32,
    pub standings_end_year: i32,

    /// Minimum interval between requests to one upstream host.
    pub request_delay_ms: u64,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Commercial weather-history credential; the source is skipped without it.
    pub openweather_api_key: Option<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_start_year: 2008,
            results_end_year: 2024,
            standings_start_year: 2015,
            standings_end_year: 2024,
            request_delay_ms: 500,
            timeout_secs: 10,
            openweather_api_key: None,
        }
    }
}

impl CollectionConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn results_years(&self) -> Vec<i32> {
        (self.results_start_year..=self.results_end_year).collect()
    }

    pub fn standings_years(&self) -> Vec<i32> {
        (self.standings_start_year..=self.standings_end_year).collect()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
