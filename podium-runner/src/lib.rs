//! Podium Runner — per-domain collectors, CSV export, orchestration, reporting.
//!
//! This crate builds on `podium-core` to provide:
//! - One collector per output table (results, standings, circuits,
//!   schedules, session results, reconciled weather)
//! - CSV snapshot writing for every domain
//! - A fixed-sequence orchestrator that tolerates per-domain failure
//! - The end-of-run summary (file inventory + key-file checklist)
//! - The weather-impact analysis over collected tables

pub mod analysis;
pub mod collectors;
pub mod config;
pub mod export;
pub mod orchestrator;
pub mod summary;

pub use config::{CollectionConfig, ConfigError};
pub use orchestrator::{run_collection, CollectionReport, DomainOutcome};
pub use summary::{summarize, CollectionSummary, FileSummary};
