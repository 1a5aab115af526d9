//! Podium Core — domain records, remote source clients, weather synthesis and reconciliation.
//!
//! This crate contains the data side of the pipeline:
//! - Flat record types for every output table (results, standings, circuits,
//!   schedules, session results, weather)
//! - Source clients for the upstream HTTP APIs, behind mockable traits
//! - An explicit request-pacing policy shared by all clients
//! - Deterministic per-year weather synthesis
//! - The observed-over-synthetic weather reconciliation step

pub mod data;
pub mod domain;
pub mod weather;
