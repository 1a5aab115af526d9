//! Podium Web — read-only prediction dashboard.
//!
//! Serves precomputed model artifacts (predictions, feature importance, run
//! summary) over a small HTTP surface. The artifacts are loaded exactly once
//! before request handling begins into an immutable process-wide snapshot;
//! if any artifact is absent or fails to deserialize, every data route
//! renders a "data not found" state instead, and the process still serves
//! the static routes.

pub mod artifacts;
pub mod routes;
pub mod views;
