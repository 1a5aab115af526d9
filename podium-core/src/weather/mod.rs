//! Weather synthesis and reconciliation.

pub mod reconcile;
pub mod synth;

pub use reconcile::{coverage, reconcile, SYNTHESIS_COVERAGE_THRESHOLD};
pub use synth::{condition_for, synthesize_range, synthesize_year};

use chrono::NaiveDate;

/// Approximate race date for a year, used when a source carries no session
/// date. The Singapore GP runs in late September.
pub fn approximate_race_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 9, 22).expect("valid race date")
}
