//! Observed-over-synthetic weather reconciliation.
//!
//! Observed records are collected first (session telemetry, then the
//! commercial history source when configured); if they cover less than half
//! of the requested years, a synthetic record is generated for every
//! requested year. Observed records precede synthetic ones in the merge, and
//! deduplication keeps the first occurrence per year, so an observed year is
//! never replaced. The synthesis trigger is all-or-nothing across the whole
//! range: 49% coverage fills every year, 51% fills none.

use std::collections::HashSet;

use super::synth::synthesize_range;
use crate::domain::WeatherRecord;

/// Observed coverage below this fraction triggers bulk synthesis.
pub const SYNTHESIS_COVERAGE_THRESHOLD: f64 = 0.5;

/// Fraction of requested years with at least one observed record.
///
/// Counts distinct years, so a year observed by two sources counts once.
pub fn coverage(observed: &[WeatherRecord], years: &[i32]) -> f64 {
    let requested: HashSet<i32> = years.iter().copied().collect();
    if requested.is_empty() {
        return 0.0;
    }
    let covered = observed
        .iter()
        .map(|w| w.year)
        .filter(|y| requested.contains(y))
        .collect::<HashSet<i32>>()
        .len();
    covered as f64 / requested.len() as f64
}

/// Merge observed records with the synthetic fallback for a requested range.
///
/// Returns `None` when no record exists from either path; the caller then
/// reports failure and writes nothing.
pub fn reconcile(observed: Vec<WeatherRecord>, years: &[i32]) -> Option<Vec<WeatherRecord>> {
    let mut merged = observed;
    if coverage(&merged, years) < SYNTHESIS_COVERAGE_THRESHOLD {
        merged.extend(synthesize_range(years));
    }

    // Keep-first dedup by year; observed entries precede synthetic ones.
    let mut seen = HashSet::new();
    merged.retain(|w| seen.insert(w.year));

    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WeatherSource, RACE_NAME};
    use crate::weather::approximate_race_date;

    fn observed(year: i32) -> WeatherRecord {
        WeatherRecord {
            year,
            race: RACE_NAME.to_string(),
            date: approximate_race_date(year),
            temp_min_c: 25.0,
            temp_max_c: 30.0,
            temp_avg_c: 27.5,
            humidity_pct: 78.0,
            precipitation_mm: 0.0,
            wind_speed_kmh: 10.0,
            wind_direction_deg: 90.0,
            pressure_hpa: 1012.0,
            condition: "Clear".to_string(),
            source: WeatherSource::Observed,
        }
    }

    #[test]
    fn observed_year_wins_over_synthetic() {
        let years = [2020, 2021, 2022];
        let merged = reconcile(vec![observed(2020)], &years).unwrap();

        assert_eq!(merged.len(), 3);
        let y2020 = merged.iter().find(|w| w.year == 2020).unwrap();
        assert_eq!(y2020.source, WeatherSource::Observed);
        for year in [2021, 2022] {
            let w = merged.iter().find(|w| w.year == year).unwrap();
            assert_eq!(w.source, WeatherSource::Synthetic);
        }
    }

    #[test]
    fn sparse_coverage_fills_every_requested_year_exactly_once() {
        let years: Vec<i32> = (2008..=2024).collect();
        // 4 of 17 observed → coverage well under the threshold.
        let merged = reconcile(
            vec![observed(2021), observed(2022), observed(2023), observed(2024)],
            &years,
        )
        .unwrap();

        let mut seen = HashSet::new();
        for w in &merged {
            assert!(seen.insert(w.year), "duplicate year {}", w.year);
        }
        for year in &years {
            assert!(seen.contains(year), "missing year {year}");
        }
        assert_eq!(merged.len(), years.len());
    }

    #[test]
    fn sufficient_coverage_skips_synthesis_entirely() {
        let years = [2020, 2021, 2022, 2023];
        let merged = reconcile(vec![observed(2020), observed(2021)], &years).unwrap();

        // Exactly at the threshold: no synthesis, uncovered years stay absent.
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|w| w.source == WeatherSource::Observed));
        assert!(!merged.iter().any(|w| w.year == 2022));
    }

    #[test]
    fn just_below_threshold_triggers_synthesis() {
        // 1 of 3 observed → 33% < 50%.
        let years = [2020, 2021, 2022];
        let merged = reconcile(vec![observed(2020)], &years).unwrap();
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn no_data_from_either_path_is_a_failure() {
        assert!(reconcile(Vec::new(), &[]).is_none());
    }

    #[test]
    fn empty_range_with_observed_records_keeps_them() {
        let merged = reconcile(vec![observed(2019)], &[]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].year, 2019);
    }

    #[test]
    fn duplicate_observed_years_keep_the_first_occurrence() {
        let mut first = observed(2020);
        first.humidity_pct = 70.0;
        let mut second = observed(2020);
        second.humidity_pct = 90.0;

        let merged = reconcile(vec![first, second, observed(2021)], &[2020, 2021]).unwrap();
        assert_eq!(merged.len(), 2);
        let y2020 = merged.iter().find(|w| w.year == 2020).unwrap();
        assert_eq!(y2020.humidity_pct, 70.0);
    }

    #[test]
    fn double_observation_does_not_inflate_coverage() {
        // Two records for one year out of four requested: 25% coverage, so
        // synthesis must still run.
        let years = [2020, 2021, 2022, 2023];
        let merged = reconcile(vec![observed(2020), observed(2020)], &years).unwrap();
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn example_three_years_one_observed() {
        let years = [2020, 2021, 2022];
        let merged = reconcile(vec![observed(2020)], &years).unwrap();

        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.iter().find(|w| w.year == 2020).unwrap().source,
            WeatherSource::Observed
        );
        for year in [2021, 2022] {
            let w = merged.iter().find(|w| w.year == year).unwrap();
            assert_eq!(w.source, WeatherSource::Synthetic);
            // Condition must agree with the synthetic generator's own output
            // for the same year.
            assert_eq!(w.condition, crate::weather::synthesize_year(year).condition);
        }
    }
}
