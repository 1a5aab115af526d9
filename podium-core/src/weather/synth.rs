//! Deterministic synthetic race-day weather.
//!
//! When observed coverage is too sparse, the pipeline fills the whole
//! requested range with records modeled on Singapore's September climate
//! (hot, humid, frequent evening rain). Each year seeds its own RNG, with
//! the seed derived by BLAKE3 from a fixed domain tag and the year, so
//! reruns are identical and years are independent of one another.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use super::approximate_race_date;
use crate::domain::{WeatherRecord, WeatherSource, RACE_NAME};

const SEED_DOMAIN: &[u8] = b"podium.weather.synthesis.v1";

/// Derive the per-year RNG seed. Hash-based, so derivation order is
/// irrelevant and neighboring years share nothing.
fn year_seed(year: i32) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(&year.to_le_bytes());
    let hash = hasher.finalize();
    u64::from_le_bytes(
        hash.as_bytes()[..8]
            .try_into()
            .expect("hash is at least 8 bytes"),
    )
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Weather condition label from precipitation and humidity thresholds.
pub fn condition_for(precipitation_mm: f64, humidity_pct: f64) -> &'static str {
    if precipitation_mm > 10.0 {
        "Rain"
    } else if precipitation_mm > 2.0 {
        "Light Rain"
    } else if humidity_pct > 85.0 {
        "Humid"
    } else {
        "Clear"
    }
}

/// Synthesize one year's record. Deterministic for a fixed year.
pub fn synthesize_year(year: i32) -> WeatherRecord {
    let mut rng = StdRng::seed_from_u64(year_seed(year));

    let temp_min = Normal::new(26.0, 2.0)
        .expect("valid distribution params")
        .sample(&mut rng);
    let temp_max = Normal::new(31.0, 2.0)
        .expect("valid distribution params")
        .sample(&mut rng);
    let temp_avg = (temp_min + temp_max) / 2.0;

    let humidity = Normal::<f64>::new(80.0, 10.0)
        .expect("valid distribution params")
        .sample(&mut rng)
        .clamp(60.0, 95.0);

    // Exponential with mean 5 mm: most race days see little rain, a few a lot.
    let precipitation = Exp::new(1.0 / 5.0)
        .expect("valid distribution params")
        .sample(&mut rng);

    // Mean 8 km/h, capped; strong wind is rare at the equator.
    let wind_speed = Exp::<f64>::new(1.0 / 8.0)
        .expect("valid distribution params")
        .sample(&mut rng)
        .min(25.0);
    let wind_direction: f64 = rng.gen_range(0.0..360.0);

    let pressure = Normal::new(1013.0, 10.0)
        .expect("valid distribution params")
        .sample(&mut rng);

    let condition = condition_for(precipitation, humidity);

    WeatherRecord {
        year,
        race: RACE_NAME.to_string(),
        date: approximate_race_date(year),
        temp_min_c: round1(temp_min),
        temp_max_c: round1(temp_max),
        temp_avg_c: round1(temp_avg),
        humidity_pct: round1(humidity),
        precipitation_mm: round1(precipitation),
        wind_speed_kmh: round1(wind_speed),
        wind_direction_deg: wind_direction.round(),
        pressure_hpa: round1(pressure),
        condition: condition.to_string(),
        source: WeatherSource::Synthetic,
    }
}

/// Synthesize records for every requested year, in request order.
pub fn synthesize_range(years: &[i32]) -> Vec<WeatherRecord> {
    years.iter().map(|&y| synthesize_year(y)).collect()
}
