//! Weather-impact analysis over collected tables.
//!
//! Joins race results with the reconciled weather table by year and reports
//! how winners distribute across weather conditions, how winner temperatures
//! compare with the rest of the field, and which rain-affected years went to
//! whom. Read-only; operates on the CSV snapshots a run left behind.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// The columns of the results table the analysis needs.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub year: i32,
    pub position: u32,
    pub driver_code: String,
}

/// The columns of the weather table the analysis needs.
#[derive(Debug, Clone)]
pub struct WeatherRow {
    pub year: i32,
    pub condition: String,
    pub temp_avg_c: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct WeatherImpact {
    /// Condition → number of winners, sorted by count descending.
    pub winners_by_condition: Vec<(String, usize)>,
    pub winner_avg_temp: Option<f64>,
    pub non_winner_avg_temp: Option<f64>,
    pub rain_years: Vec<i32>,
    pub rain_winners: Vec<String>,
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    match headers.iter().position(|h| h == name) {
        Some(i) => Ok(i),
        None => bail!("missing column '{name}'"),
    }
}

pub fn load_results(path: &Path) -> Result<Vec<ResultRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let year = column(&headers, "Year")?;
    let position = column(&headers, "Position")?;
    let driver = column(&headers, "DriverCode")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(ResultRow {
            year: record.get(year).unwrap_or("").parse().unwrap_or(0),
            position: record.get(position).unwrap_or("").parse().unwrap_or(0),
            driver_code: record.get(driver).unwrap_or("").to_string(),
        });
    }
    Ok(rows)
}

pub fn load_weather(path: &Path) -> Result<Vec<WeatherRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let year = column(&headers, "Year")?;
    let condition = column(&headers, "Weather_Condition")?;
    let temp = column(&headers, "Temperature_Avg_C")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(WeatherRow {
            year: record.get(year).unwrap_or("").parse().unwrap_or(0),
            condition: record.get(condition).unwrap_or("").to_string(),
            temp_avg_c: record.get(temp).and_then(|t| t.parse().ok()),
        });
    }
    Ok(rows)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Inner-join by year and aggregate.
pub fn analyze(results: &[ResultRow], weather: &[WeatherRow]) -> WeatherImpact {
    let weather_by_year: HashMap<i32, &WeatherRow> =
        weather.iter().map(|w| (w.year, w)).collect();

    let mut condition_counts: HashMap<&str, usize> = HashMap::new();
    let mut winner_temps = Vec::new();
    let mut non_winner_temps = Vec::new();
    let mut rain_years = Vec::new();
    let mut rain_winners = Vec::new();

    for row in results {
        let Some(w) = weather_by_year.get(&row.year) else {
            continue;
        };
        let is_winner = row.position == 1;

        if is_winner {
            *condition_counts.entry(w.condition.as_str()).or_default() += 1;
            if w.condition.contains("Rain") {
                rain_years.push(row.year);
                rain_winners.push(row.driver_code.clone());
            }
        }
        if let Some(temp) = w.temp_avg_c {
            if is_winner {
                winner_temps.push(temp);
            } else {
                non_winner_temps.push(temp);
            }
        }
    }

    let mut winners_by_condition: Vec<(String, usize)> = condition_counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    winners_by_condition.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    rain_years.sort_unstable();
    rain_years.dedup();

    WeatherImpact {
        winners_by_condition,
        winner_avg_temp: mean(&winner_temps),
        non_winner_avg_temp: mean(&non_winner_temps),
        rain_years,
        rain_winners,
    }
}

/// Human-readable report.
pub fn render_report(impact: &WeatherImpact) -> String {
    let mut out = String::with_capacity(512);

    out.push_str("Winners by weather condition:\n");
    if impact.winners_by_condition.is_empty() {
        out.push_str("  (no joined data)\n");
    }
    for (condition, count) in &impact.winners_by_condition {
        out.push_str(&format!("  {condition}: {count}\n"));
    }

    if let (Some(winner), Some(rest)) = (impact.winner_avg_temp, impact.non_winner_avg_temp) {
        out.push_str(&format!(
            "\nAverage temperature: winners {winner:.1} C, non-winners {rest:.1} C\n"
        ));
    }

    if !impact.rain_years.is_empty() {
        out.push_str(&format!("\nRain-affected years: {}\n", impact.rain_years.len()));
        out.push_str(&format!("Winners in rain: {}\n", impact.rain_winners.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(year: i32, position: u32, driver: &str) -> ResultRow {
        ResultRow {
            year,
            position,
            driver_code: driver.to_string(),
        }
    }

    fn weather(year: i32, condition: &str, temp: f64) -> WeatherRow {
        WeatherRow {
            year,
            condition: condition.to_string(),
            temp_avg_c: Some(temp),
        }
    }

    #[test]
    fn winners_grouped_by_condition() {
        let results = vec![
            result(2020, 1, "HAM"),
            result(2020, 2, "VER"),
            result(2021, 1, "VER"),
            result(2022, 1, "PER"),
        ];
        let weather = vec![
            weather(2020, "Clear", 28.0),
            weather(2021, "Clear", 29.0),
            weather(2022, "Rain", 26.0),
        ];

        let impact = analyze(&results, &weather);

        assert_eq!(
            impact.winners_by_condition,
            vec![("Clear".to_string(), 2), ("Rain".to_string(), 1)]
        );
        assert_eq!(impact.rain_years, vec![2022]);
        assert_eq!(impact.rain_winners, vec!["PER".to_string()]);
    }

    #[test]
    fn temperature_split_between_winners_and_rest() {
        let results = vec![
            result(2020, 1, "HAM"),
            result(2020, 5, "VER"),
            result(2021, 1, "VER"),
            result(2021, 8, "HAM"),
        ];
        let weather = vec![weather(2020, "Clear", 28.0), weather(2021, "Humid", 30.0)];

        let impact = analyze(&results, &weather);

        assert_eq!(impact.winner_avg_temp, Some(29.0));
        assert_eq!(impact.non_winner_avg_temp, Some(29.0));
    }

    #[test]
    fn years_without_weather_are_dropped_from_the_join() {
        let results = vec![result(2019, 1, "VET")];
        let impact = analyze(&results, &[]);

        assert!(impact.winners_by_condition.is_empty());
        assert_eq!(impact.winner_avg_temp, None);
        assert!(render_report(&impact).contains("no joined data"));
    }

    #[test]
    fn light_rain_counts_as_rain_affected() {
        let results = vec![result(2017, 1, "HAM")];
        let weather = vec![weather(2017, "Light Rain", 27.0)];

        let impact = analyze(&results, &weather);
        assert_eq!(impact.rain_years, vec![2017]);
    }

    #[test]
    fn loads_the_columns_it_needs_from_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let results_path = dir.path().join("results.csv");
        std::fs::write(
            &results_path,
            "Year,Race,Position,DriverCode\n2020,Singapore,1,HAM\n2020,Singapore,2,VER\n",
        )
        .unwrap();
        let weather_path = dir.path().join("weather.csv");
        std::fs::write(
            &weather_path,
            "Year,Temperature_Avg_C,Weather_Condition\n2020,28.5,Clear\n",
        )
        .unwrap();

        let results = load_results(&results_path).unwrap();
        let weather = load_weather(&weather_path).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].driver_code, "HAM");
        assert_eq!(weather[0].temp_avg_c, Some(28.5));

        let impact = analyze(&results, &weather);
        assert_eq!(impact.winners_by_condition, vec![("Clear".to_string(), 1)]);
    }
}
