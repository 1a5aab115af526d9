//! Ergast historical results API client.
//!
//! Addresses the JSON API by year and endpoint name (`{base}/{endpoint}.json`)
//! and flattens the `MRData` envelope into flat records. Numeric values come
//! back as JSON strings and are parsed leniently; optional nested blocks
//! (finish time, fastest lap, permanent number) map to `None` instead of
//! dropping the row.
//!
//! One request per call, no retries. Any transport/HTTP/decode failure is
//! logged and becomes an absent result the collector skips.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::pacing::RequestPacer;
use super::source::{RaceDataSource, SourceError};
use crate::domain::{
    CircuitInfo, ConstructorStanding, DriverStanding, RaceResult, ScheduleEntry,
};

pub const DEFAULT_BASE_URL: &str = "http://ergast.com/api/f1";

// ─── Response envelope ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ErgastResponse {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Deserialize)]
struct MrData {
    #[serde(rename = "RaceTable")]
    race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    standings_table: Option<StandingsTable>,
    #[serde(rename = "CircuitTable")]
    circuit_table: Option<CircuitTable>,
}

#[derive(Debug, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races")]
    races: Vec<RaceNode>,
}

#[derive(Debug, Deserialize)]
struct RaceNode {
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    date: Option<String>,
    time: Option<String>,
    #[serde(rename = "Circuit")]
    circuit: CircuitNode,
    #[serde(rename = "Results", default)]
    results: Vec<ResultNode>,
}

#[derive(Debug, Deserialize)]
struct CircuitNode {
    #[serde(rename = "circuitId")]
    circuit_id: String,
    #[serde(rename = "circuitName")]
    circuit_name: String,
    #[serde(rename = "Location")]
    location: LocationNode,
}

#[derive(Debug, Deserialize)]
struct LocationNode {
    lat: String,
    long: String,
    locality: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ResultNode {
    position: String,
    #[serde(rename = "positionText")]
    position_text: String,
    points: String,
    #[serde(rename = "Driver")]
    driver: DriverNode,
    #[serde(rename = "Constructor")]
    constructor: ConstructorNode,
    grid: String,
    laps: String,
    status: String,
    #[serde(rename = "Time")]
    time: Option<TimeNode>,
    #[serde(rename = "FastestLap")]
    fastest_lap: Option<FastestLapNode>,
}

#[derive(Debug, Deserialize)]
struct DriverNode {
    #[serde(rename = "permanentNumber")]
    permanent_number: Option<String>,
    code: Option<String>,
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
}

#[derive(Debug, Deserialize)]
struct ConstructorNode {
    #[serde(rename = "constructorId")]
    constructor_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TimeNode {
    time: String,
}

#[derive(Debug, Deserialize)]
struct FastestLapNode {
    rank: Option<String>,
    #[serde(rename = "Time")]
    time: Option<TimeNode>,
    #[serde(rename = "AverageSpeed")]
    average_speed: Option<AverageSpeedNode>,
}

#[derive(Debug, Deserialize)]
struct AverageSpeedNode {
    speed: String,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    #[serde(rename = "StandingsLists")]
    standings_lists: Vec<StandingsListNode>,
}

#[derive(Debug, Deserialize)]
struct StandingsListNode {
    season: String,
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<DriverStandingNode>,
    #[serde(rename = "ConstructorStandings", default)]
    constructor_standings: Vec<ConstructorStandingNode>,
}

#[derive(Debug, Deserialize)]
struct DriverStandingNode {
    position: String,
    points: String,
    wins: String,
    #[serde(rename = "Driver")]
    driver: DriverNode,
    #[serde(rename = "Constructors", default)]
    constructors: Vec<ConstructorNode>,
}

#[derive(Debug, Deserialize)]
struct ConstructorStandingNode {
    position: String,
    points: String,
    wins: String,
    #[serde(rename = "Constructor")]
    constructor: ConstructorNode,
}

#[derive(Debug, Deserialize)]
struct CircuitTable {
    #[serde(rename = "Circuits")]
    circuits: Vec<CircuitNode>,
}

// ─── Flattening ─────────────────────────────────────────────────────

fn parse_num<T: FromStr>(s: &str) -> Option<T> {
    s.trim().parse().ok()
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Three-letter code for a driver, falling back to the family name when the
/// API carries no code (pre-2014 seasons).
fn driver_code(driver: &DriverNode) -> String {
    match &driver.code {
        Some(code) => code.clone(),
        None => driver
            .family_name
            .chars()
            .filter(|c| c.is_alphabetic())
            .take(3)
            .collect::<String>()
            .to_uppercase(),
    }
}

fn flatten_race_results(year: i32, table: RaceTable) -> Vec<RaceResult> {
    let mut rows = Vec::new();
    for race in table.races {
        let round: u32 = parse_num(&race.round).unwrap_or(0);
        let date = parse_date(race.date.as_deref());
        for result in race.results {
            rows.push(RaceResult {
                year,
                round,
                race_name: race.race_name.clone(),
                date,
                position: parse_num(&result.position).unwrap_or(0),
                position_text: result.position_text,
                points: parse_num(&result.points).unwrap_or(0.0),
                driver_number: result
                    .driver
                    .permanent_number
                    .as_deref()
                    .and_then(parse_num),
                driver_code: driver_code(&result.driver),
                given_name: result.driver.given_name,
                family_name: result.driver.family_name,
                constructor_name: result.constructor.name,
                constructor_id: result.constructor.constructor_id,
                grid: parse_num(&result.grid).unwrap_or(0),
                laps: parse_num(&result.laps).unwrap_or(0),
                status: result.status,
                time: result.time.map(|t| t.time),
                fastest_lap_rank: result
                    .fastest_lap
                    .as_ref()
                    .and_then(|f| f.rank.as_deref())
                    .and_then(parse_num),
                fastest_lap_time: result
                    .fastest_lap
                    .as_ref()
                    .and_then(|f| f.time.as_ref())
                    .map(|t| t.time.clone()),
                fastest_lap_avg_speed: result
                    .fastest_lap
                    .as_ref()
                    .and_then(|f| f.average_speed.as_ref())
                    .and_then(|s| parse_num(&s.speed)),
            });
        }
    }
    rows
}

fn flatten_driver_standings(table: StandingsTable) -> Vec<DriverStanding> {
    let mut rows = Vec::new();
    for list in table.standings_lists {
        let year: i32 = parse_num(&list.season).unwrap_or(0);
        for standing in list.driver_standings {
            let constructor = standing.constructors.first();
            rows.push(DriverStanding {
                year,
                position: parse_num(&standing.position).unwrap_or(0),
                points: parse_num(&standing.points).unwrap_or(0.0),
                wins: parse_num(&standing.wins).unwrap_or(0),
                driver_code: driver_code(&standing.driver),
                given_name: standing.driver.given_name,
                family_name: standing.driver.family_name,
                constructor_name: constructor.map(|c| c.name.clone()),
                constructor_id: constructor.map(|c| c.constructor_id.clone()),
            });
        }
    }
    rows
}

fn flatten_constructor_standings(table: StandingsTable) -> Vec<ConstructorStanding> {
    let mut rows = Vec::new();
    for list in table.standings_lists {
        let year: i32 = parse_num(&list.season).unwrap_or(0);
        for standing in list.constructor_standings {
            rows.push(ConstructorStanding {
                year,
                position: parse_num(&standing.position).unwrap_or(0),
                points: parse_num(&standing.points).unwrap_or(0.0),
                wins: parse_num(&standing.wins).unwrap_or(0),
                constructor_name: standing.constructor.name,
                constructor_id: standing.constructor.constructor_id,
            });
        }
    }
    rows
}

fn flatten_circuits(table: CircuitTable) -> Vec<CircuitInfo> {
    table
        .circuits
        .into_iter()
        .map(|c| CircuitInfo {
            circuit_id: c.circuit_id,
            circuit_name: c.circuit_name,
            latitude: parse_num(&c.location.lat).unwrap_or(f64::NAN),
            longitude: parse_num(&c.location.long).unwrap_or(f64::NAN),
            country: c.location.country,
            locality: c.location.locality,
        })
        .collect()
}

fn flatten_schedule(year: i32, table: RaceTable) -> Vec<ScheduleEntry> {
    table
        .races
        .into_iter()
        .map(|race| ScheduleEntry {
            year,
            round: parse_num(&race.round).unwrap_or(0),
            race_name: race.race_name,
            circuit_id: race.circuit.circuit_id,
            circuit_name: race.circuit.circuit_name,
            date: parse_date(race.date.as_deref()),
            time: race.time,
            country: race.circuit.location.country,
            locality: race.circuit.location.locality,
        })
        .collect()
}

// ─── Client ─────────────────────────────────────────────────────────

/// Blocking Ergast client with a fixed request timeout and paced requests.
pub struct ErgastClient {
    client: reqwest::blocking::Client,
    base_url: String,
    pacer: RequestPacer,
}

impl ErgastClient {
    pub fn new(timeout: Duration, pacer: RequestPacer) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            pacer,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One paced request to `{base}/{endpoint}.json`.
    ///
    /// Failures are logged here and become `None`; the calling collector
    /// skips the page.
    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Option<MrData> {
        match self.try_get(endpoint, params) {
            Ok(data) => Some(data),
            Err(e) => {
                eprintln!("ergast: {e}");
                None
            }
        }
    }

    fn try_get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<MrData, SourceError> {
        let url = format!("{}/{}.json", self.base_url, endpoint);
        self.pacer.pause();
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let envelope: ErgastResponse = resp.json().map_err(|e| SourceError::Decode {
            url,
            reason: e.to_string(),
        })?;
        Ok(envelope.mr_data)
    }
}

impl RaceDataSource for ErgastClient {
    fn race_results(&self, year: i32, circuit_id: &str) -> Option<Vec<RaceResult>> {
        let table = self
            .get(
                &format!("{year}/circuits/{circuit_id}/results"),
                &[("limit", "100")],
            )?
            .race_table?;
        Some(flatten_race_results(year, table))
    }

    fn driver_standings(&self, year: i32) -> Option<Vec<DriverStanding>> {
        let table = self
            .get(&format!("{year}/driverStandings"), &[])?
            .standings_table?;
        Some(flatten_driver_standings(table))
    }

    fn constructor_standings(&self, year: i32) -> Option<Vec<ConstructorStanding>> {
        let table = self
            .get(&format!("{year}/constructorStandings"), &[])?
            .standings_table?;
        Some(flatten_constructor_standings(table))
    }

    fn circuits(&self) -> Option<Vec<CircuitInfo>> {
        // The circuit table spans more than the default page size; still one
        // request, with an explicit limit instead of a pagination loop.
        let table = self.get("circuits", &[("limit", "200")])?.circuit_table?;
        Some(flatten_circuits(table))
    }

    fn season_schedule(&self, year: i32) -> Option<Vec<ScheduleEntry>> {
        let table = self
            .get(&format!("{year}"), &[("limit", "100")])?
            .race_table?;
        Some(flatten_schedule(year, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_FIXTURE: &str = r#"{
      "MRData": {
        "RaceTable": {
          "Races": [{
            "season": "2008",
            "round": "15",
            "raceName": "Singapore Grand Prix",
            "date": "2008-09-28",
            "Circuit": {
              "circuitId": "marina_bay",
              "circuitName": "Marina Bay Street Circuit",
              "Location": {"lat": "1.2914", "long": "103.864", "locality": "Marina Bay", "country": "Singapore"}
            },
            "Results": [
              {
                "position": "1",
                "positionText": "1",
                "points": "10",
                "Driver": {"code": "ALO", "givenName": "Fernando", "familyName": "Alonso"},
                "Constructor": {"constructorId": "renault", "name": "Renault"},
                "grid": "15",
                "laps": "61",
                "status": "Finished",
                "Time": {"millis": "6976304", "time": "1:57:16.304"},
                "FastestLap": {
                  "rank": "3",
                  "Time": {"time": "1:45:25.015"},
                  "AverageSpeed": {"units": "kph", "speed": "173.075"}
                }
              },
              {
                "position": "14",
                "positionText": "R",
                "points": "0",
                "Driver": {"givenName": "Felipe", "familyName": "Massa"},
                "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
                "grid": "1",
                "laps": "57",
                "status": "Collision"
              }
            ]
          }]
        }
      }
    }"#;

    const STANDINGS_FIXTURE: &str = r#"{
      "MRData": {
        "StandingsTable": {
          "StandingsLists": [{
            "season": "2015",
            "round": "19",
            "DriverStandings": [{
              "position": "1",
              "points": "381",
              "wins": "10",
              "Driver": {"permanentNumber": "44", "code": "HAM", "givenName": "Lewis", "familyName": "Hamilton"},
              "Constructors": [{"constructorId": "mercedes", "name": "Mercedes"}]
            }],
            "ConstructorStandings": [{
              "position": "1",
              "points": "703",
              "wins": "16",
              "Constructor": {"constructorId": "mercedes", "name": "Mercedes"}
            }]
          }]
        }
      }
    }"#;

    const CIRCUITS_FIXTURE: &str = r#"{
      "MRData": {
        "CircuitTable": {
          "Circuits": [{
            "circuitId": "marina_bay",
            "circuitName": "Marina Bay Street Circuit",
            "Location": {"lat": "1.2914", "long": "103.864", "locality": "Marina Bay", "country": "Singapore"}
          }]
        }
      }
    }"#;

    fn parse(fixture: &str) -> MrData {
        serde_json::from_str::<ErgastResponse>(fixture)
            .expect("fixture parses")
            .mr_data
    }

    #[test]
    fn race_results_flatten_all_rows() {
        let table = parse(RESULTS_FIXTURE).race_table.unwrap();
        let rows = flatten_race_results(2008, table);

        assert_eq!(rows.len(), 2);
        let winner = &rows[0];
        assert_eq!(winner.year, 2008);
        assert_eq!(winner.round, 15);
        assert_eq!(winner.driver_code, "ALO");
        assert_eq!(winner.position, 1);
        assert_eq!(winner.points, 10.0);
        assert_eq!(winner.grid, 15);
        assert_eq!(winner.laps, 61);
        assert_eq!(winner.time.as_deref(), Some("1:57:16.304"));
        assert_eq!(winner.fastest_lap_rank, Some(3));
        assert_eq!(winner.fastest_lap_time.as_deref(), Some("1:45:25.015"));
        assert_eq!(winner.fastest_lap_avg_speed, Some(173.075));
        assert_eq!(
            winner.date,
            NaiveDate::from_ymd_opt(2008, 9, 28)
        );
    }

    #[test]
    fn missing_optional_blocks_become_none_without_dropping_the_row() {
        let table = parse(RESULTS_FIXTURE).race_table.unwrap();
        let rows = flatten_race_results(2008, table);

        let retired = &rows[1];
        assert_eq!(retired.position_text, "R");
        assert_eq!(retired.status, "Collision");
        assert_eq!(retired.time, None);
        assert_eq!(retired.fastest_lap_rank, None);
        assert_eq!(retired.fastest_lap_time, None);
        assert_eq!(retired.fastest_lap_avg_speed, None);
        assert_eq!(retired.driver_number, None);
    }

    #[test]
    fn driver_code_falls_back_to_family_name() {
        let table = parse(RESULTS_FIXTURE).race_table.unwrap();
        let rows = flatten_race_results(2008, table);
        // No "code" field in the fixture for Massa.
        assert_eq!(rows[1].driver_code, "MAS");
    }

    #[test]
    fn driver_standings_flatten() {
        let table = parse(STANDINGS_FIXTURE).standings_table.unwrap();
        let rows = flatten_driver_standings(table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2015);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].points, 381.0);
        assert_eq!(rows[0].wins, 10);
        assert_eq!(rows[0].driver_code, "HAM");
        assert_eq!(rows[0].constructor_id.as_deref(), Some("mercedes"));
    }

    #[test]
    fn constructor_standings_flatten() {
        let table = parse(STANDINGS_FIXTURE).standings_table.unwrap();
        let rows = flatten_constructor_standings(table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].constructor_name, "Mercedes");
        assert_eq!(rows[0].points, 703.0);
        assert_eq!(rows[0].wins, 16);
    }

    #[test]
    fn circuits_flatten() {
        let table = parse(CIRCUITS_FIXTURE).circuit_table.unwrap();
        let rows = flatten_circuits(table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].circuit_id, "marina_bay");
        assert_eq!(rows[0].country, "Singapore");
        assert!((rows[0].latitude - 1.2914).abs() < 1e-9);
    }

    #[test]
    fn schedule_flattens_from_race_table() {
        let table = parse(RESULTS_FIXTURE).race_table.unwrap();
        let rows = flatten_schedule(2008, table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].round, 15);
        assert_eq!(rows[0].circuit_id, "marina_bay");
        assert_eq!(rows[0].time, None);
        assert_eq!(rows[0].locality, "Marina Bay");
    }
}
