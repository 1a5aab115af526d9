//! Precomputed model artifacts and the process-wide snapshot.
//!
//! The (external) modeling run leaves behind the serialized model, the
//! feature scaler, the label encoders, and three tables: predictions,
//! feature importance, and a single-row run summary. Every artifact must
//! load for the dashboard to leave its "data not found" state.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const MODEL_FILE: &str = "best_model.json";
pub const SCALER_FILE: &str = "feature_scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const PREDICTIONS_FILE: &str = "singapore_gp_2025_predictions.csv";
pub const FEATURE_IMPORTANCE_FILE: &str = "feature_importance.csv";
pub const SUMMARY_FILE: &str = "prediction_summary.csv";

/// The serialized predictive model (opaque to the dashboard beyond metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

/// Per-feature standardization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub feature_names: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

/// Categorical column → ordered class labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoders(pub BTreeMap<String, Vec<String>>);

/// One ranked prediction row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Win_Probability")]
    pub win_probability: f64,
    #[serde(rename = "Predicted_Position")]
    pub predicted_position: f64,
}

/// One feature-importance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportanceRow {
    #[serde(rename = "Feature")]
    pub feature: String,
    #[serde(rename = "Importance")]
    pub importance: f64,
}

/// The single-row run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSummary {
    #[serde(rename = "Race")]
    pub race: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Predicted_Winner")]
    pub predicted_winner: String,
    #[serde(rename = "Win_Probability")]
    pub win_probability: f64,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Generated_At")]
    pub generated_at: String,
}

/// Per-team rollup of the prediction table.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAggregate {
    pub team: String,
    pub total_win_probability: f64,
    pub drivers: usize,
}

/// Everything a request handler can read. Immutable after startup.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub model: ModelArtifact,
    pub scaler: ScalerArtifact,
    pub encoders: LabelEncoders,
    pub predictions: Vec<PredictionRow>,
    pub feature_importance: Vec<FeatureImportanceRow>,
    pub summary: PredictionSummary,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row.with_context(|| format!("failed to parse {}", path.display()))?);
    }
    Ok(rows)
}

impl ModelData {
    /// Load all five artifacts from the features directory.
    pub fn load(features_dir: &Path) -> Result<Self> {
        let model = load_json(&features_dir.join(MODEL_FILE))?;
        let scaler = load_json(&features_dir.join(SCALER_FILE))?;
        let encoders = load_json(&features_dir.join(ENCODERS_FILE))?;
        let predictions = load_csv(&features_dir.join(PREDICTIONS_FILE))?;
        let feature_importance = load_csv(&features_dir.join(FEATURE_IMPORTANCE_FILE))?;
        let summary: PredictionSummary = load_csv(&features_dir.join(SUMMARY_FILE))?
            .into_iter()
            .next()
            .context("prediction summary is empty")?;

        Ok(Self {
            model,
            scaler,
            encoders,
            predictions,
            feature_importance,
            summary,
        })
    }

    /// Case-insensitive lookup by driver code.
    pub fn find_driver(&self, code: &str) -> Option<&PredictionRow> {
        self.predictions
            .iter()
            .find(|p| p.driver.eq_ignore_ascii_case(code))
    }

    pub fn top_predictions(&self, n: usize) -> &[PredictionRow] {
        &self.predictions[..n.min(self.predictions.len())]
    }

    /// Team totals, sorted by total win probability descending.
    pub fn team_analysis(&self) -> Vec<TeamAggregate> {
        let mut teams: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for p in &self.predictions {
            let entry = teams.entry(p.team.as_str()).or_default();
            entry.0 += p.win_probability;
            entry.1 += 1;
        }

        let mut rollup: Vec<TeamAggregate> = teams
            .into_iter()
            .map(|(team, (total, drivers))| TeamAggregate {
                team: team.to_string(),
                total_win_probability: total,
                drivers,
            })
            .collect();
        rollup.sort_by(|a, b| {
            b.total_win_probability
                .partial_cmp(&a.total_win_probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rollup
    }
}

/// Load the snapshot once at startup. Any failure yields the "unavailable"
/// sentinel consumed by every request handler.
pub fn load_snapshot(features_dir: &Path) -> Option<ModelData> {
    match ModelData::load(features_dir) {
        Ok(data) => {
            tracing::info!(
                predictions = data.predictions.len(),
                "model artifacts loaded"
            );
            Some(data)
        }
        Err(e) => {
            tracing::error!("failed to load model artifacts: {e:#}");
            None
        }
    }
}
