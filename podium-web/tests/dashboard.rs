//! Route behavior with and without the artifact snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use podium_web::artifacts::{
    FeatureImportanceRow, LabelEncoders, ModelArtifact, ModelData, PredictionRow,
    PredictionSummary, ScalerArtifact,
};
use podium_web::routes::{create_routes, Snapshot};

fn prediction(driver: &str, team: &str, win_probability: f64, position: f64) -> PredictionRow {
    PredictionRow {
        driver: driver.to_string(),
        team: team.to_string(),
        win_probability,
        predicted_position: position,
    }
}

fn sample_data() -> ModelData {
    ModelData {
        model: ModelArtifact {
            model_type: "random_forest".into(),
            feature_names: vec!["grid".into(), "points".into()],
            params: BTreeMap::new(),
        },
        scaler: ScalerArtifact {
            feature_names: vec!["grid".into(), "points".into()],
            means: vec![8.0, 100.0],
            scales: vec![4.0, 60.0],
        },
        encoders: LabelEncoders(BTreeMap::from([(
            "Team".to_string(),
            vec!["Ferrari".to_string(), "Red Bull Racing".to_string()],
        )])),
        predictions: vec![
            prediction("VER", "Red Bull Racing", 0.42, 1.3),
            prediction("LEC", "Ferrari", 0.17, 2.8),
            prediction("SAI", "Ferrari", 0.11, 4.0),
        ],
        feature_importance: vec![
            FeatureImportanceRow {
                feature: "grid".into(),
                importance: 0.31,
            },
            FeatureImportanceRow {
                feature: "points".into(),
                importance: 0.24,
            },
        ],
        summary: PredictionSummary {
            race: "Singapore".into(),
            year: 2025,
            predicted_winner: "VER".into(),
            win_probability: 0.42,
            model: "random_forest".into(),
            generated_at: "2025-06-01T12:00:00Z".into(),
        },
    }
}

fn loaded() -> Snapshot {
    Arc::new(Some(sample_data()))
}

fn unavailable() -> Snapshot {
    Arc::new(None)
}

#[tokio::test]
async fn index_renders_top_predictions_and_team_rollup() {
    let routes = create_routes(loaded());
    let resp = warp::test::request().path("/").reply(&routes).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8_lossy(resp.body());
    assert!(body.contains("VER"));
    assert!(body.contains("Red Bull Racing"));
    // Ferrari aggregates both drivers.
    assert!(body.contains("28.0%"));
}

#[tokio::test]
async fn index_without_artifacts_renders_error_view_not_5xx() {
    let routes = create_routes(unavailable());
    let resp = warp::test::request().path("/").reply(&routes).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8_lossy(resp.body());
    assert!(body.contains("Model data not found"));
}

#[tokio::test]
async fn predictions_endpoint_returns_full_table_and_summary() {
    let routes = create_routes(loaded());
    let resp = warp::test::request()
        .path("/api/predictions")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["predictions"].as_array().unwrap().len(), 3);
    assert_eq!(body["summary"]["Predicted_Winner"], "VER");
}

#[tokio::test]
async fn predictions_endpoint_reports_500_when_unavailable() {
    let routes = create_routes(unavailable());
    let resp = warp::test::request()
        .path("/api/predictions")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["error"], "Model data not found");
}

#[tokio::test]
async fn feature_importance_endpoint_mirrors_the_table() {
    let routes = create_routes(loaded());
    let resp = warp::test::request()
        .path("/api/feature-importance")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["Feature"], "grid");

    let routes = create_routes(unavailable());
    let resp = warp::test::request()
        .path("/api/feature-importance")
        .reply(&routes)
        .await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn driver_lookup_is_case_insensitive() {
    let routes = create_routes(loaded());

    for path in ["/driver/ver", "/driver/VER", "/driver/Ver"] {
        let resp = warp::test::request().path(path).reply(&routes).await;
        assert_eq!(resp.status(), 200, "{path}");
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("<h1>VER</h1>"), "{path}");
    }
}

#[tokio::test]
async fn unknown_driver_renders_error_view() {
    let routes = create_routes(loaded());
    let resp = warp::test::request()
        .path("/driver/XXX")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8_lossy(resp.body());
    assert!(body.contains("not found in predictions"));
}

#[tokio::test]
async fn about_serves_even_without_artifacts() {
    let routes = create_routes(unavailable());
    let resp = warp::test::request().path("/about").reply(&routes).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8_lossy(resp.body());
    assert!(body.contains("About"));
}

#[tokio::test]
async fn unknown_route_is_a_plain_404() {
    let routes = create_routes(loaded());
    let resp = warp::test::request().path("/nope").reply(&routes).await;
    assert_eq!(resp.status(), 404);
}
