//! HTTP surface.
//!
//! One warp filter per route, all reading the same immutable snapshot. HTML
//! routes render an error view instead of a 5xx wherever possible; the two
//! JSON endpoints return 500 with an error body when the artifacts are
//! missing. No handler can panic on request data.

use std::sync::Arc;

use serde::Serialize;
use warp::http::StatusCode;
use warp::Filter;

use crate::artifacts::{ModelData, PredictionRow, PredictionSummary};
use crate::views;

/// Process-wide artifact snapshot; `None` is the "unavailable" sentinel.
pub type Snapshot = Arc<Option<ModelData>>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct PredictionsBody<'a> {
    predictions: &'a [PredictionRow],
    summary: &'a PredictionSummary,
}

fn unavailable() -> ErrorBody {
    ErrorBody {
        error: "Model data not found".to_string(),
    }
}

pub fn create_routes(
    snapshot: Snapshot,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state = warp::any().map(move || snapshot.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(state.clone())
        .map(|s: Snapshot| warp::reply::html(views::index_page(s.as_ref().as_ref())));

    let api_predictions = warp::path!("api" / "predictions")
        .and(warp::get())
        .and(state.clone())
        .map(|s: Snapshot| match s.as_ref() {
            Some(data) => warp::reply::with_status(
                warp::reply::json(&PredictionsBody {
                    predictions: &data.predictions,
                    summary: &data.summary,
                }),
                StatusCode::OK,
            ),
            None => warp::reply::with_status(
                warp::reply::json(&unavailable()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        });

    let api_feature_importance = warp::path!("api" / "feature-importance")
        .and(warp::get())
        .and(state.clone())
        .map(|s: Snapshot| match s.as_ref() {
            Some(data) => {
                warp::reply::with_status(warp::reply::json(&data.feature_importance), StatusCode::OK)
            }
            None => warp::reply::with_status(
                warp::reply::json(&unavailable()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        });

    let driver = warp::path!("driver" / String)
        .and(warp::get())
        .and(state.clone())
        .map(|code: String, s: Snapshot| {
            let html = match s.as_ref() {
                Some(data) => match data.find_driver(&code) {
                    Some(row) => views::driver_page(row, data),
                    None => views::error_page(&format!("Driver {code} not found in predictions.")),
                },
                None => views::error_page(views::DATA_NOT_FOUND),
            };
            warp::reply::html(html)
        });

    let about = warp::path("about")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::html(views::about_page()));

    index
        .or(api_predictions)
        .or(api_feature_importance)
        .or(driver)
        .or(about)
}
