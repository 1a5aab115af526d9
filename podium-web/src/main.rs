//! Dashboard server entry point.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn, Level};

use podium_web::artifacts::load_snapshot;
use podium_web::routes::{create_routes, Snapshot};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let features_dir = std::env::var("PODIUM_FEATURES_DIR")
        .unwrap_or_else(|_| "data/features".to_string());
    info!("Loading model artifacts from {features_dir}");

    let snapshot: Snapshot = Arc::new(load_snapshot(Path::new(&features_dir)));
    if snapshot.is_none() {
        warn!("starting in 'data not found' mode; data routes will render the error state");
    }

    let routes = create_routes(snapshot);

    let port: u16 = std::env::var("PODIUM_WEB_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    info!("Serving dashboard on port {port}");

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}
