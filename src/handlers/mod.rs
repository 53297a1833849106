pub mod projects;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::db::AppState;
use crate::extractors::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The full HTTP application with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(projects::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
