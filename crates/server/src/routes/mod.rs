pub mod coins;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the router: page, JSON API and health check.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(coins::routes())
        .route("/health", axum::routing::get(health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
