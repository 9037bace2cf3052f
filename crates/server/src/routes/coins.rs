use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use coin_finder_core::models::coin::CoinRecord;
use coin_finder_core::models::sort::{SortKey, SortState};

use crate::error::ServerError;
use crate::state::AppState;
use crate::templates;

// ── Query params ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    asc: Option<bool>,
}

impl SortQuery {
    /// `None` when no column was requested (keep cache order).
    ///
    /// Malformed query strings (`?asc=maybe`) become a JSON 400 like any
    /// other bad request.
    fn parse(
        query: Result<Query<SortQuery>, QueryRejection>,
    ) -> Result<Option<SortState>, ServerError> {
        let Query(q) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;
        q.state()
    }

    fn state(&self) -> Result<Option<SortState>, ServerError> {
        match &self.sort {
            None => Ok(None),
            Some(raw) => {
                let key: SortKey = raw.parse()?;
                Ok(Some(SortState::new(key, self.asc.unwrap_or(true))))
            }
        }
    }
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(coin_page))
        .route("/api/coins", get(api_coins))
        .route("/api/status", get(api_status))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn coin_page(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Html<String>, ServerError> {
    let sort = SortQuery::parse(query)?;
    let (snapshot, view) = state.finder.table(sort).await?;
    Ok(Html(templates::coin_page(&view, snapshot.refreshed_at)))
}

async fn api_coins(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<Vec<CoinRecord>>, ServerError> {
    let coins = match SortQuery::parse(query)? {
        Some(s) => state.finder.sorted_coins(s).await?,
        None => state.finder.coins().await?.coins.to_vec(),
    };
    Ok(Json(coins))
}

/// Cache status; never triggers a fetch.
async fn api_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.finder.snapshot();
    let settings = state.finder.settings();
    Json(json!({
        "count": snapshot.len(),
        "version": snapshot.version,
        "refreshedAt": snapshot.refreshed_at,
        "targetCount": settings.target_count,
        "truncate": settings.truncate,
        "refreshIntervalSecs": settings.refresh_interval_secs,
    }))
}
