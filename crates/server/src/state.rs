use std::sync::Arc;

use coin_finder_core::CoinFinder;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub finder: CoinFinder,
}

impl AppState {
    pub fn new(finder: CoinFinder) -> Arc<Self> {
        Arc::new(Self { finder })
    }
}
