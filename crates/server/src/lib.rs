pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

use std::sync::Arc;

use tokio::task::JoinHandle;

use state::AppState;

/// Background task: refresh the coin cache on the configured interval.
pub fn spawn_refresh_loop(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        state.finder.run_periodic().await;
    })
}
