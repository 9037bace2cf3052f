pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::Arc;

use models::{
    cache::CacheSnapshot,
    coin::CoinRecord,
    settings::RefreshSettings,
    sort::SortState,
};
use providers::coingecko::CoinGeckoProvider;
use providers::traits::MarketDataProvider;
use services::{
    refresh_service::RefreshService,
    sort_service::sort_by_state,
    table_service::TableView,
};

use errors::CoreError;

/// Main entry point for the Coin Finder core library.
/// Owns the refresh cache and serves sorted, formatted views of it.
///
/// Cheap to clone: clones share one cache and one refresh guard.
#[must_use]
#[derive(Clone)]
pub struct CoinFinder {
    refresh_service: Arc<RefreshService>,
}

impl std::fmt::Debug for CoinFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.refresh_service.snapshot();
        f.debug_struct("CoinFinder")
            .field("provider", &self.refresh_service.provider_name())
            .field("settings", self.refresh_service.settings())
            .field("cached_coins", &snapshot.len())
            .field("version", &snapshot.version)
            .finish()
    }
}

impl CoinFinder {
    /// Create a finder backed by any market data provider.
    pub fn new(
        provider: Box<dyn MarketDataProvider>,
        settings: RefreshSettings,
    ) -> Result<Self, CoreError> {
        let refresh_service = RefreshService::new(provider, settings)?;
        Ok(Self {
            refresh_service: Arc::new(refresh_service),
        })
    }

    /// Create a finder backed by the public CoinGecko API.
    pub fn with_coingecko(
        settings: RefreshSettings,
        base_url: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Self, CoreError> {
        let mut provider = match base_url {
            Some(url) => CoinGeckoProvider::with_base_url(url),
            None => CoinGeckoProvider::new(),
        };
        if let Some(key) = api_key {
            provider = provider.api_key(key);
        }
        Self::new(Box::new(provider), settings)
    }

    pub fn settings(&self) -> &RefreshSettings {
        self.refresh_service.settings()
    }

    pub fn refresh_service(&self) -> Arc<RefreshService> {
        Arc::clone(&self.refresh_service)
    }

    // ── Cache ───────────────────────────────────────────────────────

    /// Current cache contents without fetching (may be empty).
    pub fn snapshot(&self) -> CacheSnapshot {
        self.refresh_service.snapshot()
    }

    /// Cached coins, fetched first if nothing is cached yet.
    pub async fn coins(&self) -> Result<CacheSnapshot, CoreError> {
        self.refresh_service.get_or_populate().await
    }

    /// Force a refetch and replace the cache.
    pub async fn refresh(&self) -> Result<CacheSnapshot, CoreError> {
        self.refresh_service.refresh().await
    }

    /// Refresh on the configured interval until the future is dropped.
    pub async fn run_periodic(&self) {
        self.refresh_service.run_periodic().await
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Cached coins ordered by `state`.
    pub async fn sorted_coins(&self, state: SortState) -> Result<Vec<CoinRecord>, CoreError> {
        let snapshot = self.coins().await?;
        Ok(sort_by_state(&snapshot.coins, state))
    }

    /// The formatted table, in cache order when `sort` is `None`, together
    /// with the snapshot it was built from.
    pub async fn table(
        &self,
        sort: Option<SortState>,
    ) -> Result<(CacheSnapshot, TableView), CoreError> {
        let snapshot = self.coins().await?;
        let view = TableView::build(&snapshot.coins, sort, self.settings().magnitude_style);
        Ok((snapshot, view))
    }
}
