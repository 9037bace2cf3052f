use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::MarketEntry;

/// Parameters of one upstream page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub per_page: u32,
    /// 1-based page number.
    pub page: u32,
}

/// Trait abstraction for market listing sources.
///
/// The refresh service only ever talks to this trait, so tests swap in
/// in-memory fixtures and a different upstream only needs a new impl.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch one page of market entries, ordered as the upstream ranks them.
    /// An empty page means the listing is exhausted.
    async fn fetch_markets_page(&self, query: &MarketsQuery) -> Result<Vec<MarketEntry>, CoreError>;
}
