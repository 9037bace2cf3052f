use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::coin::MarketEntry;
use super::traits::{MarketDataProvider, MarketsQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const PROVIDER_NAME: &str = "CoinGecko";

/// CoinGecko API provider for the ranked market listing.
///
/// - **Endpoint**: `/coins/markets?vs_currency=..&per_page=..&page=..&sparkline=false`
/// - **Auth**: none required; an optional demo key is sent as `x-cg-demo-api-key`.
/// - **Rate limits**: HTTP 429 is surfaced as [`CoreError::RateLimited`] with the
///   `Retry-After` seconds when the upstream provides them.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at another deployment (proxy, mirror, pro API).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse a `/coins/markets` response body.
    pub fn parse_markets_page(body: &str) -> Result<Vec<MarketEntry>, CoreError> {
        serde_json::from_str(body).map_err(|e| {
            CoreError::Deserialization(format!("{PROVIDER_NAME} markets page: {e}"))
        })
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_markets_page(&self, query: &MarketsQuery) -> Result<Vec<MarketEntry>, CoreError> {
        let url = format!("{}/coins/markets", self.base_url);
        let per_page = query.per_page.to_string();
        let page = query.page.to_string();

        let mut request = self.client.get(&url).query(&[
            ("vs_currency", query.vs_currency.as_str()),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
            ("sparkline", "false"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let resp = request.send().await?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CoreError::RateLimited {
                provider: PROVIDER_NAME.into(),
                retry_after_secs: retry_after_secs(resp.headers()),
            });
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} for markets page {}", query.page),
            });
        }

        let body = resp.text().await?;
        Self::parse_markets_page(&body)
    }
}
