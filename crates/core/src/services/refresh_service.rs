use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::errors::CoreError;
use crate::models::cache::{CacheSnapshot, CoinCache};
use crate::models::coin::{CoinRecord, MarketEntry};
use crate::models::settings::RefreshSettings;
use crate::providers::traits::{MarketDataProvider, MarketsQuery};

/// Keeps the coin cache filled from a market data provider.
///
/// Refresh strategy:
/// - **Lazy**: `get_or_populate()` fetches only while the cache is empty.
/// - **Periodic**: `run_periodic()` refreshes unconditionally every
///   `refresh_interval`, first tick one interval after start.
/// - **Single flight**: refreshes never overlap. A lazy populate queued
///   behind a running refresh reuses its result.
/// - **All or nothing**: the cache is only replaced after every page was
///   fetched; a failure leaves the previous contents in place.
pub struct RefreshService {
    provider: Box<dyn MarketDataProvider>,
    settings: RefreshSettings,
    cache: Arc<CoinCache>,
    refresh_lock: Mutex<()>,
}

impl RefreshService {
    pub fn new(
        provider: Box<dyn MarketDataProvider>,
        settings: RefreshSettings,
    ) -> Result<Self, CoreError> {
        Self::with_cache(provider, settings, Arc::new(CoinCache::new()))
    }

    /// Build around an existing cache (shared with other readers).
    pub fn with_cache(
        provider: Box<dyn MarketDataProvider>,
        settings: RefreshSettings,
        cache: Arc<CoinCache>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            provider,
            settings,
            cache,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<CoinCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current cache contents, without triggering any fetch.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    /// Return the cached coins, fetching them first if the cache is empty.
    pub async fn get_or_populate(&self) -> Result<CacheSnapshot, CoreError> {
        let current = self.cache.snapshot();
        if !current.is_empty() {
            debug!(version = current.version, "Coin cache hit");
            return Ok(current);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another refresh may have filled the cache while we waited.
        let current = self.cache.snapshot();
        if !current.is_empty() {
            debug!(version = current.version, "Coin cache populated by concurrent refresh");
            return Ok(current);
        }

        self.refresh_locked().await
    }

    /// Fetch a fresh collection and replace the cache with it.
    pub async fn refresh(&self) -> Result<CacheSnapshot, CoreError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh every `refresh_interval` for as long as the future is polled.
    ///
    /// Failures are logged and the loop keeps going; the cache keeps the
    /// last good collection.
    pub async fn run_periodic(&self) {
        let period = self.settings.refresh_interval();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = period.as_secs(),
            "Periodic coin refresh scheduled"
        );

        loop {
            interval.tick().await;
            // Already logged inside refresh.
            let _ = self.refresh().await;
        }
    }

    async fn refresh_locked(&self) -> Result<CacheSnapshot, CoreError> {
        let result = match self.settings.deadline() {
            Some(deadline) => match time::timeout(deadline, self.collect()).await {
                Ok(result) => result,
                Err(_) => Err(CoreError::RefreshTimedOut(deadline.as_secs())),
            },
            None => self.collect().await,
        };

        match result {
            Ok(coins) => {
                let snapshot = self.cache.replace(coins);
                info!(
                    count = snapshot.len(),
                    version = snapshot.version,
                    "Coin cache refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!(
                    error = %e,
                    version = self.cache.snapshot().version,
                    "Coin refresh failed, keeping previous cache"
                );
                Err(e)
            }
        }
    }

    /// Page through the provider until `target_count` unique coins are in.
    async fn collect(&self) -> Result<Vec<CoinRecord>, CoreError> {
        let target = self.settings.target_count;
        let mut coins: Vec<CoinRecord> = Vec::with_capacity(target);
        let mut seen: HashSet<String> = HashSet::with_capacity(target);
        let mut page: u32 = 1;

        while coins.len() < target {
            if page > self.settings.max_pages {
                warn!(
                    max_pages = self.settings.max_pages,
                    collected = coins.len(),
                    target,
                    "Page limit reached before target count"
                );
                break;
            }

            info!(page, "Fetching coins page");
            let entries = self.fetch_page(page).await?;
            if entries.is_empty() {
                warn!(
                    page,
                    collected = coins.len(),
                    target,
                    "Upstream listing exhausted before target count"
                );
                break;
            }

            let mut unkeyed = 0usize;
            for entry in entries {
                if !entry.has_id() {
                    unkeyed += 1;
                    continue;
                }
                // Rankings shift between page requests; keep the first copy.
                if seen.insert(entry.id.clone()) {
                    coins.push(CoinRecord::from(entry));
                }
            }
            if unkeyed > 0 {
                warn!(page, skipped = unkeyed, "Skipped market entries without an id");
            }
            page += 1;
        }

        if coins.is_empty() {
            return Err(CoreError::EmptyListing {
                provider: self.provider.name().to_string(),
            });
        }

        if self.settings.truncate {
            coins.truncate(target);
        }

        Ok(coins)
    }

    /// Fetch one page, retrying transient failures with backoff.
    async fn fetch_page(&self, page: u32) -> Result<Vec<MarketEntry>, CoreError> {
        let query = MarketsQuery {
            vs_currency: self.settings.vs_currency.clone(),
            per_page: self.settings.per_page,
            page,
        };
        let policy = &self.settings.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.provider.fetch_markets_page(&query).await {
                Ok(entries) => return Ok(entries),
                Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                    let retry_after = match &e {
                        CoreError::RateLimited {
                            retry_after_secs, ..
                        } => *retry_after_secs,
                        _ => None,
                    };
                    let delay = policy.delay_after(attempt, retry_after);
                    warn!(
                        page,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Coins page fetch failed, retrying"
                    );
                    time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(CoreError::UpstreamFetch {
                        provider: self.provider.name().to_string(),
                        page,
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
            }
        }
    }
}
