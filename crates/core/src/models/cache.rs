use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use super::coin::CoinRecord;

/// An immutable view of the cache at one point in time.
///
/// Cloning is cheap: the records are shared behind an `Arc`, so two reads
/// without a refresh in between hand out the very same allocation.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub coins: Arc<Vec<CoinRecord>>,
    /// 0 while unpopulated, incremented by every successful replacement.
    pub version: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    /// "Empty" doubles as "not yet populated".
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether both snapshots hand out the same record allocation.
    pub fn same_as(&self, other: &CacheSnapshot) -> bool {
        Arc::ptr_eq(&self.coins, &other.coins)
    }
}

/// Process-wide store of the most recently fetched coin collection.
///
/// Starts empty, is populated by the first successful refresh and replaced
/// wholesale (never merged) by every later one. The lock only guards an
/// `Arc` swap, so readers see either the previous or the new collection in
/// full.
#[derive(Debug, Default)]
pub struct CoinCache {
    slot: RwLock<CacheSnapshot>,
}

impl CoinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents. Never blocks on a refresh in progress.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }

    /// Replace the whole collection and return the new snapshot.
    pub fn replace(&self, coins: Vec<CoinRecord>) -> CacheSnapshot {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        let next = CacheSnapshot {
            coins: Arc::new(coins),
            version: slot.version + 1,
            refreshed_at: Some(Utc::now()),
        };
        *slot = next.clone();
        next
    }
}
