use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::errors::CoreError;
use super::coin::CoinRecord;

/// How values of a sortable column compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Numeric,
    Text,
    Date,
}

/// Every column the table can be ordered by.
///
/// The serialized names match the camelCase field names of [`CoinRecord`],
/// so `?sort=marketCap` maps straight onto [`SortKey::MarketCap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    MarketCapRank,
    Id,
    Name,
    Ticker,
    CurrentPrice,
    MarketCap,
    CirculatingSupply,
    TotalSupply,
    TotalVolume,
    Ath,
    AthDate,
    AthChangePercentage,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::MarketCapRank,
        SortKey::Id,
        SortKey::Name,
        SortKey::Ticker,
        SortKey::CurrentPrice,
        SortKey::MarketCap,
        SortKey::CirculatingSupply,
        SortKey::TotalSupply,
        SortKey::TotalVolume,
        SortKey::Ath,
        SortKey::AthDate,
        SortKey::AthChangePercentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MarketCapRank => "marketCapRank",
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Ticker => "ticker",
            SortKey::CurrentPrice => "currentPrice",
            SortKey::MarketCap => "marketCap",
            SortKey::CirculatingSupply => "circulatingSupply",
            SortKey::TotalSupply => "totalSupply",
            SortKey::TotalVolume => "totalVolume",
            SortKey::Ath => "ath",
            SortKey::AthDate => "athDate",
            SortKey::AthChangePercentage => "athChangePercentage",
        }
    }

    pub fn kind(&self) -> SortKind {
        match self {
            SortKey::Id | SortKey::Name | SortKey::Ticker => SortKind::Text,
            SortKey::AthDate => SortKind::Date,
            _ => SortKind::Numeric,
        }
    }

    fn numeric_value(&self, record: &CoinRecord) -> Option<f64> {
        match self {
            SortKey::MarketCapRank => Some(f64::from(record.market_cap_rank)),
            SortKey::CurrentPrice => Some(record.current_price),
            SortKey::MarketCap => Some(record.market_cap),
            SortKey::CirculatingSupply => record.circulating_supply,
            SortKey::TotalSupply => Some(record.total_supply),
            SortKey::TotalVolume => Some(record.total_volume),
            SortKey::Ath => Some(record.ath),
            SortKey::AthChangePercentage => Some(record.ath_change_percentage),
            _ => None,
        }
    }

    fn text_value<'a>(&self, record: &'a CoinRecord) -> &'a str {
        match self {
            SortKey::Id => &record.id,
            SortKey::Ticker => &record.ticker,
            _ => &record.name,
        }
    }

    /// Compare two records on this key in ascending order.
    ///
    /// Only compares present values; see [`SortKey::is_missing`] for how
    /// absent values are placed.
    fn compare_present(&self, a: &CoinRecord, b: &CoinRecord) -> Ordering {
        match self.kind() {
            SortKind::Numeric => match (self.numeric_value(a), self.numeric_value(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
            SortKind::Text => {
                let (x, y) = (self.text_value(a), self.text_value(b));
                x.to_lowercase()
                    .cmp(&y.to_lowercase())
                    .then_with(|| x.cmp(y))
            }
            SortKind::Date => match (parse_date(a), parse_date(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }

    /// Whether the record has no value for this key.
    pub fn is_missing(&self, record: &CoinRecord) -> bool {
        match self.kind() {
            SortKind::Numeric => self.numeric_value(record).is_none(),
            SortKind::Text => false,
            SortKind::Date => parse_date(record).is_none(),
        }
    }

    /// Full comparator for a direction: present values ordered by
    /// `ascending`, missing values always last.
    pub fn compare(&self, a: &CoinRecord, b: &CoinRecord, ascending: bool) -> Ordering {
        match (self.is_missing(a), self.is_missing(b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = self.compare_present(a, b);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }
}

fn parse_date(record: &CoinRecord) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    record
        .ath_date
        .as_deref()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSortKey(s.to_string()))
    }
}

/// The column the table is currently ordered by, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::MarketCapRank,
            ascending: true,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self { key, ascending }
    }

    /// State after a click on the header of `key`.
    ///
    /// Clicking the column already sorted ascending flips it to descending;
    /// any other click (a different column, or the same one while
    /// descending) sorts ascending.
    pub fn toggle(&self, key: SortKey) -> SortState {
        SortState {
            key,
            ascending: !(self.key == key && self.ascending),
        }
    }
}
