use serde::{Deserialize, Deserializer, Serialize};

/// One raw entry of the upstream `/coins/markets` listing.
///
/// Nothing is required at this level: a missing or null `id`, `name` or
/// `symbol` becomes an empty string, and every numeric field is optional
/// and defaulted when converted into a [`CoinRecord`]. Entries without an
/// id are dropped by the refresh (see [`MarketEntry::has_id`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub ath_date: Option<String>,
    #[serde(default)]
    pub ath_change_percentage: Option<f64>,
}

impl MarketEntry {
    /// Whether the entry can be keyed in the cache at all.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A market snapshot of a single asset, as held by the cache and rendered
/// by the table.
///
/// Serialized in camelCase so the JSON API keeps the field names the page
/// uses for its sort keys (`marketCapRank`, `currentPrice`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    /// Upstream identifier (e.g. "bitcoin"), stable across refreshes.
    pub id: String,
    pub name: String,
    /// Upstream symbol as received (usually lowercase, e.g. "btc").
    pub ticker: String,
    pub current_price: f64,
    pub market_cap_rank: u32,
    pub market_cap: f64,
    /// Passed through as-is: `None` when upstream has no figure.
    pub circulating_supply: Option<f64>,
    pub total_supply: f64,
    pub total_volume: f64,
    pub ath: f64,
    /// Passed through unmodified (RFC 3339 string from upstream).
    pub ath_date: Option<String>,
    pub ath_change_percentage: f64,
}

/// Missing, null and NaN all collapse to zero.
fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

impl From<MarketEntry> for CoinRecord {
    fn from(entry: MarketEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            ticker: entry.symbol,
            current_price: or_zero(entry.current_price),
            market_cap_rank: entry.market_cap_rank.unwrap_or(0),
            market_cap: or_zero(entry.market_cap),
            circulating_supply: entry.circulating_supply,
            total_supply: or_zero(entry.total_supply),
            total_volume: or_zero(entry.total_volume),
            ath: or_zero(entry.ath),
            ath_date: entry.ath_date,
            ath_change_percentage: or_zero(entry.ath_change_percentage),
        }
    }
}

impl CoinRecord {
    /// Ticker upper-cased for display ("btc" → "BTC").
    pub fn display_ticker(&self) -> String {
        self.ticker.to_uppercase()
    }

    /// Name cell of the table: `"Bitcoin (BTC)"`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.display_ticker())
    }
}
