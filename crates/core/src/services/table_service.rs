use serde::Serialize;

use crate::models::coin::CoinRecord;
use crate::models::settings::MagnitudeStyle;
use crate::models::sort::{SortKey, SortState};
use super::format_service::{format_magnitude, format_price, DisplayValue};
use super::sort_service::sort_by_state;

/// A sortable column of the coin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub key: SortKey,
    pub label: &'static str,
}

/// Columns in display order.
pub const COLUMNS: [TableColumn; 7] = [
    TableColumn { key: SortKey::MarketCapRank, label: "MarketCap Rank" },
    TableColumn { key: SortKey::Name, label: "Name" },
    TableColumn { key: SortKey::CurrentPrice, label: "Price" },
    TableColumn { key: SortKey::MarketCap, label: "MarketCap" },
    TableColumn { key: SortKey::CirculatingSupply, label: "Circulating Supply" },
    TableColumn { key: SortKey::TotalVolume, label: "Total Volume" },
    TableColumn { key: SortKey::Ath, label: "ATH" },
];

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub market_cap_rank: u32,
    /// `"Bitcoin (BTC)"`
    pub name: String,
    pub price: DisplayValue,
    pub market_cap: DisplayValue,
    pub circulating_supply: DisplayValue,
    pub total_volume: DisplayValue,
    pub ath: DisplayValue,
}

impl TableRow {
    pub fn from_record(record: &CoinRecord, style: MagnitudeStyle) -> Self {
        Self {
            id: record.id.clone(),
            market_cap_rank: record.market_cap_rank,
            name: record.display_name(),
            price: format_price(Some(record.current_price)),
            market_cap: format_magnitude(Some(record.market_cap), style),
            circulating_supply: format_magnitude(record.circulating_supply, style),
            total_volume: format_magnitude(Some(record.total_volume), style),
            ath: format_price(Some(record.ath)),
        }
    }
}

/// Everything the page needs to draw the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub state: SortState,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Build the table for `records`.
    ///
    /// Without an explicit sort the rows keep the cache order (ranked by the
    /// upstream) under the default `marketCapRank` ascending state.
    pub fn build(records: &[CoinRecord], sort: Option<SortState>, style: MagnitudeStyle) -> Self {
        let (state, rows) = match sort {
            Some(state) => (
                state,
                sort_by_state(records, state)
                    .iter()
                    .map(|r| TableRow::from_record(r, style))
                    .collect(),
            ),
            None => (
                SortState::default(),
                records
                    .iter()
                    .map(|r| TableRow::from_record(r, style))
                    .collect(),
            ),
        };
        Self { state, rows }
    }

    /// Sort state a click on `column` would switch to.
    pub fn next_state(&self, column: SortKey) -> SortState {
        self.state.toggle(column)
    }
}
