// ═══════════════════════════════════════════════════════════════════
// Pipeline Tests — sort_by, price/magnitude formatting, table views
// ═══════════════════════════════════════════════════════════════════

use coin_finder_core::models::coin::{CoinRecord, MarketEntry};
use coin_finder_core::models::settings::MagnitudeStyle;
use coin_finder_core::models::sort::{SortKey, SortState};
use coin_finder_core::services::format_service::{format_magnitude, format_price, DisplayValue};
use coin_finder_core::services::sort_service::{sort_by, sort_by_state};
use coin_finder_core::services::table_service::{TableView, COLUMNS};

fn coin(id: &str, name: &str, rank: u32, market_cap: f64) -> CoinRecord {
    CoinRecord::from(MarketEntry {
        id: id.into(),
        name: name.into(),
        symbol: id.into(),
        market_cap_rank: Some(rank),
        market_cap: Some(market_cap),
        current_price: Some(market_cap / 1_000_000.0),
        ..Default::default()
    })
}

fn sample() -> Vec<CoinRecord> {
    let mut btc = coin("btc", "Bitcoin", 1, 1.3e12);
    btc.circulating_supply = Some(19_700_000.0);
    btc.ath_date = Some("2024-03-14T07:10:36.635Z".into());
    let mut eth = coin("eth", "ethereum", 2, 4.0e11);
    eth.circulating_supply = Some(120_000_000.0);
    eth.ath_date = Some("2021-11-10T14:24:19.604Z".into());
    let mut usdt = coin("usdt", "Tether", 3, 1.1e11);
    usdt.circulating_supply = None;
    usdt.ath_date = None;
    let mut ada = coin("ada", "Cardano", 4, 1.6e10);
    ada.circulating_supply = Some(35_000_000_000.0);
    ada.ath_date = Some("not a date".into());
    vec![eth, btc, ada, usdt]
}

fn ids(records: &[CoinRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

// ── sort_by ─────────────────────────────────────────────────────────

mod sorting {
    use super::*;

    #[test]
    fn market_cap_ascending_is_non_decreasing() {
        let sorted = sort_by(&sample(), SortKey::MarketCap, true);
        assert!(sorted.windows(2).all(|w| w[0].market_cap <= w[1].market_cap));
    }

    #[test]
    fn market_cap_descending_is_non_increasing() {
        let sorted = sort_by(&sample(), SortKey::MarketCap, false);
        assert!(sorted.windows(2).all(|w| w[0].market_cap >= w[1].market_cap));
    }

    #[test]
    fn input_is_left_untouched() {
        let records = sample();
        let before = ids(&records).join(",");
        let _ = sort_by(&records, SortKey::MarketCapRank, true);
        assert_eq!(ids(&records).join(","), before);
    }

    #[test]
    fn rank_orders_both_ways() {
        let records = sample();
        assert_eq!(ids(&sort_by(&records, SortKey::MarketCapRank, true)), ["btc", "eth", "usdt", "ada"]);
        assert_eq!(ids(&sort_by(&records, SortKey::MarketCapRank, false)), ["ada", "usdt", "eth", "btc"]);
    }

    #[test]
    fn name_sorts_case_insensitively() {
        let sorted = sort_by(&sample(), SortKey::Name, true);
        assert_eq!(ids(&sorted), ["btc", "ada", "eth", "usdt"]);
        let sorted = sort_by(&sample(), SortKey::Name, false);
        assert_eq!(ids(&sorted), ["usdt", "eth", "ada", "btc"]);
    }

    #[test]
    fn missing_circulating_supply_goes_last_both_ways() {
        let asc = sort_by(&sample(), SortKey::CirculatingSupply, true);
        assert_eq!(ids(&asc), ["btc", "eth", "ada", "usdt"]);
        let desc = sort_by(&sample(), SortKey::CirculatingSupply, false);
        assert_eq!(ids(&desc), ["ada", "eth", "btc", "usdt"]);
    }

    #[test]
    fn ath_date_sorts_chronologically_with_unparseable_last() {
        let asc = sort_by(&sample(), SortKey::AthDate, true);
        assert_eq!(&ids(&asc)[..2], ["eth", "btc"]);
        let desc = sort_by(&sample(), SortKey::AthDate, false);
        assert_eq!(&ids(&desc)[..2], ["btc", "eth"]);
        // usdt (absent) and ada (garbage) keep their relative input order at the end.
        assert_eq!(&ids(&desc)[2..], ["ada", "usdt"]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let records = vec![
            coin("a", "A", 0, 5.0),
            coin("b", "B", 0, 5.0),
            coin("c", "C", 0, 5.0),
        ];
        assert_eq!(ids(&sort_by(&records, SortKey::MarketCap, true)), ["a", "b", "c"]);
        assert_eq!(ids(&sort_by(&records, SortKey::MarketCap, false)), ["a", "b", "c"]);
    }

    #[test]
    fn sort_by_state_matches_sort_by() {
        let state = SortState::new(SortKey::TotalVolume, false);
        assert_eq!(
            sort_by_state(&sample(), state),
            sort_by(&sample(), SortKey::TotalVolume, false)
        );
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        assert!(sort_by(&[], SortKey::Ath, true).is_empty());
    }
}

// ── format_price ────────────────────────────────────────────────────

mod price_format {
    use super::*;

    #[test]
    fn zero_is_numeric_zero() {
        let v = format_price(Some(0.0));
        assert_eq!(v, DisplayValue::Number(0.0));
        assert!(v.is_number());
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn missing_and_nan_are_numeric_zero() {
        assert_eq!(format_price(None), DisplayValue::Number(0.0));
        assert_eq!(format_price(Some(f64::NAN)), DisplayValue::Number(0.0));
    }

    #[test]
    fn dollars_use_currency_format() {
        assert_eq!(format_price(Some(1234.5)).to_string(), "$1,234.50");
        assert_eq!(format_price(Some(67000.0)).to_string(), "$67,000.00");
        assert_eq!(format_price(Some(1.0)).to_string(), "$1.00");
        assert_eq!(format_price(Some(1_234_567.891)).to_string(), "$1,234,567.89");
    }

    #[test]
    fn negative_dollars_put_sign_first() {
        assert_eq!(format_price(Some(-1234.5)).to_string(), "-$1,234.50");
    }

    #[test]
    fn fractions_expand_without_exponent() {
        assert_eq!(format_price(Some(0.5)).to_string(), "$0.5");
        assert_eq!(format_price(Some(0.000123)).to_string(), "$0.000123");
        assert_eq!(format_price(Some(1e-7)).to_string(), "$0.0000001");
        assert_eq!(format_price(Some(1.5e-10)).to_string(), "$0.00000000015");
    }

    #[test]
    fn huge_values_have_no_exponent() {
        let text = format_price(Some(1e22)).to_string();
        assert!(!text.contains('e'));
        assert!(text.starts_with("$10,000,000,000"));
    }
}

// ── format_magnitude ────────────────────────────────────────────────

mod magnitude_format {
    use super::*;

    #[test]
    fn below_thousand_is_raw_number() {
        let v = format_magnitude(Some(500.0), MagnitudeStyle::Legacy);
        assert_eq!(v, DisplayValue::Number(500.0));
        assert_eq!(v.as_number(), Some(500.0));
        assert_eq!(v.to_string(), "500");
        assert_eq!(format_magnitude(Some(-2500.0), MagnitudeStyle::Legacy), DisplayValue::Number(-2500.0));
    }

    #[test]
    fn thousands_get_k() {
        assert_eq!(format_magnitude(Some(1500.0), MagnitudeStyle::Legacy).to_string(), "1.5K");
        assert_eq!(format_magnitude(Some(1000.0), MagnitudeStyle::Legacy).to_string(), "1K");
    }

    #[test]
    fn millions_get_m() {
        assert_eq!(format_magnitude(Some(2_000_000.0), MagnitudeStyle::Legacy).to_string(), "2M");
        assert_eq!(format_magnitude(Some(19_700_000.0), MagnitudeStyle::Legacy).to_string(), "19.7M");
    }

    #[test]
    fn legacy_billions_keep_m_suffix() {
        assert_eq!(format_magnitude(Some(2_500_000_000.0), MagnitudeStyle::Legacy).to_string(), "2.5M");
        assert_eq!(format_magnitude(Some(1.3e12), MagnitudeStyle::Legacy).to_string(), "1300M");
    }

    #[test]
    fn billions_style_uses_b() {
        assert_eq!(format_magnitude(Some(2_500_000_000.0), MagnitudeStyle::Billions).to_string(), "2.5B");
        assert_eq!(format_magnitude(Some(2_500_000.0), MagnitudeStyle::Billions).to_string(), "2.5M");
    }

    #[test]
    fn missing_is_empty_cell() {
        let v = format_magnitude(None, MagnitudeStyle::Legacy);
        assert_eq!(v, DisplayValue::Empty);
        assert_eq!(v.to_string(), "");
    }

    #[test]
    fn display_values_serialize_untagged() {
        assert_eq!(serde_json::to_string(&DisplayValue::Number(500.0)).unwrap(), "500.0");
        assert_eq!(serde_json::to_string(&DisplayValue::Text("1.5K".into())).unwrap(), "\"1.5K\"");
        assert_eq!(serde_json::to_string(&DisplayValue::Empty).unwrap(), "null");
    }
}

// ── TableView ───────────────────────────────────────────────────────

mod table_view {
    use super::*;

    #[test]
    fn unsorted_view_keeps_cache_order_and_default_state() {
        let view = TableView::build(&sample(), None, MagnitudeStyle::Legacy);
        assert_eq!(view.state, SortState::default());
        let row_ids: Vec<&str> = view.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(row_ids, ["eth", "btc", "ada", "usdt"]);
    }

    #[test]
    fn sorted_view_applies_state() {
        let state = SortState::new(SortKey::MarketCap, false);
        let view = TableView::build(&sample(), Some(state), MagnitudeStyle::Legacy);
        assert_eq!(view.state, state);
        assert_eq!(view.rows[0].id, "btc");
        assert_eq!(view.rows[3].id, "ada");
    }

    #[test]
    fn rows_are_formatted() {
        let view = TableView::build(&sample(), Some(SortState::default()), MagnitudeStyle::Legacy);
        let btc = &view.rows[0];
        assert_eq!(btc.market_cap_rank, 1);
        assert_eq!(btc.name, "Bitcoin (BTC)");
        assert_eq!(btc.price.to_string(), "$1,300,000.00");
        assert_eq!(btc.market_cap.to_string(), "1300M");
        assert_eq!(btc.circulating_supply.to_string(), "19.7M");
        assert_eq!(btc.total_volume, DisplayValue::Number(0.0));
        assert_eq!(btc.ath, DisplayValue::Number(0.0));

        let usdt = view.rows.iter().find(|r| r.id == "usdt").unwrap();
        assert_eq!(usdt.circulating_supply, DisplayValue::Empty);
    }

    #[test]
    fn next_state_toggles_current_column() {
        let view = TableView::build(&sample(), None, MagnitudeStyle::Legacy);
        assert_eq!(
            view.next_state(SortKey::MarketCapRank),
            SortState::new(SortKey::MarketCapRank, false)
        );
        assert_eq!(view.next_state(SortKey::Ath), SortState::new(SortKey::Ath, true));
    }

    #[test]
    fn columns_match_page_headers() {
        let labels: Vec<&str> = COLUMNS.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            ["MarketCap Rank", "Name", "Price", "MarketCap", "Circulating Supply", "Total Volume", "ATH"]
        );
    }
}
