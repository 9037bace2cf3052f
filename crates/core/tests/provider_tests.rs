// ═══════════════════════════════════════════════════════════════════
// Provider Tests — CoinGecko construction and payload parsing
// ═══════════════════════════════════════════════════════════════════

use coin_finder_core::errors::CoreError;
use coin_finder_core::models::coin::CoinRecord;
use coin_finder_core::providers::coingecko::{CoinGeckoProvider, DEFAULT_BASE_URL};
use coin_finder_core::providers::traits::MarketDataProvider;

const MARKETS_PAGE: &str = r#"[
  {
    "id": "bitcoin",
    "symbol": "btc",
    "name": "Bitcoin",
    "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
    "current_price": 67187.33,
    "market_cap": 1317802988326,
    "market_cap_rank": 1,
    "fully_diluted_valuation": 1411317340627,
    "total_volume": 31260929299,
    "high_24h": 68000.0,
    "low_24h": 66000.0,
    "price_change_24h": 187.33,
    "circulating_supply": 19675987,
    "total_supply": 21000000,
    "max_supply": 21000000,
    "ath": 73738,
    "ath_change_percentage": -8.88,
    "ath_date": "2024-03-14T07:10:36.635Z",
    "atl": 67.81,
    "roi": null,
    "last_updated": "2024-04-07T16:49:31.736Z"
  },
  {
    "id": "some-new-token",
    "symbol": "snt",
    "name": "Some New Token",
    "current_price": null,
    "market_cap": 0,
    "market_cap_rank": null,
    "total_volume": null,
    "circulating_supply": null,
    "total_supply": null,
    "ath": null,
    "ath_change_percentage": null,
    "ath_date": null
  }
]"#;

// ── Construction ────────────────────────────────────────────────────

#[test]
fn default_provider_targets_public_api() {
    let provider = CoinGeckoProvider::new();
    assert_eq!(provider.name(), "CoinGecko");
    assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
    assert_eq!(CoinGeckoProvider::default().base_url(), DEFAULT_BASE_URL);
}

#[test]
fn custom_base_url_drops_trailing_slash() {
    let provider = CoinGeckoProvider::with_base_url("http://localhost:8080/api/v3/");
    assert_eq!(provider.base_url(), "http://localhost:8080/api/v3");
}

#[test]
fn api_key_builder_keeps_provider_usable() {
    let provider = CoinGeckoProvider::new().api_key("demo-key").api_key("");
    assert_eq!(provider.name(), "CoinGecko");
}

// ── Payload parsing ─────────────────────────────────────────────────

#[test]
fn parses_markets_page_and_ignores_unknown_fields() {
    let entries = CoinGeckoProvider::parse_markets_page(MARKETS_PAGE).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "bitcoin");
    assert_eq!(entries[0].market_cap_rank, Some(1));
    assert_eq!(entries[0].circulating_supply, Some(19_675_987.0));
}

#[test]
fn parsed_entries_map_with_defaults() {
    let coins: Vec<CoinRecord> = CoinGeckoProvider::parse_markets_page(MARKETS_PAGE)
        .unwrap()
        .into_iter()
        .map(CoinRecord::from)
        .collect();

    let btc = &coins[0];
    assert_eq!(btc.display_name(), "Bitcoin (BTC)");
    assert_eq!(btc.ath, 73738.0);

    let new = &coins[1];
    assert_eq!(new.current_price, 0.0);
    assert_eq!(new.market_cap_rank, 0);
    assert_eq!(new.total_volume, 0.0);
    assert_eq!(new.circulating_supply, None);
    assert_eq!(new.ath_date, None);
}

#[test]
fn rows_with_null_text_fields_do_not_sink_the_page() {
    let body = r#"[
      {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":67000},
      {"id":"weird","name":null,"symbol":null,"current_price":1.5},
      {"name":"No Id","symbol":"nid"}
    ]"#;
    let entries = CoinGeckoProvider::parse_markets_page(body).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].id, "weird");
    assert_eq!(entries[1].name, "");
    assert!(!entries[2].has_id());
}

#[test]
fn empty_page_parses_to_empty_vec() {
    assert!(CoinGeckoProvider::parse_markets_page("[]").unwrap().is_empty());
}

#[test]
fn error_payload_is_a_deserialization_error() {
    let body = r#"{"status":{"error_code":429,"error_message":"You've exceeded the Rate Limit"}}"#;
    let err = CoinGeckoProvider::parse_markets_page(body).unwrap_err();
    assert!(matches!(err, CoreError::Deserialization(_)));
    assert!(!err.is_retryable());
}

#[test]
fn wrong_field_type_is_rejected() {
    let body = r#"[{"id":"x","symbol":"x","name":"X","current_price":"cheap"}]"#;
    assert!(CoinGeckoProvider::parse_markets_page(body).is_err());
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
    use coin_finder_core::providers::traits::MarketsQuery;

    // Port 9 (discard) on localhost is not expected to serve HTTP.
    let provider = CoinGeckoProvider::with_base_url("http://127.0.0.1:9/api/v3");
    let query = MarketsQuery {
        vs_currency: "usd".into(),
        per_page: 10,
        page: 1,
    };
    let err = provider.fetch_markets_page(&query).await.unwrap_err();
    assert!(matches!(err, CoreError::Network(_)));
    assert!(err.is_retryable());
}
