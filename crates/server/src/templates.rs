//! HTML templates for the coin table page.
//!
//! Each function returns a `String` that handlers wrap in `axum::response::Html`.

use chrono::{DateTime, Utc};

use coin_finder_core::models::sort::SortKey;
use coin_finder_core::services::table_service::{TableView, COLUMNS};

const PAGE_TITLE: &str = "Cryptocoin finder";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link a header points to: the sort state one click on it produces.
pub fn sort_href(view: &TableView, column: SortKey) -> String {
    let next = view.next_state(column);
    format!("/?sort={}&asc={}", next.key, next.ascending)
}

/// Full page: table, refresh time and attribution footer.
pub fn coin_page(view: &TableView, refreshed_at: Option<DateTime<Utc>>) -> String {
    let updated = refreshed_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="/favicon.ico">
    <style>
        {styles}
    </style>
</head>
<body>
    <main class="content">
        <p class="updated">Updated {updated} &middot; {count} coins</p>
        {table}
    </main>

    <footer class="footer">
        <a href="https://www.coingecko.com/en" target="_blank" rel="noopener noreferrer">Powered by CoinGecko</a>
    </footer>
</body>
</html>"#,
        title = PAGE_TITLE,
        styles = styles(),
        updated = updated,
        count = view.rows.len(),
        table = coin_table(view),
    )
}

/// The table itself: one header link per sortable column, one row per coin.
pub fn coin_table(view: &TableView) -> String {
    let mut header = String::new();
    for column in COLUMNS.iter() {
        let marker = if view.state.key == column.key {
            if view.state.ascending {
                " &#9650;"
            } else {
                " &#9660;"
            }
        } else {
            ""
        };
        header.push_str(&format!(
            r#"<th><a href="{href}">{label}{marker}</a></th>"#,
            href = escape_html(&sort_href(view, column.key)),
            label = column.label,
        ));
    }

    let mut body = String::new();
    for row in &view.rows {
        body.push_str(&format!(
            r#"<tr id="{id}"><td>{rank}</td><td>{name}</td><td>{price}</td><td>{market_cap}</td><td>{supply}</td><td>{volume}</td><td>{ath}</td></tr>"#,
            id = escape_html(&row.id),
            rank = row.market_cap_rank,
            name = escape_html(&row.name),
            price = escape_html(&row.price.to_string()),
            market_cap = escape_html(&row.market_cap.to_string()),
            supply = escape_html(&row.circulating_supply.to_string()),
            volume = escape_html(&row.total_volume.to_string()),
            ath = escape_html(&row.ath.to_string()),
        ));
        body.push('\n');
    }

    format!(
        r#"<table class="coins">
<thead><tr>{header}</tr></thead>
<tbody>
{body}</tbody>
</table>"#
    )
}

fn styles() -> &'static str {
    r#"
        body { font-family: system-ui, sans-serif; margin: 0; padding: 0.5rem 5rem; }
        .content { display: flex; flex-direction: column; align-items: center; min-height: 100vh; }
        .updated { color: #6b7280; }
        table.coins { width: 100%; border-collapse: collapse; text-align: center; }
        table.coins th a { color: inherit; text-decoration: none; font-size: 1.25rem; font-weight: bold; }
        table.coins th a:hover { color: #6b7280; }
        table.coins td { padding: 0.5rem; border-top: 1px solid #e5e7eb; }
        .footer { display: flex; justify-content: center; align-items: center; height: 3rem; border-top: 1px solid #e5e7eb; margin-top: 2rem; }
    "#
}
