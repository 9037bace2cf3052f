use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::models::settings::MagnitudeStyle;

/// A table cell: either a bare number or preformatted text.
///
/// The formatters hand back raw numbers for values they leave alone
/// (`format_price(0)` is the number `0`, not `"$0.00"`), so callers can
/// still tell both cases apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
    /// No value at all; renders as an empty cell.
    Empty,
}

impl DisplayValue {
    pub fn is_number(&self) -> bool {
        matches!(self, DisplayValue::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64's Display never switches to exponent notation.
            DisplayValue::Number(n) => write!(f, "{n}"),
            DisplayValue::Text(s) => f.write_str(s),
            DisplayValue::Empty => Ok(()),
        }
    }
}

/// Format a USD price for the table.
///
/// - missing, zero, NaN or infinite → the number `0`
/// - `|value| >= 1` → en-US currency, rounded to cents (`"$1,234.50"`)
/// - `0 < |value| < 1` → every significant digit, no exponent (`"$0.0000001"`)
pub fn format_price(value: Option<f64>) -> DisplayValue {
    let value = match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => return DisplayValue::Number(0.0),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if abs >= 1.0 {
        DisplayValue::Text(format!("{sign}{}", format_usd(abs)))
    } else {
        DisplayValue::Text(format!("{sign}${abs}"))
    }
}

/// Above this, f64 no longer resolves cents.
const MAX_CENT_PRECISION: f64 = 1e13;

/// `$` + thousands-grouped dollars + two-digit cents.
fn format_usd(abs: f64) -> String {
    let (dollars, cents) = if abs >= MAX_CENT_PRECISION {
        (abs.round() as u128, 0)
    } else {
        let total_cents = (abs * 100.0).round() as u128;
        (total_cents / 100, total_cents % 100)
    };
    format!("${}.{cents:02}", dollars.to_formatted_string(&Locale::en))
}

/// Abbreviate a large magnitude: `1500` → `"1.5K"`, `2_000_000` → `"2M"`.
///
/// One decimal, with a trailing `.0` dropped. Values below 1000 come back
/// as the raw number; `None` is an empty cell. Billions follow `style`.
pub fn format_magnitude(value: Option<f64>, style: MagnitudeStyle) -> DisplayValue {
    let Some(value) = value else {
        return DisplayValue::Empty;
    };

    let (scaled, suffix) = if value >= 1e9 {
        let suffix = match style {
            MagnitudeStyle::Legacy => "M",
            MagnitudeStyle::Billions => "B",
        };
        (value / 1e9, suffix)
    } else if value >= 1e6 {
        (value / 1e6, "M")
    } else if value >= 1e3 {
        (value / 1e3, "K")
    } else {
        return DisplayValue::Number(value);
    };

    let fixed = format!("{scaled:.1}");
    let trimmed = fixed.strip_suffix(".0").unwrap_or(&fixed);
    DisplayValue::Text(format!("{trimmed}{suffix}"))
}
