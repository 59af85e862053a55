//! Monetary parsing.
//!
//! Converts arbitrary textual or numeric price fields into fixed-point
//! decimals. Conversion failures (null, non-numeric text, overflow) yield
//! `None`, which callers must treat as "cannot price this listing", not zero.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Parse an arbitrary JSON scalar into a decimal amount.
///
/// Accepts numbers and numeric strings; a leading currency symbol, thousands
/// separators, and surrounding whitespace are tolerated. Never panics.
pub fn parse_money(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => parse_money_str(s),
        _ => None,
    }
}

/// Parse an optional scalar, treating absence as unparseable.
pub fn parse_money_opt(value: Option<&Value>) -> Option<Decimal> {
    value.and_then(parse_money)
}

fn parse_money_str(s: &str) -> Option<Decimal> {
    let cleaned = s
        .trim()
        .trim_start_matches('$')
        .replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}
