//! Pack-count inference.
//!
//! Derives an integer multiplier (>= 1) for a listing so pack prices can be
//! reduced to per-unit prices. Resolution order, first match wins:
//!
//! 1. Structured dimension fields (`number_of_items`,
//!    `number_of_items_string`, `count`, `items`): strip non-digits, parse.
//! 2. Free-text "pack \[of\] N" over size, title, name, in that field order.
//! 3. Free-text "N count|ct|pieces|pcs" over the same fields in order.
//! 4. Default 1.
//!
//! Malformed matches fall through to the next rule rather than failing.

use priceguard_core::{Offer, Variant};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PACK_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pack\s*(?:of)?\s*(\d+)").unwrap());
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:count|ct|pieces|pcs)\b").unwrap());

/// Dimension keys checked for a structured pack count, in priority order.
const DIMENSION_KEYS: [&str; 4] = ["number_of_items", "number_of_items_string", "count", "items"];

/// A listing-like record the inferencer can read pack hints from.
pub trait PackSource {
    /// Structured dimension field by key.
    fn dimension(&self, key: &str) -> Option<&Value>;
    /// Free-text size string.
    fn size_text(&self) -> Option<&str>;
    /// Free-text title.
    fn title_text(&self) -> Option<&str>;
    /// Free-text variant/seller name.
    fn name_text(&self) -> Option<&str>;
}

impl PackSource for Variant {
    fn dimension(&self, key: &str) -> Option<&Value> {
        self.variant_dimensions.get(key)
    }
    fn size_text(&self) -> Option<&str> {
        self.size.as_deref()
    }
    fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn name_text(&self) -> Option<&str> {
        self.variant_name.as_deref()
    }
}

impl PackSource for Offer {
    fn dimension(&self, key: &str) -> Option<&Value> {
        self.variant_dimensions.get(key)
    }
    fn size_text(&self) -> Option<&str> {
        self.size.as_deref()
    }
    fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn name_text(&self) -> Option<&str> {
        self.variant_name.as_deref()
    }
}

/// Infer the pack count for a listing. Always >= 1.
pub fn infer_pack_count<S: PackSource>(source: &S) -> u32 {
    for key in DIMENSION_KEYS {
        if let Some(count) = source.dimension(key).and_then(structured_count) {
            return count;
        }
    }

    let texts = [source.size_text(), source.title_text(), source.name_text()];

    for text in texts.into_iter().flatten() {
        if let Some(count) = capture_count(&PACK_OF_RE, text) {
            return count;
        }
    }
    for text in texts.into_iter().flatten() {
        if let Some(count) = capture_count(&COUNT_RE, text) {
            return count;
        }
    }

    1
}

/// Parse a structured dimension value: render, strip non-digits, parse.
fn structured_count(value: &Value) -> Option<u32> {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let digits: String = rendered.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().ok().filter(|&n| n >= 1)
}

fn capture_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n >= 1)
}
