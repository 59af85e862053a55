//! Core data types for the priceguard system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One catalog entry: a product family with its SKUs and competing offers.
///
/// Read-only input. Field names follow the snapshot format; unknown fields
/// are ignored and missing lists deserialize empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFamily {
    /// Display name of the family.
    pub product_name: Option<String>,
    /// Category label. Absent categories fold into "Unknown".
    pub category: Option<String>,
    /// Ordered list of SKUs (variants).
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Primary ("authorized") offer list.
    #[serde(default)]
    pub main_seller: Vec<Offer>,
    /// Marketplace offer list.
    #[serde(default)]
    pub seller_market: Vec<Offer>,
}

/// A sellable variant (SKU) identified by ASIN.
///
/// A variant without an ASIN cannot be price-compared and is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub asin: Option<String>,
    pub title: Option<String>,
    pub variant_name: Option<String>,
    /// Listed price, arbitrary scalar (number or text).
    pub price: Option<Value>,
    /// Declared per-unit price, arbitrary scalar.
    pub unit_price: Option<Value>,
    /// Free-text size string ("Pack of 12, 1.4oz").
    pub size: Option<String>,
    /// Structured dimension fields (counts, weights) keyed by name.
    #[serde(default)]
    pub variant_dimensions: BTreeMap<String, Value>,
}

impl Variant {
    /// The ASIN, if present and non-empty.
    pub fn asin(&self) -> Option<&str> {
        self.asin.as_deref().filter(|a| !a.is_empty())
    }

    /// Display title: title, else variant name, else the ASIN itself.
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.variant_name.as_deref().filter(|t| !t.is_empty()))
            .or_else(|| self.asin())
    }
}

/// A single seller's listing for one SKU.
///
/// Shared shape for both the primary and the marketplace offer lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub seller_name: Option<String>,
    pub seller_id: Option<String>,
    pub seller_sku: Option<String>,
    /// Foreign key to the variant.
    pub asin: Option<String>,
    /// Listed (pack) price, arbitrary scalar.
    pub price: Option<Value>,
    /// Declared per-unit price, arbitrary scalar.
    pub unit_price: Option<Value>,
    pub size: Option<String>,
    pub title: Option<String>,
    pub variant_name: Option<String>,
    #[serde(default)]
    pub variant_dimensions: BTreeMap<String, Value>,
    /// Upstream price classification label ("Fair Price" .. "Price Gouging").
    pub price_flag: Option<String>,
    /// Percentage of positive seller ratings, arbitrary scalar.
    pub positive_rating_percent: Option<Value>,
}

impl Offer {
    /// Trimmed seller display name, if non-blank.
    pub fn seller_display_name(&self) -> Option<&str> {
        self.seller_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Parsed upstream price flag, if the label is recognized.
    pub fn upstream_flag(&self) -> Option<PriceFlag> {
        self.price_flag.as_deref().and_then(PriceFlag::from_label)
    }

    /// Positive-rating percentage as a number, if the field carries one.
    pub fn rating_value(&self) -> Option<f64> {
        match self.positive_rating_percent.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Upstream price classification attached to an offer by an external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceFlag {
    #[serde(rename = "Fair Price")]
    FairPrice,
    #[serde(rename = "Slightly High")]
    SlightlyHigh,
    #[serde(rename = "High Price")]
    HighPrice,
    #[serde(rename = "Price Gouging")]
    PriceGouging,
}

impl PriceFlag {
    /// Parse a free-text label, tolerating case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "fair price" => Some(PriceFlag::FairPrice),
            "slightly high" => Some(PriceFlag::SlightlyHigh),
            "high price" => Some(PriceFlag::HighPrice),
            "price gouging" => Some(PriceFlag::PriceGouging),
            _ => None,
        }
    }

    /// Canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            PriceFlag::FairPrice => "Fair Price",
            PriceFlag::SlightlyHigh => "Slightly High",
            PriceFlag::HighPrice => "High Price",
            PriceFlag::PriceGouging => "Price Gouging",
        }
    }
}

/// Which source the baseline unit price was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Primary offer whose seller name contains "amazon", unit price.
    MainSellerAmazon,
    /// Same offer, raw listed price (no unit price could be derived).
    MainSellerAmazonRaw,
    /// First primary offer in list order, unit price.
    MainSellerFirst,
    /// Same offer, raw listed price.
    MainSellerFirstRaw,
    /// The variant's own computed unit price.
    VariantUnitPrice,
    /// No baseline could be established.
    None,
}

/// Whether a canonical offer came from the primary or the marketplace list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferOrigin {
    Primary,
    Marketplace,
}

/// One seller's priced listing for one SKU after dedup and classification.
///
/// Owned solely by the engine; input records are never mutated.
#[derive(Debug, Clone)]
pub struct CanonicalOffer {
    pub asin: String,
    /// Trimmed display name of the seller.
    pub seller_name: String,
    /// Identity key: lower-cased name plus seller id/SKU when present.
    pub seller_key: String,
    pub origin: OfferOrigin,
    /// Seller per-unit price, 4 fractional digits.
    pub unit_price: Option<Decimal>,
    /// Listed (pack) price as parsed.
    pub listed_price: Option<Decimal>,
    /// Reference unit price the offer is compared against.
    pub baseline_unit_price: Option<Decimal>,
    pub baseline_source: BaselineSource,
    /// unit_price - baseline_unit_price, when both are defined.
    pub delta_abs: Option<Decimal>,
    /// delta_abs / baseline * 100, when the baseline is defined and non-zero.
    pub delta_pct: Option<Decimal>,
    /// Final gouging decision, upstream override applied.
    pub is_gouging: bool,
    pub upstream_flag: Option<PriceFlag>,
    /// Positive-rating percentage, when the offer carries one.
    pub positive_rating_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_flag_labels() {
        assert_eq!(PriceFlag::from_label("  Fair Price "), Some(PriceFlag::FairPrice));
        assert_eq!(PriceFlag::from_label("price gouging"), Some(PriceFlag::PriceGouging));
        assert_eq!(PriceFlag::from_label("SLIGHTLY HIGH"), Some(PriceFlag::SlightlyHigh));
        assert_eq!(PriceFlag::from_label("bargain"), None);
        assert_eq!(PriceFlag::HighPrice.label(), "High Price");
    }

    #[test]
    fn test_baseline_source_serializes_snake_case() {
        let s = serde_json::to_string(&BaselineSource::MainSellerAmazonRaw).unwrap();
        assert_eq!(s, "\"main_seller_amazon_raw\"");
        let s = serde_json::to_string(&BaselineSource::None).unwrap();
        assert_eq!(s, "\"none\"");
    }

    #[test]
    fn test_variant_display_title_fallbacks() {
        let v = Variant {
            asin: Some("B000TEST".into()),
            title: None,
            variant_name: Some("Dark Chocolate".into()),
            price: None,
            unit_price: None,
            size: None,
            variant_dimensions: BTreeMap::new(),
        };
        assert_eq!(v.display_title(), Some("Dark Chocolate"));
    }

    #[test]
    fn test_rating_value_accepts_numbers_and_strings() {
        let mut offer = Offer {
            seller_name: Some("Shop".into()),
            seller_id: None,
            seller_sku: None,
            asin: None,
            price: None,
            unit_price: None,
            size: None,
            title: None,
            variant_name: None,
            variant_dimensions: BTreeMap::new(),
            price_flag: None,
            positive_rating_percent: Some(serde_json::json!(87)),
        };
        assert_eq!(offer.rating_value(), Some(87.0));
        offer.positive_rating_percent = Some(serde_json::json!(" 41.5 "));
        assert_eq!(offer.rating_value(), Some(41.5));
        offer.positive_rating_percent = Some(serde_json::json!("n/a"));
        assert_eq!(offer.rating_value(), None);
        offer.positive_rating_percent = None;
        assert_eq!(offer.rating_value(), None);
    }

    #[test]
    fn test_family_deserializes_with_missing_lists() {
        let fam: ProductFamily =
            serde_json::from_str(r#"{"product_name": "Bars", "category": "Snacks"}"#).unwrap();
        assert!(fam.variants.is_empty());
        assert!(fam.main_seller.is_empty());
        assert!(fam.seller_market.is_empty());
    }
}
