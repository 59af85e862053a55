//! Baseline unit-price selection.
//!
//! Upstream data is inconsistent: some sellers declare a trustworthy per-unit
//! price, others only a pack price, and the authorized seller is not always
//! explicitly Amazon. The baseline for a SKU is therefore chosen from an
//! ordered cascade, first source producing a value wins:
//!
//! 1. The first primary offer whose seller name contains "amazon"
//!    (case-insensitive): declared unit price if > 0, else computed
//!    price/pack unit price, else the raw listed price.
//! 2. The first primary offer in list order, same fallback chain.
//! 3. The variant's own computed unit price.
//! 4. Undefined.

use priceguard_core::{BaselineSource, Offer};
use priceguard_normalize::money::parse_money_opt;
use priceguard_normalize::{infer_pack_count, unit_price};
use rust_decimal::Decimal;

/// The reference unit price a SKU's offers are compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub unit_price: Option<Decimal>,
    pub source: BaselineSource,
}

impl Baseline {
    fn undefined() -> Self {
        Self {
            unit_price: None,
            source: BaselineSource::None,
        }
    }
}

/// Select the baseline for one SKU from its primary offers and its own
/// computed unit price.
pub fn select_baseline(primary_offers: &[&Offer], variant_unit: Option<Decimal>) -> Baseline {
    let amazon = primary_offers.iter().find(|offer| {
        offer
            .seller_display_name()
            .is_some_and(|name| name.to_lowercase().contains("amazon"))
    });

    if let Some(offer) = amazon {
        if let Some(baseline) = offer_baseline(
            offer,
            BaselineSource::MainSellerAmazon,
            BaselineSource::MainSellerAmazonRaw,
        ) {
            return baseline;
        }
    }

    if let Some(offer) = primary_offers.first() {
        if let Some(baseline) = offer_baseline(
            offer,
            BaselineSource::MainSellerFirst,
            BaselineSource::MainSellerFirstRaw,
        ) {
            return baseline;
        }
    }

    if let Some(unit) = variant_unit {
        return Baseline {
            unit_price: Some(unit),
            source: BaselineSource::VariantUnitPrice,
        };
    }

    Baseline::undefined()
}

/// Price fallback chain for a single primary offer: declared unit price,
/// computed unit price, raw listed price. `None` when the offer carries no
/// usable price at all.
fn offer_baseline(
    offer: &Offer,
    unit_source: BaselineSource,
    raw_source: BaselineSource,
) -> Option<Baseline> {
    if let Some(declared) = parse_money_opt(offer.unit_price.as_ref()) {
        if declared > Decimal::ZERO {
            return Some(Baseline {
                unit_price: Some(declared),
                source: unit_source,
            });
        }
    }

    let pack = infer_pack_count(offer);
    if let Some(computed) = unit_price(offer.price.as_ref(), pack) {
        return Some(Baseline {
            unit_price: Some(computed),
            source: unit_source,
        });
    }

    parse_money_opt(offer.price.as_ref()).map(|raw| Baseline {
        unit_price: Some(raw),
        source: raw_source,
    })
}
