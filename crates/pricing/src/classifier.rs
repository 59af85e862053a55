//! Gouging classification.
//!
//! Decides per canonical offer whether it constitutes price gouging. The
//! computed rule requires both a percentage and an absolute margin over the
//! baseline; an authoritative upstream flag overrides the computed decision
//! in both directions.

use crate::baseline::Baseline;
use crate::dedup::seller_identity;
use priceguard_core::{CanonicalOffer, GougingConfig, Offer, OfferOrigin, PriceFlag};
use priceguard_normalize::money::parse_money_opt;
use priceguard_normalize::{infer_pack_count, unit_price};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Resolve the per-unit price of a seller's offer.
///
/// The declared unit price is trusted when positive, unless it is
/// inconsistent with the pack price (declared x pack < half the listed
/// price), in which case the unit price is recomputed from listed price /
/// pack count. Without a usable declared value the unit price is computed.
pub fn resolve_seller_unit_price(offer: &Offer) -> Option<Decimal> {
    let pack = infer_pack_count(offer);
    let declared = parse_money_opt(offer.unit_price.as_ref()).filter(|d| *d > Decimal::ZERO);

    match declared {
        Some(declared) => {
            let listed = parse_money_opt(offer.price.as_ref());
            let inconsistent = listed.is_some_and(|listed| {
                declared * Decimal::from(pack) < listed * Decimal::new(5, 1)
            });
            if inconsistent {
                unit_price(offer.price.as_ref(), pack)
            } else {
                Some(declared)
            }
        }
        None => unit_price(offer.price.as_ref(), pack),
    }
}

/// Classify one deduplicated offer against the SKU baseline.
///
/// Offers with an undefined unit price on either side carry no deltas and are
/// never gouging; they still count toward listing totals downstream.
pub fn classify_offer(
    offer: &Offer,
    origin: OfferOrigin,
    asin: &str,
    baseline: &Baseline,
    config: &GougingConfig,
) -> CanonicalOffer {
    let seller_name = offer
        .seller_display_name()
        .unwrap_or_default()
        .to_string();
    let seller_key = seller_identity(offer).unwrap_or_default();
    let seller_unit = resolve_seller_unit_price(offer);
    let upstream_flag = offer.upstream_flag();

    let mut delta_abs = None;
    let mut delta_pct = None;
    let mut is_gouging = false;

    // An undefined unit price on either side makes the offer unclassifiable:
    // it stays out of the gouged counters even when an upstream flag says
    // otherwise.
    if let (Some(seller_unit), Some(baseline_unit)) = (seller_unit, baseline.unit_price) {
        let abs = seller_unit - baseline_unit;
        delta_abs = Some(abs);
        let mut computed_gouging = false;
        if !baseline_unit.is_zero() {
            let pct = abs / baseline_unit * Decimal::from(100);
            delta_pct = Some(pct);
            computed_gouging = pct.to_f64().is_some_and(|p| p >= config.pct_threshold)
                && abs.to_f64().is_some_and(|a| a >= config.abs_threshold);
        }
        is_gouging = match upstream_flag {
            Some(PriceFlag::PriceGouging) => true,
            Some(PriceFlag::FairPrice) => false,
            _ => computed_gouging,
        };
    }

    CanonicalOffer {
        asin: asin.to_string(),
        seller_name,
        seller_key,
        origin,
        unit_price: seller_unit,
        listed_price: parse_money_opt(offer.price.as_ref()),
        baseline_unit_price: baseline.unit_price,
        baseline_source: baseline.source,
        delta_abs,
        delta_pct,
        is_gouging,
        upstream_flag,
        positive_rating_percent: offer.rating_value(),
    }
}
