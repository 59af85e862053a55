//! Whole-snapshot scan engine.
//!
//! Single pass over the catalog: for each family, variants without an ASIN
//! are skipped, offers are matched to variants by ASIN, the baseline cascade
//! and dedup run per SKU, and every canonical offer is folded into the
//! aggregator. Finalization derives the summary artifact.

use crate::aggregator::{Aggregator, SkuContext};
use crate::summary::Summary;
use priceguard_core::{Offer, ProductFamily, ScanConfig, Variant};
use priceguard_normalize::money::parse_money_opt;
use priceguard_normalize::{infer_pack_count, unit_price};
use priceguard_pricing::{classify_offer, dedup_offers, select_baseline};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Scan a full snapshot and produce the summary artifact.
pub fn summarize(families: &[ProductFamily], config: &ScanConfig) -> Summary {
    let mut agg = Aggregator::default();
    for family in families {
        fold_family(&mut agg, family, config);
    }
    Summary::from_aggregator(agg, config)
}

/// Fold one product family into the aggregator.
pub fn fold_family(agg: &mut Aggregator, family: &ProductFamily, config: &ScanConfig) {
    let category = family
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("Unknown");
    let product_name = family.product_name.as_deref();

    let variants: Vec<&Variant> = family
        .variants
        .iter()
        .filter(|v| v.asin().is_some())
        .collect();
    let dropped = family.variants.len() - variants.len();
    if dropped > 0 {
        warn!(
            product = product_name.unwrap_or("<unnamed>"),
            dropped, "skipping variants without an ASIN"
        );
    }

    let mut roster: BTreeSet<String> = BTreeSet::new();
    for offer in family.main_seller.iter().chain(&family.seller_market) {
        if let Some(name) = offer.seller_display_name() {
            roster.insert(name.to_string());
        }
    }
    agg.note_family(category, product_name, variants.len() as u64, roster);

    // Ratings come from every marketplace row, even ones whose ASIN matches
    // no variant, so the bad-seller ratio sees the whole seller population.
    for offer in &family.seller_market {
        if let (Some(name), Some(rating)) = (offer.seller_display_name(), offer.rating_value()) {
            agg.note_seller_rating(name, rating);
        }
    }

    let mut main_by_asin: HashMap<&str, Vec<&Offer>> = HashMap::new();
    for offer in &family.main_seller {
        if let Some(asin) = offer.asin.as_deref().filter(|a| !a.is_empty()) {
            main_by_asin.entry(asin).or_default().push(offer);
        }
    }

    for variant in variants {
        let Some(asin) = variant.asin() else { continue };

        let pack = infer_pack_count(variant);
        // Rule 3 of the baseline cascade uses the variant's own listed price
        // divided by pack count; the declared unit_price field is not
        // consulted here.
        let variant_unit = unit_price(variant.price.as_ref(), pack);

        let primary: Vec<&Offer> = main_by_asin.get(asin).cloned().unwrap_or_default();
        let market: Vec<&Offer> = family
            .seller_market
            .iter()
            .filter(|offer| offer.asin.as_deref() == Some(asin))
            .collect();
        if !market.is_empty() {
            agg.note_marketplace_sku(category, asin);
        }

        let baseline = select_baseline(&primary, variant_unit);
        let ctx = SkuContext {
            asin,
            product_name,
            title: variant.display_title(),
            category,
            listed_price: parse_money_opt(variant.price.as_ref()),
        };

        for (offer, origin) in dedup_offers(&primary, &market) {
            let canonical = classify_offer(offer, origin, asin, &baseline, &config.gouging);
            agg.observe_offer(&ctx, &canonical, config);
        }
    }
}
