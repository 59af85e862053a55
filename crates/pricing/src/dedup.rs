//! Offer deduplication.
//!
//! The primary and marketplace feeds can overlap when a primary seller is
//! echoed in the marketplace list. The combined list for a SKU is reduced to
//! distinct offers by seller identity; the first occurrence in combined-list
//! order (primary offers first) is kept.

use priceguard_core::{Offer, OfferOrigin};
use std::collections::HashSet;

/// Identity key for a seller: trimmed lower-cased name plus seller id, seller
/// SKU, or empty string. `None` when the offer carries no usable seller name.
pub fn seller_identity(offer: &Offer) -> Option<String> {
    let name = offer.seller_display_name()?;
    let reference = offer
        .seller_id
        .as_deref()
        .or(offer.seller_sku.as_deref())
        .unwrap_or("");
    Some(format!("{}|{}", name.to_lowercase(), reference))
}

/// Combine a SKU's primary and marketplace offers into one canonical list,
/// dropping unnamed offers and later duplicates.
pub fn dedup_offers<'a>(
    primary: &[&'a Offer],
    marketplace: &[&'a Offer],
) -> Vec<(&'a Offer, OfferOrigin)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut canonical = Vec::with_capacity(primary.len() + marketplace.len());

    let combined = primary
        .iter()
        .map(|offer| (*offer, OfferOrigin::Primary))
        .chain(
            marketplace
                .iter()
                .map(|offer| (*offer, OfferOrigin::Marketplace)),
        );

    for (offer, origin) in combined {
        let Some(identity) = seller_identity(offer) else {
            continue;
        };
        if seen.insert(identity) {
            canonical.push((offer, origin));
        }
    }

    canonical
}
