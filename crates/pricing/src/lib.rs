//! Per-offer pricing decisions for the priceguard system.
//!
//! This crate handles:
//! - Baseline unit-price selection (priority cascade over primary offers)
//! - Offer deduplication by seller identity
//! - Seller unit-price resolution
//! - Gouging classification (dual threshold plus upstream override)

pub mod baseline;
pub mod classifier;
pub mod dedup;

pub use baseline::{select_baseline, Baseline};
pub use classifier::{classify_offer, resolve_seller_unit_price};
pub use dedup::{dedup_offers, seller_identity};
