//! Streaming aggregation over canonical offers.
//!
//! One explicit `Aggregator` value is folded over every canonical offer in
//! the snapshot. Shards may be folded independently and combined with
//! [`Aggregator::merge`]: every field is a counter sum, list concatenation,
//! or set union, so merge order does not affect the totals.

use priceguard_core::{BaselineSource, CanonicalOffer, PriceFlag, ScanConfig};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Family/SKU context threaded alongside each canonical offer.
#[derive(Debug, Clone, Copy)]
pub struct SkuContext<'a> {
    pub asin: &'a str,
    pub product_name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub category: &'a str,
    /// The variant's own listed price, for the candidate table.
    pub listed_price: Option<Decimal>,
}

/// Per-category accumulators.
#[derive(Debug, Clone, Default)]
pub struct CategoryStats {
    pub total_listings: u64,
    pub gouged_listings: u64,
    pub pct_deltas: Vec<f64>,
    pub abs_deltas: Vec<f64>,
}

/// Per-seller accumulators. Entries exist only for sellers with at least one
/// gouged listing.
#[derive(Debug, Clone, Default)]
pub struct SellerStats {
    pub gouged_listings: u64,
    /// delta_pct of gouged listings only.
    pub gouged_pct_deltas: Vec<f64>,
}

/// One gouged offer in the ranked candidate table.
#[derive(Debug, Clone, Serialize)]
pub struct GougedCandidate {
    pub asin: String,
    pub product_name: Option<String>,
    pub title: Option<String>,
    pub category: String,
    pub seller_name: String,
    pub baseline_unit: Option<f64>,
    pub seller_unit: Option<f64>,
    pub baseline_source: BaselineSource,
    pub baseline_listing: Option<f64>,
    pub seller_listing: Option<f64>,
    pub price_delta_abs: Option<f64>,
    pub price_delta_pct: Option<f64>,
    pub detected_as_gouging: bool,
    pub upstream_price_flag: Option<String>,
}

/// Per-family roster row.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariantSummary {
    pub product_name: Option<String>,
    pub category: String,
    pub variant_count: u64,
    pub unique_sellers_in_product: Vec<String>,
}

/// All accumulators for one scan run. Rebuilt from scratch each run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    pub total_products: u64,
    pub total_skus: u64,
    pub total_listings: u64,
    pub total_gouged_listings: u64,
    pub fair_price_listings: u64,
    pub products_per_category: BTreeMap<String, u64>,
    pub skus_per_category: BTreeMap<String, u64>,
    /// Category -> ASINs observed with at least one marketplace offer.
    pub marketplace_asins: BTreeMap<String, BTreeSet<String>>,
    pub category_stats: BTreeMap<String, CategoryStats>,
    pub seller_stats: BTreeMap<String, SellerStats>,
    /// Seller -> distinct ASINs the seller lists.
    pub seller_sku_impact: BTreeMap<String, BTreeSet<String>>,
    /// ASIN -> sellers that gouged it.
    pub sku_gouged_map: BTreeMap<String, BTreeSet<String>>,
    pub candidates: Vec<GougedCandidate>,
    pub all_pct_deltas: Vec<f64>,
    pub all_abs_deltas: Vec<f64>,
    pub unique_sellers: BTreeSet<String>,
    pub unique_sellers_excluding_primary: BTreeSet<String>,
    pub price_flag_summary: BTreeMap<String, u64>,
    pub rating_tiers_summary: BTreeMap<String, u64>,
    pub product_variant_summary: Vec<ProductVariantSummary>,
    /// First-seen positive-rating percentage per distinct marketplace seller.
    pub seller_ratings: BTreeMap<String, f64>,
}

impl Aggregator {
    /// Record family-level counts and the per-family roster row.
    pub fn note_family(
        &mut self,
        category: &str,
        product_name: Option<&str>,
        variant_count: u64,
        seller_roster: BTreeSet<String>,
    ) {
        self.total_products += 1;
        self.total_skus += variant_count;
        *self
            .products_per_category
            .entry(category.to_string())
            .or_default() += 1;
        *self
            .skus_per_category
            .entry(category.to_string())
            .or_default() += variant_count;
        self.product_variant_summary.push(ProductVariantSummary {
            product_name: product_name.map(String::from),
            category: category.to_string(),
            variant_count,
            unique_sellers_in_product: seller_roster.into_iter().collect(),
        });
    }

    /// Record that a SKU has at least one marketplace offer.
    pub fn note_marketplace_sku(&mut self, category: &str, asin: &str) {
        self.marketplace_asins
            .entry(category.to_string())
            .or_default()
            .insert(asin.to_string());
    }

    /// Record a marketplace seller's rating. The first value seen for a
    /// seller wins. Fed from every marketplace row, including offers that
    /// never match a variant.
    pub fn note_seller_rating(&mut self, name: &str, positive_pct: f64) {
        self.seller_ratings
            .entry(name.to_string())
            .or_insert(positive_pct);
    }

    /// Fold one canonical offer into every accumulator.
    pub fn observe_offer(
        &mut self,
        ctx: &SkuContext<'_>,
        offer: &CanonicalOffer,
        config: &ScanConfig,
    ) {
        let name = offer.seller_name.clone();

        self.unique_sellers.insert(name.clone());
        if !config.is_excluded_seller(&name) {
            self.unique_sellers_excluding_primary.insert(name.clone());
        }
        self.seller_sku_impact
            .entry(name.clone())
            .or_default()
            .insert(ctx.asin.to_string());

        if let Some(flag) = offer.upstream_flag {
            *self
                .price_flag_summary
                .entry(flag.label().to_string())
                .or_default() += 1;
        }
        if let Some(rating) = offer.positive_rating_percent {
            *self
                .rating_tiers_summary
                .entry(rating_tier(rating).to_string())
                .or_default() += 1;
        }

        self.total_listings += 1;
        let category = self
            .category_stats
            .entry(ctx.category.to_string())
            .or_default();
        category.total_listings += 1;

        if offer.upstream_flag == Some(PriceFlag::FairPrice) {
            self.fair_price_listings += 1;
        }

        let pct = offer.delta_pct.and_then(|d| d.to_f64());
        let abs = offer.delta_abs.and_then(|d| d.to_f64());
        if let Some(pct) = pct {
            self.all_pct_deltas.push(pct);
            category.pct_deltas.push(pct);
        }
        if let Some(abs) = abs {
            self.all_abs_deltas.push(abs);
            category.abs_deltas.push(abs);
        }

        if offer.is_gouging {
            self.total_gouged_listings += 1;
            category.gouged_listings += 1;
            let seller = self.seller_stats.entry(name.clone()).or_default();
            seller.gouged_listings += 1;
            if let Some(pct) = pct {
                seller.gouged_pct_deltas.push(pct);
            }
            self.sku_gouged_map
                .entry(ctx.asin.to_string())
                .or_default()
                .insert(name.clone());
            self.candidates.push(GougedCandidate {
                asin: ctx.asin.to_string(),
                product_name: ctx.product_name.map(String::from),
                title: ctx.title.map(String::from),
                category: ctx.category.to_string(),
                seller_name: name,
                baseline_unit: offer.baseline_unit_price.and_then(|d| d.to_f64()),
                seller_unit: offer.unit_price.and_then(|d| d.to_f64()),
                baseline_source: offer.baseline_source,
                baseline_listing: ctx.listed_price.and_then(|d| d.to_f64()),
                seller_listing: offer.listed_price.and_then(|d| d.to_f64()),
                price_delta_abs: abs,
                price_delta_pct: pct,
                detected_as_gouging: true,
                upstream_price_flag: offer.upstream_flag.map(|f| f.label().to_string()),
            });
        }
    }

    /// Combine two shard aggregators. Counters sum, lists concatenate, sets
    /// union; seller ratings keep the already-present value.
    pub fn merge(mut self, other: Aggregator) -> Aggregator {
        self.total_products += other.total_products;
        self.total_skus += other.total_skus;
        self.total_listings += other.total_listings;
        self.total_gouged_listings += other.total_gouged_listings;
        self.fair_price_listings += other.fair_price_listings;

        for (k, v) in other.products_per_category {
            *self.products_per_category.entry(k).or_default() += v;
        }
        for (k, v) in other.skus_per_category {
            *self.skus_per_category.entry(k).or_default() += v;
        }
        for (k, v) in other.marketplace_asins {
            self.marketplace_asins.entry(k).or_default().extend(v);
        }
        for (k, v) in other.category_stats {
            let entry = self.category_stats.entry(k).or_default();
            entry.total_listings += v.total_listings;
            entry.gouged_listings += v.gouged_listings;
            entry.pct_deltas.extend(v.pct_deltas);
            entry.abs_deltas.extend(v.abs_deltas);
        }
        for (k, v) in other.seller_stats {
            let entry = self.seller_stats.entry(k).or_default();
            entry.gouged_listings += v.gouged_listings;
            entry.gouged_pct_deltas.extend(v.gouged_pct_deltas);
        }
        for (k, v) in other.seller_sku_impact {
            self.seller_sku_impact.entry(k).or_default().extend(v);
        }
        for (k, v) in other.sku_gouged_map {
            self.sku_gouged_map.entry(k).or_default().extend(v);
        }
        self.candidates.extend(other.candidates);
        self.all_pct_deltas.extend(other.all_pct_deltas);
        self.all_abs_deltas.extend(other.all_abs_deltas);
        self.unique_sellers.extend(other.unique_sellers);
        self.unique_sellers_excluding_primary
            .extend(other.unique_sellers_excluding_primary);
        for (k, v) in other.price_flag_summary {
            *self.price_flag_summary.entry(k).or_default() += v;
        }
        for (k, v) in other.rating_tiers_summary {
            *self.rating_tiers_summary.entry(k).or_default() += v;
        }
        self.product_variant_summary
            .extend(other.product_variant_summary);
        for (k, v) in other.seller_ratings {
            self.seller_ratings.entry(k).or_insert(v);
        }

        self
    }
}

/// Bucket a positive-rating percentage into a tier label.
pub fn rating_tier(positive_pct: f64) -> &'static str {
    if positive_pct >= 90.0 {
        "excellent"
    } else if positive_pct >= 75.0 {
        "good"
    } else if positive_pct >= 50.0 {
        "mixed"
    } else {
        "poor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priceguard_core::OfferOrigin;

    fn make_offer(
        seller: &str,
        origin: OfferOrigin,
        delta_pct: Option<i64>,
        delta_abs: Option<i64>,
        is_gouging: bool,
        flag: Option<PriceFlag>,
    ) -> CanonicalOffer {
        CanonicalOffer {
            asin: "B000TEST".into(),
            seller_name: seller.to_string(),
            seller_key: format!("{}|", seller.to_lowercase()),
            origin,
            unit_price: Some(Decimal::new(700, 2)),
            listed_price: Some(Decimal::new(700, 2)),
            baseline_unit_price: Some(Decimal::new(500, 2)),
            baseline_source: BaselineSource::MainSellerAmazon,
            delta_abs: delta_abs.map(|c| Decimal::new(c, 2)),
            delta_pct: delta_pct.map(Decimal::from),
            is_gouging,
            upstream_flag: flag,
            positive_rating_percent: None,
        }
    }

    fn ctx<'a>() -> SkuContext<'a> {
        SkuContext {
            asin: "B000TEST",
            product_name: Some("Bars"),
            title: Some("Bars 12ct"),
            category: "Snacks",
            listed_price: Some(Decimal::new(500, 2)),
        }
    }

    #[test]
    fn test_observe_counts_listing_and_deltas() {
        let mut agg = Aggregator::default();
        let config = ScanConfig::default();
        agg.observe_offer(
            &ctx(),
            &make_offer("Shop A", OfferOrigin::Marketplace, Some(40), Some(200), true, None),
            &config,
        );
        agg.observe_offer(
            &ctx(),
            &make_offer("Shop B", OfferOrigin::Marketplace, Some(10), Some(50), false, None),
            &config,
        );

        assert_eq!(agg.total_listings, 2);
        assert_eq!(agg.total_gouged_listings, 1);
        assert_eq!(agg.all_pct_deltas, vec![40.0, 10.0]);
        assert_eq!(agg.candidates.len(), 1);
        assert_eq!(agg.candidates[0].seller_name, "Shop A");
        let snacks = &agg.category_stats["Snacks"];
        assert_eq!(snacks.total_listings, 2);
        assert_eq!(snacks.gouged_listings, 1);
        assert!(agg.sku_gouged_map["B000TEST"].contains("Shop A"));
    }

    #[test]
    fn test_fair_price_counter_and_no_candidate() {
        let mut agg = Aggregator::default();
        let config = ScanConfig::default();
        agg.observe_offer(
            &ctx(),
            &make_offer(
                "Shop A",
                OfferOrigin::Marketplace,
                Some(500),
                Some(5000),
                false,
                Some(PriceFlag::FairPrice),
            ),
            &config,
        );
        assert_eq!(agg.fair_price_listings, 1);
        assert_eq!(agg.total_gouged_listings, 0);
        assert!(agg.candidates.is_empty());
        assert_eq!(agg.price_flag_summary["Fair Price"], 1);
    }

    #[test]
    fn test_excluded_sellers_left_out_of_third_party_roster() {
        let mut agg = Aggregator::default();
        let config = ScanConfig::default();
        agg.observe_offer(
            &ctx(),
            &make_offer("Amazon.com", OfferOrigin::Primary, None, None, false, None),
            &config,
        );
        agg.observe_offer(
            &ctx(),
            &make_offer("Shop A", OfferOrigin::Marketplace, None, None, false, None),
            &config,
        );
        assert!(agg.unique_sellers.contains("Amazon.com"));
        assert!(!agg.unique_sellers_excluding_primary.contains("Amazon.com"));
        assert!(agg.unique_sellers_excluding_primary.contains("Shop A"));
    }

    #[test]
    fn test_seller_rating_keeps_first_value() {
        let mut agg = Aggregator::default();
        agg.note_seller_rating("Shop A", 95.0);
        agg.note_seller_rating("Shop A", 20.0);
        agg.note_seller_rating("Shop B", 40.0);
        assert_eq!(agg.seller_ratings["Shop A"], 95.0);
        assert_eq!(agg.seller_ratings["Shop B"], 40.0);
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(rating_tier(95.0), "excellent");
        assert_eq!(rating_tier(90.0), "excellent");
        assert_eq!(rating_tier(80.0), "good");
        assert_eq!(rating_tier(55.0), "mixed");
        assert_eq!(rating_tier(10.0), "poor");
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let config = ScanConfig::default();
        let offers = [
            make_offer("Shop A", OfferOrigin::Marketplace, Some(40), Some(200), true, None),
            make_offer("Shop B", OfferOrigin::Marketplace, Some(10), Some(50), false, None),
            make_offer("Shop A", OfferOrigin::Marketplace, Some(60), Some(300), true, None),
        ];

        let mut sequential = Aggregator::default();
        for offer in &offers {
            sequential.observe_offer(&ctx(), offer, &config);
        }

        let mut left = Aggregator::default();
        left.observe_offer(&ctx(), &offers[0], &config);
        let mut right = Aggregator::default();
        right.observe_offer(&ctx(), &offers[1], &config);
        right.observe_offer(&ctx(), &offers[2], &config);
        let merged = left.merge(right);

        assert_eq!(merged.total_listings, sequential.total_listings);
        assert_eq!(merged.total_gouged_listings, sequential.total_gouged_listings);
        assert_eq!(merged.all_pct_deltas, sequential.all_pct_deltas);
        assert_eq!(
            merged.seller_stats["Shop A"].gouged_listings,
            sequential.seller_stats["Shop A"].gouged_listings
        );
        assert_eq!(merged.sku_gouged_map, sequential.sku_gouged_map);
    }
}
