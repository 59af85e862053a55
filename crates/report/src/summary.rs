//! Summary finalization.
//!
//! Converts the raw accumulators into the stable-field-name output object:
//! derived scalars, sorted ranking tables, and the composite health score.
//! Downstream consumers key into the serialized object by field name, so
//! renames here are breaking changes.

use crate::aggregator::{Aggregator, GougedCandidate, ProductVariantSummary};
use crate::health::health_score;
use ordered_float::OrderedFloat;
use priceguard_core::ScanConfig;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Per-category ranking row.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGougingSummary {
    pub category: String,
    pub total_listings: u64,
    pub gouged_listings: u64,
    pub gouging_rate: f64,
    pub avg_overprice_pct: f64,
    pub avg_overprice_abs: f64,
}

/// Per-seller ranking row. Only sellers with at least one gouged listing
/// appear.
#[derive(Debug, Clone, Serialize)]
pub struct SellerGougingSummary {
    pub seller_name: String,
    pub gouged_listings: u64,
    pub avg_overprice_pct: f64,
}

/// The whole-snapshot summary artifact.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_products: u64,
    pub total_categories: u64,
    pub total_skus: u64,
    pub total_listings: u64,
    pub total_gouged_listings: u64,
    pub fair_price_listings: u64,
    pub gouging_rate: f64,
    pub avg_overprice_pct: f64,
    pub avg_overprice_abs: f64,
    pub max_overprice_pct: f64,
    pub max_overprice_abs: f64,
    pub skus_impacted: u64,
    pub skus_impact_rate: f64,
    pub prop_bad_sellers: f64,
    pub marketplace_health_score: f64,
    pub products_per_category: BTreeMap<String, u64>,
    pub skus_per_category: BTreeMap<String, u64>,
    pub marketplace_skus_per_category: BTreeMap<String, u64>,
    /// Seller -> count of distinct SKUs the seller lists.
    pub seller_sku_impact: BTreeMap<String, u64>,
    /// ASIN -> sorted names of sellers that gouged it.
    pub sku_gouged_map: BTreeMap<String, Vec<String>>,
    pub total_unique_sellers: u64,
    pub unique_sellers: Vec<String>,
    pub total_unique_sellers_excluding_primary: u64,
    pub unique_sellers_excluding_primary: Vec<String>,
    pub price_flag_summary: BTreeMap<String, u64>,
    pub rating_tiers_summary: BTreeMap<String, u64>,
    pub top_gouged_skus: Vec<GougedCandidate>,
    pub category_gouging_summary: Vec<CategoryGougingSummary>,
    pub seller_gouging_summary: Vec<SellerGougingSummary>,
    pub product_variant_summary: Vec<ProductVariantSummary>,
}

impl Summary {
    /// Finalize one run's accumulators into the output artifact.
    pub fn from_aggregator(agg: Aggregator, config: &ScanConfig) -> Summary {
        let gouging_rate = round2(pct(agg.total_gouged_listings, agg.total_listings));
        let avg_overprice_pct = round2(mean(&agg.all_pct_deltas));
        let avg_overprice_abs = round2(mean(&agg.all_abs_deltas));
        let max_overprice_pct = round2(max(&agg.all_pct_deltas));
        let max_overprice_abs = round2(max(&agg.all_abs_deltas));

        let skus_impacted = agg.sku_gouged_map.len() as u64;
        let skus_impact_rate = round2(pct(skus_impacted, agg.total_skus));

        let bad_sellers = agg
            .seller_ratings
            .values()
            .filter(|r| **r < config.bad_rating_cutoff)
            .count() as u64;
        let prop_bad_sellers = round2(pct(bad_sellers, agg.seller_ratings.len() as u64));

        let marketplace_health_score = health_score(
            gouging_rate,
            avg_overprice_pct,
            prop_bad_sellers,
            &config.health,
        );

        let mut top_gouged_skus = agg.candidates;
        top_gouged_skus.sort_by_key(|c| {
            Reverse(OrderedFloat(c.price_delta_pct.unwrap_or(f64::NEG_INFINITY)))
        });
        top_gouged_skus.truncate(config.top_n);

        let mut category_gouging_summary: Vec<CategoryGougingSummary> = agg
            .category_stats
            .iter()
            .map(|(category, stats)| CategoryGougingSummary {
                category: category.clone(),
                total_listings: stats.total_listings,
                gouged_listings: stats.gouged_listings,
                gouging_rate: round2(pct(stats.gouged_listings, stats.total_listings)),
                avg_overprice_pct: round2(mean(&stats.pct_deltas)),
                avg_overprice_abs: round2(mean(&stats.abs_deltas)),
            })
            .collect();
        category_gouging_summary.sort_by(|a, b| {
            OrderedFloat(b.gouging_rate)
                .cmp(&OrderedFloat(a.gouging_rate))
                .then_with(|| a.category.cmp(&b.category))
        });

        let mut seller_gouging_summary: Vec<SellerGougingSummary> = agg
            .seller_stats
            .iter()
            .map(|(seller, stats)| SellerGougingSummary {
                seller_name: seller.clone(),
                gouged_listings: stats.gouged_listings,
                avg_overprice_pct: round2(mean(&stats.gouged_pct_deltas)),
            })
            .collect();
        seller_gouging_summary.sort_by(|a, b| {
            b.gouged_listings
                .cmp(&a.gouged_listings)
                .then_with(|| {
                    OrderedFloat(b.avg_overprice_pct).cmp(&OrderedFloat(a.avg_overprice_pct))
                })
                .then_with(|| a.seller_name.cmp(&b.seller_name))
        });

        Summary {
            total_products: agg.total_products,
            total_categories: agg.products_per_category.len() as u64,
            total_skus: agg.total_skus,
            total_listings: agg.total_listings,
            total_gouged_listings: agg.total_gouged_listings,
            fair_price_listings: agg.fair_price_listings,
            gouging_rate,
            avg_overprice_pct,
            avg_overprice_abs,
            max_overprice_pct,
            max_overprice_abs,
            skus_impacted,
            skus_impact_rate,
            prop_bad_sellers,
            marketplace_health_score,
            products_per_category: agg.products_per_category,
            skus_per_category: agg.skus_per_category,
            marketplace_skus_per_category: agg
                .marketplace_asins
                .into_iter()
                .map(|(category, asins)| (category, asins.len() as u64))
                .collect(),
            seller_sku_impact: agg
                .seller_sku_impact
                .into_iter()
                .map(|(seller, asins)| (seller, asins.len() as u64))
                .collect(),
            sku_gouged_map: agg
                .sku_gouged_map
                .into_iter()
                .map(|(asin, sellers)| (asin, sellers.into_iter().collect()))
                .collect(),
            total_unique_sellers: agg.unique_sellers.len() as u64,
            unique_sellers: agg.unique_sellers.into_iter().collect(),
            total_unique_sellers_excluding_primary: agg.unique_sellers_excluding_primary.len()
                as u64,
            unique_sellers_excluding_primary: agg
                .unique_sellers_excluding_primary
                .into_iter()
                .collect(),
            price_flag_summary: agg.price_flag_summary,
            rating_tiers_summary: agg.rating_tiers_summary,
            top_gouged_skus,
            category_gouging_summary,
            seller_gouging_summary,
            product_variant_summary: agg.product_variant_summary,
        }
    }
}

fn pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_aggregator_is_healthy() {
        let summary = Summary::from_aggregator(Aggregator::default(), &ScanConfig::default());
        assert_eq!(summary.total_listings, 0);
        assert_abs_diff_eq!(summary.gouging_rate, 0.0);
        assert_abs_diff_eq!(summary.marketplace_health_score, 100.0);
        assert_abs_diff_eq!(summary.max_overprice_pct, 0.0);
        assert!(summary.top_gouged_skus.is_empty());
    }

    #[test]
    fn test_scalar_derivation() {
        let mut agg = Aggregator::default();
        agg.total_skus = 4;
        agg.total_listings = 10;
        agg.total_gouged_listings = 3;
        agg.all_pct_deltas = vec![10.0, 20.0, 60.0];
        agg.all_abs_deltas = vec![1.0, 2.0, 6.0];
        agg.sku_gouged_map
            .entry("B000A".into())
            .or_default()
            .insert("Shop A".into());

        let summary = Summary::from_aggregator(agg, &ScanConfig::default());
        assert_abs_diff_eq!(summary.gouging_rate, 30.0);
        assert_abs_diff_eq!(summary.avg_overprice_pct, 30.0);
        assert_abs_diff_eq!(summary.avg_overprice_abs, 3.0);
        assert_abs_diff_eq!(summary.max_overprice_pct, 60.0);
        assert_abs_diff_eq!(summary.max_overprice_abs, 6.0);
        assert_eq!(summary.skus_impacted, 1);
        assert_abs_diff_eq!(summary.skus_impact_rate, 25.0);
        // 100 - 0.5*30 - 0.4*30 = 73.0
        assert_abs_diff_eq!(summary.marketplace_health_score, 73.0);
    }

    #[test]
    fn test_prop_bad_sellers_over_rated_sellers_only() {
        let mut agg = Aggregator::default();
        agg.seller_ratings.insert("Shop A".into(), 95.0);
        agg.seller_ratings.insert("Shop B".into(), 40.0);
        agg.seller_ratings.insert("Shop C".into(), 30.0);
        agg.seller_ratings.insert("Shop D".into(), 80.0);

        let summary = Summary::from_aggregator(agg, &ScanConfig::default());
        assert_abs_diff_eq!(summary.prop_bad_sellers, 50.0);
    }

    #[test]
    fn test_seller_ranking_order() {
        let mut agg = Aggregator::default();
        let a = agg.seller_stats.entry("Alpha".into()).or_default();
        a.gouged_listings = 2;
        a.gouged_pct_deltas = vec![30.0, 50.0];
        let b = agg.seller_stats.entry("Beta".into()).or_default();
        b.gouged_listings = 2;
        b.gouged_pct_deltas = vec![90.0, 90.0];
        let c = agg.seller_stats.entry("Gamma".into()).or_default();
        c.gouged_listings = 5;
        c.gouged_pct_deltas = vec![25.0; 5];

        let summary = Summary::from_aggregator(agg, &ScanConfig::default());
        let names: Vec<&str> = summary
            .seller_gouging_summary
            .iter()
            .map(|row| row.seller_name.as_str())
            .collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[test]
    fn test_category_ranking_by_rate() {
        let mut agg = Aggregator::default();
        let snacks = agg.category_stats.entry("Snacks".into()).or_default();
        snacks.total_listings = 10;
        snacks.gouged_listings = 2;
        let vitamins = agg.category_stats.entry("Vitamins".into()).or_default();
        vitamins.total_listings = 4;
        vitamins.gouged_listings = 3;

        let summary = Summary::from_aggregator(agg, &ScanConfig::default());
        assert_eq!(summary.category_gouging_summary[0].category, "Vitamins");
        assert_abs_diff_eq!(summary.category_gouging_summary[0].gouging_rate, 75.0);
        assert_eq!(summary.category_gouging_summary[1].category, "Snacks");
    }

    #[test]
    fn test_top_candidates_truncated_and_sorted() {
        let mut agg = Aggregator::default();
        for i in 0..25 {
            agg.candidates.push(GougedCandidate {
                asin: format!("B{:03}", i),
                product_name: None,
                title: None,
                category: "Snacks".into(),
                seller_name: format!("Shop {}", i),
                baseline_unit: Some(5.0),
                seller_unit: Some(7.0),
                baseline_source: priceguard_core::BaselineSource::MainSellerAmazon,
                baseline_listing: None,
                seller_listing: None,
                price_delta_abs: Some(2.0),
                price_delta_pct: Some(i as f64),
                detected_as_gouging: true,
                upstream_price_flag: None,
            });
        }

        let summary = Summary::from_aggregator(agg, &ScanConfig::default());
        assert_eq!(summary.top_gouged_skus.len(), 20);
        assert_abs_diff_eq!(summary.top_gouged_skus[0].price_delta_pct.unwrap(), 24.0);
        assert_abs_diff_eq!(summary.top_gouged_skus[19].price_delta_pct.unwrap(), 5.0);
    }
}
