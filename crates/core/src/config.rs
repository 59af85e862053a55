//! Configuration structures for the priceguard system.

use serde::{Deserialize, Serialize};

/// Main configuration for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Gouging thresholds.
    pub gouging: GougingConfig,
    /// Health score weights.
    pub health: HealthWeights,
    /// Number of entries in the ranked gouged-offer table.
    pub top_n: usize,
    /// Positive-rating cutoff below which a seller counts as "bad".
    pub bad_rating_cutoff: f64,
    /// Lower-cased seller names excluded from the third-party seller roster
    /// (the platform itself and the brand's own storefronts).
    pub excluded_sellers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            gouging: GougingConfig::default(),
            health: HealthWeights::default(),
            top_n: 20,
            bad_rating_cutoff: 50.0,
            excluded_sellers: vec!["amazon".to_string(), "amazon.com".to_string()],
        }
    }
}

impl ScanConfig {
    /// Whether a seller name belongs to the excluded roster.
    pub fn is_excluded_seller(&self, name: &str) -> bool {
        let lowered = name.trim().to_lowercase();
        self.excluded_sellers.iter().any(|s| s == &lowered)
    }
}

/// Dual-threshold gouging rule configuration.
///
/// Both thresholds must be met: percentage alone misfires on cheap items,
/// absolute alone misfires on expensive ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GougingConfig {
    /// Minimum markup percentage over the baseline.
    pub pct_threshold: f64,
    /// Minimum absolute markup over the baseline.
    pub abs_threshold: f64,
}

impl Default for GougingConfig {
    fn default() -> Self {
        Self {
            pct_threshold: 20.0,
            abs_threshold: 2.0,
        }
    }
}

/// Fixed policy weights for the composite health score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthWeights {
    /// Weight on the gouging rate.
    pub gouging_rate: f64,
    /// Weight on the average overprice percentage.
    pub avg_overprice: f64,
    /// Weight on the bad-seller proportion.
    pub bad_sellers: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            gouging_rate: 0.5,
            avg_overprice: 0.4,
            bad_sellers: 0.1,
        }
    }
}
