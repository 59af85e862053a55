//! Composite marketplace health score.

use priceguard_core::HealthWeights;

/// Weighted penalty score on a 0..=100 scale. All three inputs are
/// percentages in 0..=100. Rounded to two decimals before clamping.
pub fn health_score(
    gouging_rate: f64,
    avg_overprice_pct: f64,
    prop_bad_sellers: f64,
    weights: &HealthWeights,
) -> f64 {
    let raw = 100.0
        - weights.gouging_rate * gouging_rate
        - weights.avg_overprice * avg_overprice_pct
        - weights.bad_sellers * prop_bad_sellers;
    let rounded = (raw * 100.0).round() / 100.0;
    rounded.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_clean_market_scores_full() {
        let weights = HealthWeights::default();
        assert_abs_diff_eq!(health_score(0.0, 0.0, 0.0, &weights), 100.0);
    }

    #[test]
    fn test_weighted_penalties() {
        let weights = HealthWeights::default();
        // 100 - 0.5*10 - 0.4*5 - 0.1*20 = 91.0
        assert_abs_diff_eq!(health_score(10.0, 5.0, 20.0, &weights), 91.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let weights = HealthWeights::default();
        // 100 - 0.5*3.333 = 98.3335 -> 98.33
        assert_abs_diff_eq!(health_score(3.333, 0.0, 0.0, &weights), 98.33);
    }

    #[test]
    fn test_clamped_at_zero() {
        let weights = HealthWeights::default();
        assert_abs_diff_eq!(health_score(100.0, 200.0, 100.0, &weights), 0.0);
    }
}
