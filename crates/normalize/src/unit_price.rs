//! Per-unit price derivation.

use crate::money::parse_money_opt;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Fractional digits carried by every unit price.
pub const UNIT_PRICE_SCALE: u32 = 4;

/// Quantize an amount to the unit-price scale, round-half-up.
pub fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(UNIT_PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Derive a per-unit price: parsed price / pack count, quantized.
///
/// Returns `None` when the price is unparseable or the pack count is invalid.
pub fn unit_price(price: Option<&Value>, pack_count: u32) -> Option<Decimal> {
    if pack_count == 0 {
        return None;
    }
    let parsed = parse_money_opt(price)?;
    Some(quantize(parsed / Decimal::from(pack_count)))
}
