//! Data normalization for the priceguard system.
//!
//! This crate handles:
//! - Monetary parsing (arbitrary scalars into fixed-point decimals)
//! - Pack-count inference from structured and free-text fields
//! - Per-unit price derivation
//! - Snapshot loading

pub mod money;
pub mod pack;
pub mod snapshot;
pub mod unit_price;

pub use money::parse_money;
pub use pack::{infer_pack_count, PackSource};
pub use snapshot::load_snapshot;
pub use unit_price::unit_price;
