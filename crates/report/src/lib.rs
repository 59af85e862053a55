//! Aggregation and reporting for the priceguard system.
//!
//! This crate provides:
//! - The streaming aggregator folded over canonical offers
//! - Summary finalization (sorted tables, ranked gouged-offer list)
//! - The composite marketplace health score
//! - The whole-snapshot scan engine

pub mod aggregator;
pub mod engine;
pub mod health;
pub mod summary;

pub use aggregator::Aggregator;
pub use engine::summarize;
pub use health::health_score;
pub use summary::Summary;
