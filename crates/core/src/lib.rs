//! Core types and configuration for the priceguard system.
//!
//! This crate provides shared types used across all other crates:
//! - Catalog snapshot types (product families, variants, offers)
//! - Canonical offer and baseline types owned by the engine
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{GougingConfig, HealthWeights, ScanConfig};
pub use error::{Error, Result};
pub use types::*;
