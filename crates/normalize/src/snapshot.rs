//! Snapshot loading.
//!
//! The engine operates on one complete catalog snapshot per run. An
//! unreadable or structurally invalid snapshot is fatal: the run must abort
//! rather than report an empty marketplace as healthy.

use priceguard_core::{Error, ProductFamily, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and parse a snapshot file into product families.
pub fn load_snapshot(path: &Path) -> Result<Vec<ProductFamily>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::source(format!("{}: {e}", path.display())))?;
    let families: Vec<ProductFamily> = serde_json::from_str(&raw)
        .map_err(|e| Error::source(format!("{}: {e}", path.display())))?;
    info!(families = families.len(), path = %path.display(), "snapshot loaded");
    Ok(families)
}
