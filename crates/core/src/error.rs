//! Error types for the priceguard system.
//!
//! Per-record problems (unparseable prices, variants without an ASIN) are
//! absorbed locally and never surface here; this enum covers the failures
//! that abort a run.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the priceguard system.
#[derive(Error, Debug)]
pub enum Error {
    /// The input snapshot is missing, unreadable, or not valid structured
    /// data. Fatal: the run aborts with no output written.
    #[error("Snapshot unavailable: {0}")]
    Source(String),

    /// Data error (invalid or inconsistent data).
    #[error("Data error: {0}")]
    Data(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Error::Source(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }
}
