//! Error types for rankfeat.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`RankfeatError`] enum. Configuration problems are reported before any
//! computation starts; failures of the external statistics provider surface as
//! [`RankfeatError::StatisticsUnavailable`] so callers can tell them apart from
//! bad input.
//!
//! # Examples
//!
//! ```
//! use rankfeat::error::{RankfeatError, Result};
//!
//! fn check_cutoff(k: usize) -> Result<()> {
//!     if k == 0 {
//!         return Err(RankfeatError::config("cutoff k must be at least 1"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_cutoff(0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rankfeat operations.
#[derive(Error, Debug)]
pub enum RankfeatError {
    /// I/O errors (reading configuration or synonym files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration parameter is outside its declared range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The term statistics provider could not answer.
    #[error("Statistics unavailable: {0}")]
    StatisticsUnavailable(String),

    /// Input data is malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Errors raised by caller-supplied adapters.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RankfeatError.
pub type Result<T> = std::result::Result<T, RankfeatError>;

impl RankfeatError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        RankfeatError::Config(msg.into())
    }

    /// Create a new statistics-unavailable error.
    pub fn statistics_unavailable<S: Into<String>>(msg: S) -> Self {
        RankfeatError::StatisticsUnavailable(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        RankfeatError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RankfeatError::Other(msg.into())
    }

    /// Whether this error came from the statistics provider.
    pub fn is_statistics_unavailable(&self) -> bool {
        matches!(self, RankfeatError::StatisticsUnavailable(_))
    }

    /// Whether this error is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, RankfeatError::Config(_))
    }
}
