//! Top-level error type for the `rankbayes` crate.

use crate::data::DataError;
use rankbayes_core::RankTestError;

/// Errors surfaced by the analysis pipeline and the CLI.
///
/// Nothing here is retried: every variant ends the run it came from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input could not be loaded or did not form a valid sample.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Sampling or Bayes-factor computation failed.
    #[error("{0}")]
    Analysis(#[from] RankTestError),

    /// An analysis setting is out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the `rankbayes` crate.
pub type Result<T> = std::result::Result<T, Error>;
