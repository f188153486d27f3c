//! Error types for benchmarking.

use std::path::PathBuf;

use benchpress_compile::CompileError;
use thiserror::Error;

/// Errors raised while benchmarking or writing reports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// A metric was recorded twice for one invocation.
    #[error("Metric '{0}' is already recorded")]
    DuplicateMetric(String),

    /// A benchmark asked for zero timed rounds.
    #[error("At least one timed round is required")]
    NoRounds,

    /// The compiler failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// Report could not be written.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for benchmarking.
pub type BenchResult<T> = Result<T, BenchError>;
