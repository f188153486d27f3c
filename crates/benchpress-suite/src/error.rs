//! Error types for the suite layer.

use std::path::PathBuf;

use benchpress_target::ConfigurationError;
use thiserror::Error;

/// Errors raised while loading configuration or enumerating cases.
///
/// Failures of individual cases are not errors; they are recorded in the
/// case outcome.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SuiteError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for a [`crate::Configuration`].
    #[error("Invalid configuration file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Inline YAML could not be parsed.
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A setting has an invalid value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured backends cannot be built or resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result type for the suite layer.
pub type SuiteResult<T> = Result<T, SuiteError>;
