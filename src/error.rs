//! Error types for manifest generation and the landpack CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while walking, describing, hashing, or persisting a bundle.
///
/// Every variant carries the offending path (or id) so a failed build can be
/// traced back to the file that caused it.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed descriptor {path:?}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Manifest serialization failed for {path:?}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ManifestError::Io { .. } => "IOError",
            ManifestError::DescriptorParse { .. } => "DescriptorParseError",
            ManifestError::Structural(_) => "StructuralError",
            ManifestError::Serialization { .. } => "SerializationError",
        }
    }
}

/// Application-level errors surfaced by the CLI and configuration layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Carries the rendered report so the CLI can show it alongside the error.
    #[error("Verification failed: {failures} check(s) did not match the workspace")]
    VerificationFailed { failures: usize, report: String },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
