//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ManifestError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::VerificationFailed { report, .. } => format!("{}\n{}", report, e),
        ApiError::Manifest(inner) => format!("{}: {}", inner.kind(), inner),
        ApiError::ConfigError(_) => e.to_string(),
    }
}

/// Exit status for a failed command
pub fn exit_code(e: &ApiError) -> i32 {
    match e {
        ApiError::VerificationFailed { .. } => 2,
        ApiError::Manifest(ManifestError::Structural(_)) => 3,
        _ => 1,
    }
}
