//! Configuration System
//!
//! Layered configuration for manifest builds: built-in defaults, a global file,
//! the bundle's own `landpack.toml`, then `LANDPACK__*` environment variables.
//! CLI flags are applied on top by the binary.

use crate::descriptor::DESCRIPTOR_SUFFIX;
use crate::logging::LoggingConfig;
use crate::manifest::MANIFEST_FILE_NAME;
use crate::tree::walker::{ExclusionPolicy, WalkerConfig, RESERVED_SUFFIXES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod global_file;
    pub mod workspace_file;
}

pub use facade::ConfigLoader;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandpackConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Manifest build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Exact basenames excluded from the manifest, at any depth
    #[serde(default = "default_omit_names")]
    pub omit_names: Vec<String>,

    /// Basename suffixes always excluded
    #[serde(default = "default_reserved_suffixes")]
    pub reserved_suffixes: Vec<String>,

    /// Suffix that identifies sidecar resource descriptors
    #[serde(default = "default_descriptor_suffix")]
    pub descriptor_suffix: String,

    /// Manifest destination, relative to the bundle root
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_omit_names() -> Vec<String> {
    vec![
        MANIFEST_FILE_NAME.to_string(),
        WORKSPACE_CONFIG_FILE.to_string(),
    ]
}

fn default_reserved_suffixes() -> Vec<String> {
    RESERVED_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_descriptor_suffix() -> String {
    DESCRIPTOR_SUFFIX.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from(MANIFEST_FILE_NAME)
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            omit_names: default_omit_names(),
            reserved_suffixes: default_reserved_suffixes(),
            descriptor_suffix: default_descriptor_suffix(),
            output: default_output(),
            follow_symlinks: false,
        }
    }
}

impl ManifestConfig {
    /// Validate manifest settings
    pub fn validate(&self) -> Result<(), String> {
        if self.descriptor_suffix.is_empty() {
            return Err("descriptor_suffix cannot be empty".to_string());
        }
        if !self.descriptor_suffix.starts_with('.') {
            return Err(format!(
                "descriptor_suffix must start with '.', got '{}'",
                self.descriptor_suffix
            ));
        }
        if self.omit_names.iter().any(|n| n.trim().is_empty()) {
            return Err("omit_names cannot contain empty names".to_string());
        }
        if self.reserved_suffixes.iter().any(|s| s.is_empty()) {
            return Err("reserved_suffixes cannot contain empty suffixes".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("output path cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            exclusions: ExclusionPolicy {
                omit_names: self.omit_names.clone(),
                reserved_suffixes: self.reserved_suffixes.clone(),
            },
        }
    }
}

impl LandpackConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.manifest.validate()
    }
}
