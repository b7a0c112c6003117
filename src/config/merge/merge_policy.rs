//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// List-valued defaults live on the serde structs so that a file setting
/// `omit_names` replaces the list instead of merging index by index.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("manifest.descriptor_suffix", ".resource.yaml")?
        .set_default("manifest.output", "ro-crate-metadata.json")?
        .set_default("manifest.follow_symlinks", false)?
        .set_default("logging.level", "info")
}
