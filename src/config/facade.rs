//! ConfigLoader: assembles defaults, files and environment into a LandpackConfig.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::LandpackConfig;
use config::{Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment overrides use `LANDPACK__SECTION__KEY`.
const ENV_PREFIX: &str = "LANDPACK";
const ENV_SEPARATOR: &str = "__";
/// List-valued keys are comma separated: `LANDPACK__MANIFEST__OMIT_NAMES=tmp,scratch`.
const ENV_LIST_SEPARATOR: &str = ",";

/// Loads layered configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `landpack.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<LandpackConfig, config::ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(ENV_LIST_SEPARATOR)
                .with_list_parse_key("manifest.omit_names")
                .with_list_parse_key("manifest.reserved_suffixes"),
        );

        let config: LandpackConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load a single configuration file over the defaults
    pub fn load_from_file(path: &Path) -> Result<LandpackConfig, config::ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()?
            .try_deserialize()
    }

    /// Global configuration file location, if HOME or XDG_CONFIG_HOME is set
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
