//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_build_summary, format_manifest_json, format_manifest_text, format_verification_json,
    format_verification_text,
};
use crate::config::{ConfigLoader, LandpackConfig, ManifestConfig};
use crate::descriptor::YamlDescriptorReader;
use crate::error::ApiError;
use crate::manifest::{read_manifest, verify_manifest, ManifestBuilder, ManifestWriter};
use crate::tree::hasher::Md5Checksum;
use crate::tree::path;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Runtime context for CLI execution: bundle root and resolved configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: LandpackConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: LandpackConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &LandpackConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    #[instrument(skip(self, command))]
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Build {
                output,
                omit,
                no_reserved,
                dry_run,
            } => self.build(output.as_deref(), omit, *no_reserved, *dry_run),
            Commands::Inspect { manifest, format } => self.inspect(manifest.as_deref(), format),
            Commands::Verify { manifest, format } => self.verify(manifest.as_deref(), format),
        };
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn manifest_settings(&self, omit: &[String], no_reserved: bool) -> ManifestConfig {
        let mut settings = self.config.manifest.clone();
        settings.omit_names.extend(omit.iter().cloned());
        if no_reserved {
            settings.reserved_suffixes.clear();
        }
        settings
    }

    /// Relative manifest paths, configured or passed on the command line,
    /// are taken from the bundle root.
    fn in_workspace(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    fn manifest_path(&self, manifest: Option<&Path>) -> PathBuf {
        self.in_workspace(manifest.unwrap_or(&self.config.manifest.output))
    }

    /// Whether `destination` lands somewhere the walk will visit.
    fn within_workspace(&self, destination: &Path) -> bool {
        if destination.starts_with(&self.workspace_root) {
            return true;
        }
        let Some(parent) = destination.parent() else {
            return false;
        };
        match (
            path::canonicalize_path(&self.workspace_root),
            path::canonicalize_path(parent),
        ) {
            (Ok(root), Ok(dir)) => dir.starts_with(root),
            _ => false,
        }
    }

    fn build(
        &self,
        output: Option<&Path>,
        omit: &[String],
        no_reserved: bool,
        dry_run: bool,
    ) -> Result<String, ApiError> {
        let mut settings = self.manifest_settings(omit, no_reserved);
        settings.validate().map_err(ApiError::ConfigError)?;

        let destination = self.in_workspace(output.unwrap_or(&settings.output));
        let writer = ManifestWriter::new(destination.clone());
        if self.within_workspace(&destination) {
            // Never package the previous manifest or its staging file
            for own in [writer.destination().to_path_buf(), writer.temp_path()] {
                if let Some(name) = own.file_name() {
                    settings.omit_names.push(name.to_string_lossy().to_string());
                }
            }
            debug!(destination = %destination.display(), "Excluding manifest destination from walk");
        }

        let manifest = ManifestBuilder::new(self.workspace_root.clone())
            .with_walker_config(settings.walker_config())
            .with_descriptor_suffix(settings.descriptor_suffix.clone())
            .build()?;

        if dry_run {
            return format_manifest_json(&manifest);
        }

        writer.write(&manifest)?;
        Ok(format_build_summary(&manifest, &destination))
    }

    fn inspect(&self, manifest: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let manifest = read_manifest(&self.manifest_path(manifest))?;
        match format {
            "json" => format_manifest_json(&manifest),
            "text" => Ok(format_manifest_text(&manifest)),
            other => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn verify(&self, manifest: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let manifest = read_manifest(&self.manifest_path(manifest))?;
        let report = verify_manifest(
            &manifest,
            &self.workspace_root,
            &Md5Checksum,
            &YamlDescriptorReader,
        )?;

        let rendered = match format {
            "json" => format_verification_json(&report)?,
            "text" => format_verification_text(&report),
            other => {
                return Err(ApiError::ConfigError(format!(
                    "Invalid format: {} (must be 'text' or 'json')",
                    other
                )))
            }
        };

        if report.is_ok() {
            Ok(rendered)
        } else {
            Err(ApiError::VerificationFailed {
                failures: report.failure_count(),
                report: rendered,
            })
        }
    }
}
