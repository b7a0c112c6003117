//! CLI parse: clap types for landpack. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Landpack CLI - self-describing manifests for research data bundles
#[derive(Parser)]
#[command(name = "landpack")]
#[command(about = "Build and verify dataset manifests for packaged data bundles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bundle directory to describe
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Walk the bundle and write its manifest
    Build {
        /// Manifest destination, relative to the workspace (default from config: ro-crate-metadata.json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Additional basename to exclude; repeatable
        #[arg(long = "omit")]
        omit: Vec<String>,
        /// Do not skip version-control and checkpoint directories
        #[arg(long)]
        no_reserved: bool,
        /// Print the manifest instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// List the entities of a written manifest
    Inspect {
        /// Manifest to read, relative to the workspace (default from config)
        manifest: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-checksum bundle files against a written manifest
    Verify {
        /// Manifest to read, relative to the workspace (default from config)
        manifest: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
