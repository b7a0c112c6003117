//! Landpack CLI Binary
//!
//! Command-line interface for building and verifying bundle manifests.

use anyhow::Result;
use clap::Parser;
use landpack::cli::{exit_code, map_error, Cli, RunContext};
use landpack::config::ConfigLoader;
use landpack::error::ApiError;
use landpack::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Landpack CLI starting");

    match run(&cli) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            let code = match err.downcast_ref::<ApiError>() {
                Some(api_error) => {
                    eprintln!("{}", map_error(api_error));
                    exit_code(api_error)
                }
                None => {
                    eprintln!("{:#}", err);
                    1
                }
            };
            process::exit(code);
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let context = RunContext::new(cli.workspace.clone(), cli.config.clone())?;
    info!(workspace = %context.workspace_root().display(), "CLI context initialized");
    Ok(context.execute(&cli.command)?)
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
