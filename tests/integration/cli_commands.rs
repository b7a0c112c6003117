//! CLI route table over a real bundle

use super::test_utils::sample_bundle;
use clap::Parser;
use landpack::cli::{exit_code, map_error, Cli, Commands, RunContext};
use landpack::config::LandpackConfig;
use landpack::error::ApiError;
use std::fs;
use tempfile::TempDir;

fn context(root: &std::path::Path) -> RunContext {
    RunContext::with_config(root.to_path_buf(), LandpackConfig::default()).unwrap()
}

#[test]
fn test_parsed_build_command_writes_manifest() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let out = temp_dir.path().join("out").join("bundle.json");
    let out_str = out.to_string_lossy();

    let cli = Cli::try_parse_from(["landpack", "build", "--output", out_str.as_ref()]).unwrap();
    let summary = context(temp_dir.path()).execute(&cli.command).unwrap();

    assert!(out.exists());
    assert!(summary.contains("3 files"));
    assert!(summary.contains("1 directories"));
    assert!(summary.contains("1 described"));
}

#[test]
fn test_inspect_json_matches_written_document() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let ctx = context(temp_dir.path());
    ctx.execute(&Commands::Build {
        output: None,
        omit: Vec::new(),
        no_reserved: false,
        dry_run: false,
    })
    .unwrap();

    let json = ctx
        .execute(&Commands::Inspect {
            manifest: None,
            format: "json".to_string(),
        })
        .unwrap();
    let inspected: serde_json::Value = serde_json::from_str(&json).unwrap();
    let written: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("ro-crate-metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(inspected, written);
}

#[test]
fn test_verify_failure_maps_to_exit_code_two() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let ctx = context(temp_dir.path());
    ctx.execute(&Commands::Build {
        output: None,
        omit: Vec::new(),
        no_reserved: false,
        dry_run: false,
    })
    .unwrap();
    fs::remove_file(temp_dir.path().join("a.csv")).unwrap();

    let err = ctx
        .execute(&Commands::Verify {
            manifest: None,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::VerificationFailed { failures: 1, .. }));
    assert_eq!(exit_code(&err), 2);
    assert!(map_error(&err).contains("a.csv"));
}

#[test]
fn test_inspect_missing_manifest_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = context(temp_dir.path())
        .execute(&Commands::Inspect {
            manifest: None,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(map_error(&err).starts_with("IOError"));
    assert_eq!(exit_code(&err), 1);
}
