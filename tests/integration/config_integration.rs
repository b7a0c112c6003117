//! Configuration layers feeding a build

use super::test_utils::{sample_bundle, write_file};
use landpack::cli::{Commands, RunContext};
use landpack::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use landpack::error::ApiError;
use landpack::manifest::read_manifest;
use tempfile::TempDir;

fn build() -> Commands {
    Commands::Build {
        output: None,
        omit: Vec::new(),
        no_reserved: false,
        dry_run: false,
    }
}

#[test]
fn test_workspace_file_controls_build() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    write_file(temp_dir.path(), "scratch/notes.txt", "draft");
    write_file(
        temp_dir.path(),
        WORKSPACE_CONFIG_FILE,
        "[manifest]\nomit_names = [\"scratch\", \"manifest.json\", \"landpack.toml\"]\noutput = \"manifest.json\"\n",
    );

    let config_path = temp_dir.path().join(WORKSPACE_CONFIG_FILE);
    let ctx = RunContext::new(temp_dir.path().to_path_buf(), Some(config_path)).unwrap();
    ctx.execute(&build()).unwrap();

    let manifest = read_manifest(&temp_dir.path().join("manifest.json")).unwrap();
    assert!(manifest.get("scratch").is_none());
    assert!(manifest.get(WORKSPACE_CONFIG_FILE).is_none());
    assert!(manifest.get("a.csv").is_some());
}

#[test]
fn test_custom_descriptor_suffix() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a.csv", "id\n");
    write_file(temp_dir.path(), "a.meta.yaml", "description: custom\n");
    let config_path = temp_dir.path().join("custom.toml");
    write_file(
        temp_dir.path(),
        "custom.toml",
        "[manifest]\ndescriptor_suffix = \".meta.yaml\"\nomit_names = [\"custom.toml\", \"ro-crate-metadata.json\"]\n",
    );

    let ctx = RunContext::new(temp_dir.path().to_path_buf(), Some(config_path)).unwrap();
    ctx.execute(&build()).unwrap();

    let manifest = read_manifest(&temp_dir.path().join("ro-crate-metadata.json")).unwrap();
    let table = manifest.get("a.csv").unwrap();
    assert_eq!(table.described_by(), Some("a.meta.yaml"));
    assert_eq!(table.description.as_deref(), Some("custom"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "bad.toml",
        "[manifest]\ndescriptor_suffix = \"resource.yaml\"\n",
    );

    let result = RunContext::new(
        temp_dir.path().to_path_buf(),
        Some(temp_dir.path().join("bad.toml")),
    );
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).is_err());
}
