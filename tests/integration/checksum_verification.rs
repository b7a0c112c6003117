//! Checksums and verification against the bundle on disk

use super::test_utils::{sample_bundle, write_file};
use landpack::descriptor::YamlDescriptorReader;
use landpack::manifest::{verify_manifest, EntityStatus, ManifestBuilder};
use landpack::tree::hasher::{compute_content_hash, ChecksumProvider, Md5Checksum};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_checksum_matches_in_memory_digest() {
    let temp_dir = TempDir::new().unwrap();
    let contents = "x".repeat(200_000);
    write_file(temp_dir.path(), "big.txt", &contents);

    let checksum = Md5Checksum
        .checksum(&temp_dir.path().join("big.txt"))
        .unwrap();
    assert_eq!(checksum.value, compute_content_hash(contents.as_bytes()));
    assert_eq!(checksum.size, 200_000);
}

#[test]
fn test_unreadable_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Md5Checksum
        .checksum(&temp_dir.path().join("absent.bin"))
        .unwrap_err();
    assert_eq!(err.kind(), "IOError");
}

#[test]
fn test_verify_reports_missing_and_changed_files() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let clean = verify_manifest(
        &manifest,
        temp_dir.path(),
        &Md5Checksum,
        &YamlDescriptorReader,
    )
    .unwrap();
    assert!(clean.is_ok());
    assert_eq!(clean.results.len(), 3);

    fs::remove_file(temp_dir.path().join("b/x.txt")).unwrap();
    fs::write(temp_dir.path().join("a.csv"), "id,value\n1,3\n").unwrap();

    let report = verify_manifest(
        &manifest,
        temp_dir.path(),
        &Md5Checksum,
        &YamlDescriptorReader,
    )
    .unwrap();
    let failures: Vec<(&str, &EntityStatus)> = report
        .failures()
        .map(|r| (r.id.as_str(), &r.status))
        .collect();
    assert_eq!(failures.len(), 2);
    assert!(matches!(failures[0], ("a.csv", EntityStatus::Mismatch { .. })));
    assert_eq!(failures[1], ("b/x.txt", &EntityStatus::Missing));
}

#[test]
fn test_verify_flags_descriptor_declaring_wrong_size() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a.csv", "id\n1\n");
    write_file(
        temp_dir.path(),
        "a.resource.yaml",
        "description: A\nbytes: 999\nhash: md5:5eb63bbbe01eeed093cb22bb8f5acdc3\n",
    );
    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let report = verify_manifest(
        &manifest,
        temp_dir.path(),
        &Md5Checksum,
        &YamlDescriptorReader,
    )
    .unwrap();
    let disagreements = report
        .failures()
        .filter(|r| {
            r.id == "a.csv" && matches!(r.status, EntityStatus::DescriptorDisagrees { .. })
        })
        .count();
    assert_eq!(disagreements, 2);
}
