//! End-to-end manifest builds over real directories

use super::test_utils::{sample_bundle, write_file};
use landpack::manifest::{EntityType, ManifestBuilder, MANIFEST_CONTEXT};
use landpack::tree::hasher::ChecksumAlgorithm;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_described_table_and_nested_file() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let ids: Vec<&str> = manifest.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["./", "a.csv", "a.resource.yaml", "b", "b/x.txt"]);

    let root = manifest.root();
    assert_eq!(root.entity_type, EntityType::Dataset);
    assert!(root.date_created.is_some());
    assert_eq!(
        root.part_ids().collect::<Vec<_>>(),
        vec!["a.csv", "a.resource.yaml", "b"]
    );

    let table = manifest.get("a.csv").unwrap();
    assert_eq!(table.entity_type, EntityType::File);
    assert_eq!(table.name, "a.csv");
    assert_eq!(table.description.as_deref(), Some("Table A"));
    assert_eq!(table.described_by(), Some("a.resource.yaml"));
    assert!(table.has_part.is_none());

    let descriptor = manifest.get("a.resource.yaml").unwrap();
    assert!(descriptor.described_by().is_none());
    assert!(descriptor.description.is_none());
    assert!(descriptor.checksum.is_some());

    let dir = manifest.get("b").unwrap();
    assert_eq!(dir.entity_type, EntityType::Directory);
    assert_eq!(dir.part_ids().collect::<Vec<_>>(), vec!["b/x.txt"]);

    let text = manifest.get("b/x.txt").unwrap();
    let checksum = text.checksum.as_ref().unwrap();
    assert_eq!(checksum.checksum_algorithm, ChecksumAlgorithm::Md5);
    assert_eq!(checksum.checksum_value, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    assert_eq!(text.content_size, Some(11));
    assert!(text.described_by().is_none());
}

#[test]
fn test_only_reserved_content_yields_root_only() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), ".git/config", "[core]\n");

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.root().part_ids().count(), 0);
    assert_eq!(manifest.context(), MANIFEST_CONTEXT);
}

#[test]
fn test_empty_directory_is_listed_with_no_parts() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("empty")).unwrap();

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let empty = manifest.get("empty").unwrap();
    assert_eq!(empty.entity_type, EntityType::Directory);
    assert_eq!(empty.has_part.as_deref(), Some(&[][..]));
}

#[test]
fn test_descriptor_without_description_sets_empty_string() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "roads.geojson", "{}");
    write_file(temp_dir.path(), "roads.resource.yaml", "name: roads\nformat: geojson\n");

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let roads = manifest.get("roads.geojson").unwrap();
    assert_eq!(roads.description.as_deref(), Some(""));
    assert_eq!(roads.described_by(), Some("roads.resource.yaml"));
}

#[test]
fn test_malformed_descriptor_fails_the_build() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a.csv", "id\n");
    write_file(temp_dir.path(), "a.resource.yaml", "description: [unclosed\n");

    let err = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "DescriptorParseError");
}

#[test]
fn test_missing_root_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ManifestBuilder::new(temp_dir.path().join("not-there"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "IOError");
}

#[test]
fn test_descriptor_in_subdirectory_pairs_by_full_path() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "zoning/parcels.csv", "id\n");
    write_file(temp_dir.path(), "zoning/parcels.resource.yaml", "description: Parcels\n");
    write_file(temp_dir.path(), "parcels.csv", "id\n");

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let nested = manifest.get("zoning/parcels.csv").unwrap();
    assert_eq!(nested.described_by(), Some("zoning/parcels.resource.yaml"));
    let top = manifest.get("parcels.csv").unwrap();
    assert!(top.described_by().is_none());
}

#[cfg(unix)]
#[test]
fn test_symlinked_data_file_is_listed_and_checksummed() {
    let outside = TempDir::new().unwrap();
    write_file(outside.path(), "flu.shp", "hello world");

    let temp_dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink(outside.path().join("flu.shp"), temp_dir.path().join("flu.shp"))
        .unwrap();

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    let shape = manifest.get("flu.shp").unwrap();
    assert_eq!(shape.entity_type, EntityType::File);
    assert_eq!(
        shape.checksum.as_ref().unwrap().checksum_value,
        "5eb63bbbe01eeed093cb22bb8f5acdc3"
    );
}
