//! Manifest persistence

use super::test_utils::{pinned_time, sample_bundle};
use landpack::manifest::{read_manifest, ManifestBuilder, ManifestWriter, MANIFEST_FILE_NAME};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_written_document_shape() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .with_created_at(pinned_time())
        .build()
        .unwrap();
    let destination = temp_dir.path().join(MANIFEST_FILE_NAME);
    ManifestWriter::new(destination.clone()).write(&manifest).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
    assert_eq!(value["@context"], "https://w3id.org/ro/crate/1.1/context");
    let graph = value["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 5);
    assert_eq!(graph[0]["@id"], "./");
    assert_eq!(graph[0]["@type"], "Dataset");
    assert_eq!(graph[0]["dateCreated"], "2024-03-01T12:00:00Z");
    assert_eq!(graph[1]["isDescribedBy"]["@id"], "a.resource.yaml");
    assert_eq!(graph[1]["contentChecksum"][0]["checksumAlgorithm"], "MD5");
    assert!(graph[1].get("hasPart").is_none());
    assert_eq!(graph[3]["@type"], "Directory");
    assert_eq!(graph[3]["hasPart"][0]["@id"], "b/x.txt");
}

#[test]
fn test_rebuild_ignores_previous_manifest_and_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let destination = temp_dir.path().join(MANIFEST_FILE_NAME);

    let builder = ManifestBuilder::new(temp_dir.path().to_path_buf()).with_created_at(pinned_time());
    ManifestWriter::new(destination.clone())
        .write(&builder.build().unwrap())
        .unwrap();
    let first = fs::read_to_string(&destination).unwrap();

    let rebuilt = builder.build().unwrap();
    assert!(rebuilt.get(MANIFEST_FILE_NAME).is_none());
    ManifestWriter::new(destination.clone()).write(&rebuilt).unwrap();
    assert_eq!(fs::read_to_string(&destination).unwrap(), first);

    let leftovers: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}

#[test]
fn test_failed_write_keeps_previous_manifest() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    let destination = out_dir.join("manifest.json");
    fs::write(&destination, "previous").unwrap();

    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .build()
        .unwrap();

    // A directory squatting on the temp path makes the temp write fail.
    fs::create_dir(out_dir.join(".manifest.json.tmp")).unwrap();
    let err = ManifestWriter::new(destination.clone())
        .write(&manifest)
        .unwrap_err();
    assert_eq!(err.kind(), "IOError");
    assert_eq!(fs::read_to_string(&destination).unwrap(), "previous");
}

#[test]
fn test_read_back_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    sample_bundle(temp_dir.path());
    let manifest = ManifestBuilder::new(temp_dir.path().to_path_buf())
        .with_created_at(pinned_time())
        .build()
        .unwrap();
    let destination = temp_dir.path().join(MANIFEST_FILE_NAME);
    ManifestWriter::new(destination.clone()).write(&manifest).unwrap();

    let loaded = read_manifest(&destination).unwrap();
    assert_eq!(loaded.entities(), manifest.entities());
}
