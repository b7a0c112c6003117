//! Shared fixtures for integration tests

use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;

/// Write `contents` at `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Bundle used across scenarios: one described table and one nested text file.
pub fn sample_bundle(root: &Path) {
    write_file(root, "a.csv", "id,value\n1,2\n");
    write_file(root, "a.resource.yaml", "description: Table A\n");
    write_file(root, "b/x.txt", "hello world");
}

pub fn pinned_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}
