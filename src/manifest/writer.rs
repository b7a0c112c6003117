//! Manifest persistence
//!
//! Manifests are written to a sibling temporary file and renamed into place,
//! so the destination either holds a complete document or is left untouched.

use crate::error::ManifestError;
use crate::manifest::entity::{Manifest, ManifestDocument};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default manifest file name.
pub const MANIFEST_FILE_NAME: &str = "ro-crate-metadata.json";

/// Serialize a manifest to pretty-printed JSON
pub fn to_json(manifest: &Manifest) -> Result<String, ManifestError> {
    render_json(&manifest.to_document(), Path::new(MANIFEST_FILE_NAME))
}

/// Pretty JSON, with failures attributed to `path`
fn render_json<T: Serialize>(value: &T, path: &Path) -> Result<String, ManifestError> {
    serde_json::to_string_pretty(value).map_err(|source| ManifestError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes manifests to a fixed destination
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    destination: PathBuf,
}

impl ManifestWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Hidden sibling the document is staged in before the rename.
    pub fn temp_path(&self) -> PathBuf {
        let name = self
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| MANIFEST_FILE_NAME.to_string());
        self.destination.with_file_name(format!(".{}.tmp", name))
    }

    /// Write the manifest atomically.
    #[instrument(skip(self, manifest), fields(destination = %self.destination.display()))]
    pub fn write(&self, manifest: &Manifest) -> Result<(), ManifestError> {
        let json = render_json(&manifest.to_document(), &self.destination)?;

        if let Some(parent) = self.destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ManifestError::io(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(ManifestError::io(&temp_path, e));
        }
        debug!(temp = %temp_path.display(), bytes = json.len(), "Wrote temporary manifest");

        fs::rename(&temp_path, &self.destination).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ManifestError::io(&self.destination, e)
        })?;

        info!(entity_count = manifest.len(), "Manifest written");
        Ok(())
    }
}

/// Load and structurally check a persisted manifest
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let contents = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
    let document: ManifestDocument =
        serde_json::from_str(&contents).map_err(|source| ManifestError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    Manifest::from_document(document)
}
