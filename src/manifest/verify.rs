//! Verification of a persisted manifest against the bundle on disk

use crate::descriptor::DescriptorReader;
use crate::error::ManifestError;
use crate::manifest::entity::{Manifest, ManifestEntity};
use crate::tree::hasher::{Checksum, ChecksumProvider};
use crate::tree::path;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Outcome for one check on one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityStatus {
    Ok,
    Missing,
    Mismatch { expected: String, actual: String },
    SizeMismatch { expected: u64, actual: u64 },
    DescriptorDisagrees { descriptor: String, detail: String },
}

impl EntityStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, EntityStatus::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityVerification {
    pub id: String,
    #[serde(flatten)]
    pub status: EntityStatus,
}

/// Per-file verification results in manifest order
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub results: Vec<EntityVerification>,
}

impl VerificationReport {
    pub fn failures(&self) -> impl Iterator<Item = &EntityVerification> {
        self.results.iter().filter(|r| !r.status.is_ok())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_ok(&self) -> bool {
        self.failure_count() == 0
    }

    fn push(&mut self, id: &str, status: EntityStatus) {
        self.results.push(EntityVerification {
            id: id.to_string(),
            status,
        });
    }
}

/// Re-checksum every file entity under `root` and compare against the manifest
/// and against any `bytes`/`hash` its descriptor declares.
#[instrument(skip(manifest, checksum, descriptors), fields(root = %root.display()))]
pub fn verify_manifest(
    manifest: &Manifest,
    root: &Path,
    checksum: &dyn ChecksumProvider,
    descriptors: &dyn DescriptorReader,
) -> Result<VerificationReport, ManifestError> {
    let mut report = VerificationReport::default();

    for entity in manifest.files() {
        let actual = match checksum.checksum(&path::resolve(root, &entity.id)) {
            Ok(actual) => actual,
            Err(ManifestError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warn!(id = %entity.id, "File listed in manifest is missing");
                report.push(&entity.id, EntityStatus::Missing);
                continue;
            }
            Err(e) => return Err(e),
        };

        let before = report.results.len();
        check_recorded(entity, &actual, &mut report);
        check_descriptor(entity, &actual, root, descriptors, &mut report)?;
        if report.results.len() == before {
            report.push(&entity.id, EntityStatus::Ok);
        }
    }

    info!(
        checked = manifest.files().count(),
        failures = report.failure_count(),
        "Manifest verification completed"
    );
    Ok(report)
}

fn check_recorded(entity: &ManifestEntity, actual: &Checksum, report: &mut VerificationReport) {
    if let Some(recorded) = &entity.checksum {
        if recorded.checksum_algorithm == actual.algorithm
            && !recorded.checksum_value.eq_ignore_ascii_case(&actual.value)
        {
            report.push(
                &entity.id,
                EntityStatus::Mismatch {
                    expected: recorded.checksum_value.clone(),
                    actual: actual.value.clone(),
                },
            );
        }
    }
    if let Some(expected) = entity.content_size {
        if expected != actual.size {
            report.push(
                &entity.id,
                EntityStatus::SizeMismatch {
                    expected,
                    actual: actual.size,
                },
            );
        }
    }
}

fn check_descriptor(
    entity: &ManifestEntity,
    actual: &Checksum,
    root: &Path,
    descriptors: &dyn DescriptorReader,
    report: &mut VerificationReport,
) -> Result<(), ManifestError> {
    let Some(descriptor_id) = entity.described_by() else {
        return Ok(());
    };
    let descriptor_path = path::resolve(root, descriptor_id);
    if !descriptor_path.is_file() {
        // Reported as Missing on the descriptor's own entity
        return Ok(());
    }

    let descriptor = descriptors.read(&descriptor_path)?;
    if let Some(bytes) = descriptor.bytes {
        if bytes != actual.size {
            report.push(
                &entity.id,
                EntityStatus::DescriptorDisagrees {
                    descriptor: descriptor_id.to_string(),
                    detail: format!("declares {} bytes, file has {}", bytes, actual.size),
                },
            );
        }
    }
    if let Some(hash) = descriptor.md5_hash() {
        if !hash.eq_ignore_ascii_case(&actual.value) {
            report.push(
                &entity.id,
                EntityStatus::DescriptorDisagrees {
                    descriptor: descriptor_id.to_string(),
                    detail: format!("declares md5 {}, file has {}", hash, actual.value),
                },
            );
        }
    }
    debug!(id = %entity.id, descriptor = descriptor_id, "Checked descriptor");
    Ok(())
}
