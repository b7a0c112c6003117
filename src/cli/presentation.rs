//! CLI presentation: text and json formatters per command.

use crate::error::{ApiError, ManifestError};
use crate::manifest::{to_json, EntityStatus, EntityType, Manifest, VerificationReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn counts(manifest: &Manifest) -> (usize, usize, usize) {
    let files = manifest.files().count();
    let directories = manifest
        .entities()
        .iter()
        .filter(|e| e.entity_type == EntityType::Directory)
        .count();
    let described = manifest
        .files()
        .filter(|e| e.is_described_by.is_some())
        .count();
    (files, directories, described)
}

pub fn format_build_summary(manifest: &Manifest, destination: &Path) -> String {
    let (files, directories, described) = counts(manifest);
    format!(
        "Wrote {} ({} files, {} directories, {} described)",
        destination.display(),
        files,
        directories,
        described
    )
}

pub fn format_manifest_json(manifest: &Manifest) -> Result<String, ApiError> {
    Ok(to_json(manifest)?)
}

pub fn format_manifest_text(manifest: &Manifest) -> String {
    let root = manifest.root();
    let (files, directories, described) = counts(manifest);

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Dataset")));
    out.push_str(&format!("  Name: {}\n", root.name));
    if let Some(created) = root.date_created {
        out.push_str(&format!("  Created: {}\n", created.to_rfc3339()));
    }
    out.push_str(&format!(
        "  Entities: {} ({} files, {} directories, {} described)\n\n",
        manifest.len(),
        files,
        directories,
        described
    ));

    out.push_str(&format!("{}\n\n", format_section_heading("Entities")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Type", "Size", "MD5", "Described by"]);
    for entity in manifest.entities().iter().skip(1) {
        table.add_row(vec![
            entity.id.clone(),
            format!("{:?}", entity.entity_type),
            entity
                .content_size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entity
                .checksum
                .as_ref()
                .map(|c| c.checksum_value.clone())
                .unwrap_or_else(|| "-".to_string()),
            entity.described_by().unwrap_or("-").to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_verification_text(report: &VerificationReport) -> String {
    let mut lines = Vec::with_capacity(report.results.len() + 1);
    for result in &report.results {
        let line = match &result.status {
            EntityStatus::Ok => format!("{} {}", "OK      ".green(), result.id),
            EntityStatus::Missing => format!("{} {}", "MISSING ".red(), result.id),
            EntityStatus::Mismatch { expected, actual } => format!(
                "{} {} (expected {}, found {})",
                "CHANGED ".red(),
                result.id,
                expected,
                actual
            ),
            EntityStatus::SizeMismatch { expected, actual } => format!(
                "{} {} (expected {} bytes, found {})",
                "SIZE    ".red(),
                result.id,
                expected,
                actual
            ),
            EntityStatus::DescriptorDisagrees { descriptor, detail } => format!(
                "{} {} ({} {})",
                "DESCRIBE".yellow(),
                result.id,
                descriptor,
                detail
            ),
        };
        lines.push(line);
    }
    lines.push(format!(
        "{} checked, {} failed",
        report.results.len(),
        report.failure_count()
    ));
    lines.join("\n")
}

pub fn format_verification_json(report: &VerificationReport) -> Result<String, ApiError> {
    serde_json::to_string_pretty(report).map_err(|source| {
        ApiError::Manifest(ManifestError::Serialization {
            path: PathBuf::from("verification report"),
            source,
        })
    })
}
