//! Sidecar resource descriptors
//!
//! A data file `zones.csv` may be accompanied by `zones.resource.yaml`, a
//! key-value document describing it (`name`, `path`, `format`, `bytes`, `hash`,
//! `schema`, `profile`, `description`). The resolver finds that sidecar by
//! naming convention and pulls out what the manifest needs.

use crate::error::ManifestError;
use crate::tree::path;
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, instrument};

/// Suffix that marks a file as a resource descriptor.
pub const DESCRIPTOR_SUFFIX: &str = ".resource.yaml";

/// Id of the descriptor that would describe `id`.
pub fn descriptor_id(id: &str, suffix: &str) -> String {
    format!("{}{}", path::strip_extension(id), suffix)
}

/// Whether `id` is itself a descriptor. Descriptors are never described.
pub fn is_descriptor(id: &str, suffix: &str) -> bool {
    id.ends_with(suffix)
}

/// Typed view of a descriptor document.
///
/// Fields with an unexpected shape are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDescriptor {
    pub name: Option<String>,
    pub path: Option<String>,
    pub format: Option<String>,
    pub bytes: Option<u64>,
    pub hash: Option<String>,
    pub schema: Option<Value>,
    pub profile: Option<String>,
    pub description: Option<String>,
}

impl ResourceDescriptor {
    /// Build from a parsed document, tolerating any shape.
    pub fn from_value(value: &Value) -> Self {
        let Some(mapping) = value.as_mapping() else {
            return Self::default();
        };
        let text = |key: &str| {
            mapping
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            name: text("name"),
            path: text("path"),
            format: text("format"),
            bytes: mapping.get("bytes").and_then(Value::as_u64),
            hash: text("hash"),
            schema: mapping.get("schema").cloned(),
            profile: text("profile"),
            description: text("description"),
        }
    }

    /// The description, or `""` when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// MD5 digest declared by `hash`, accepting bare hex or an `md5:` prefix.
    pub fn md5_hash(&self) -> Option<&str> {
        let hash = self.hash.as_deref()?;
        match hash.split_once(':') {
            Some((algorithm, digest)) if algorithm.eq_ignore_ascii_case("md5") => Some(digest),
            Some(_) => None,
            None => Some(hash),
        }
    }
}

/// Reads and parses descriptor documents.
pub trait DescriptorReader {
    fn read(&self, path: &Path) -> Result<ResourceDescriptor, ManifestError>;
}

/// Reads descriptors from YAML files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDescriptorReader;

impl DescriptorReader for YamlDescriptorReader {
    fn read(&self, path: &Path) -> Result<ResourceDescriptor, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        parse_descriptor(path, &contents)
    }
}

/// Parse descriptor text. Invalid YAML is an error; a valid document of the wrong shape is not.
pub fn parse_descriptor(path: &Path, contents: &str) -> Result<ResourceDescriptor, ManifestError> {
    if contents.trim().is_empty() {
        return Ok(ResourceDescriptor::default());
    }
    let value: Value =
        serde_yaml::from_str(contents).map_err(|source| ManifestError::DescriptorParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ResourceDescriptor::from_value(&value))
}

/// A descriptor located for a data file
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDescriptor {
    pub id: String,
    pub descriptor: ResourceDescriptor,
}

/// Locates sidecar descriptors within one walk snapshot.
pub struct DescriptorResolver<'a> {
    root: &'a Path,
    suffix: &'a str,
    snapshot: &'a HashSet<String>,
    reader: &'a dyn DescriptorReader,
}

impl<'a> DescriptorResolver<'a> {
    pub fn new(
        root: &'a Path,
        suffix: &'a str,
        snapshot: &'a HashSet<String>,
        reader: &'a dyn DescriptorReader,
    ) -> Self {
        Self {
            root,
            suffix,
            snapshot,
            reader,
        }
    }

    /// Resolve the descriptor of the file at `relative_path`.
    ///
    /// `Ok(None)` when no descriptor with the conventional name was walked.
    #[instrument(skip(self))]
    pub fn resolve(&self, relative_path: &str) -> Result<Option<ResolvedDescriptor>, ManifestError> {
        let candidate = descriptor_id(relative_path, self.suffix);
        if !self.snapshot.contains(&candidate) {
            return Ok(None);
        }

        let descriptor = self.reader.read(&path::resolve(self.root, &candidate))?;
        debug!(descriptor = %candidate, "Resolved descriptor");
        Ok(Some(ResolvedDescriptor {
            id: candidate,
            descriptor,
        }))
    }
}
